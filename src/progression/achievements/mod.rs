//! Achievements: catalog, conditions, per-player ledger and the evaluation engine
//!
//! The catalog is static and versioned. Everything that changes per player
//! lives in [`ProgressionLedger`], which the engine mutates explicitly.

mod conditions;
mod definitions;
mod engine;
mod groups;
mod ledger;
mod snapshot;

pub use conditions::{Condition, EvalContext};
pub use definitions::{
    AchievementCategory, AchievementDefinition, CATALOG, CATALOG_VERSION, catalog_coins,
    find_definition,
};
pub use engine::{AchievementEngine, ClaimReceipt, Clock};
pub use groups::{CarGroup, manufacturer, model_year};
pub use ledger::{AchievementState, ProgressionLedger};
pub use snapshot::{CollectionStats, DayStats};
