//! Progression: points, levels and achievements for a car collection
//!
//! ```ignore
//! let mut progression = Progression::new(classifier::from_settings(&config.classifier));
//!
//! let car = progression.on_car_identified("2019 Lamborghini Huracan EVO")?;
//! let unlocked = progression.on_collection_changed();
//!
//! for achievement in unlocked {
//!     progression.claim(achievement.key)?;
//! }
//! ```

pub mod achievements;
mod error;
mod levels;
mod orchestrator;

pub use achievements::{
    AchievementCategory, AchievementDefinition, AchievementEngine, AchievementState, CATALOG,
    ClaimReceipt, ProgressionLedger, catalog_coins, find_definition,
};
pub use error::ProgressionError;
pub use levels::{MAX_LEVEL, PlayerStats, level_for, required_points};
pub use orchestrator::{LedgerCheckpoint, Progression};
