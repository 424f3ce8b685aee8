//! Car Collector - rarity, points, levels and achievements
//!
//! Every photographed car is classified into one of five rarity tiers and
//! stamped with that tier's points. Points drive a 100-level curve, and the
//! collection as a whole is checked against a catalog of achievements whose
//! coin rewards are claimed explicitly.
//!
//! ## Layers
//!
//! 1. **Core** (`classifier`, `progression`): pure and synchronous apart
//!    from the semantic classifier's bounded network call.
//!
//! 2. **Adapters** (`store`, `session`, `config`): SQLite persistence and
//!    configuration. The session applies changes in memory, persists them,
//!    and rolls back when the store fails.

pub mod classifier;
pub mod config;
pub mod domain;
pub mod progression;
pub mod recognition;
pub mod session;
pub mod store;

pub use domain::*;
