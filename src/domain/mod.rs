//! Core domain types for Car Collector

mod car;
mod rarity;

pub use car::{CarId, CarRecord, MAX_NOTE_CHARS};
pub use rarity::RarityTier;
