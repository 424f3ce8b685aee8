//! Persistence for the collection and the reward ledger
//!
//! The progression core never waits on these; the session layer applies a
//! change in memory first and rolls it back if the store rejects it.

mod db;
mod memory;

pub use db::SqliteStore;
pub use memory::MemoryStore;

use anyhow::Result;

use crate::domain::CarRecord;
use crate::progression::ProgressionLedger;

/// Car records, keyed by store-assigned id
pub trait CarStore {
    /// Persist a new record and return the id assigned to it
    fn create(&self, record: &CarRecord) -> Result<String>;

    fn set_favorite(&self, id: &str, favorite: bool) -> Result<()>;

    fn set_note(&self, id: &str, note: Option<&str>) -> Result<()>;

    /// Remove a record, returning its image reference so the caller can
    /// delete the asset too
    fn delete(&self, id: &str) -> Result<Option<String>>;

    /// All records, newest capture first
    fn list(&self) -> Result<Vec<CarRecord>>;
}

/// Coin balance, bonus XP and achievement states
pub trait LedgerStore {
    fn load_ledger(&self) -> Result<ProgressionLedger>;

    fn save_ledger(&self, ledger: &ProgressionLedger) -> Result<()>;
}
