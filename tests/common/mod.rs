//! Shared test utilities for progression and storage tests

#![allow(dead_code)]

use anyhow::{Result, bail};
use chrono::{DateTime, TimeZone, Utc};

use car_collector::classifier::{ClassifierError, RarityClassifier, SemanticClassifier, Unavailable};
use car_collector::domain::{CarId, CarRecord, RarityTier};
use car_collector::progression::{AchievementEngine, CATALOG, Progression, ProgressionLedger};
use car_collector::store::{CarStore, LedgerStore, MemoryStore};

pub type FixedClock = fn() -> DateTime<Utc>;

/// The "current time" every test engine sees
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 18, 0, 0).unwrap()
}

pub fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, hour, 0, 0).unwrap()
}

/// A record as it would look after classification
pub fn car(name: &str, rarity: RarityTier, captured_at: DateTime<Utc>) -> CarRecord {
    CarRecord {
        id: CarId::Pending(0),
        name: name.to_string(),
        rarity,
        points: rarity.points(),
        captured_at,
        note: None,
        favorite: false,
        image_ref: None,
    }
}

pub fn engine() -> AchievementEngine<FixedClock> {
    AchievementEngine::with_clock(CATALOG, now)
}

/// Progression with no semantic fallback and a fixed clock
pub fn progression() -> Progression<Unavailable, FixedClock> {
    Progression::with_engine(RarityClassifier::new(Unavailable), engine())
}

pub fn progression_with<S: SemanticClassifier>(semantic: S) -> Progression<S, FixedClock> {
    Progression::with_engine(RarityClassifier::new(semantic), engine())
}

/// Semantic classifier that always fails like a timed-out request
pub struct TimedOut;

impl SemanticClassifier for TimedOut {
    fn classify(&self, _car_name: &str) -> Result<String, ClassifierError> {
        Err(ClassifierError::Transport("timed out".to_string()))
    }
}

/// Car writes succeed, ledger writes always fail
#[derive(Default)]
pub struct LedgerOffline {
    pub cars: MemoryStore,
}

impl CarStore for LedgerOffline {
    fn create(&self, record: &CarRecord) -> Result<String> {
        self.cars.create(record)
    }

    fn set_favorite(&self, id: &str, favorite: bool) -> Result<()> {
        self.cars.set_favorite(id, favorite)
    }

    fn set_note(&self, id: &str, note: Option<&str>) -> Result<()> {
        self.cars.set_note(id, note)
    }

    fn delete(&self, id: &str) -> Result<Option<String>> {
        self.cars.delete(id)
    }

    fn list(&self) -> Result<Vec<CarRecord>> {
        self.cars.list()
    }
}

impl LedgerStore for LedgerOffline {
    fn load_ledger(&self) -> Result<ProgressionLedger> {
        Ok(ProgressionLedger::new())
    }

    fn save_ledger(&self, _ledger: &ProgressionLedger) -> Result<()> {
        bail!("ledger table is locked")
    }
}
