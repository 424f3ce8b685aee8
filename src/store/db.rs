//! SQLite-backed store
//!
//! Manages `~/.car-collector/collection.db` (or the configured path). The
//! schema is versioned in `schema_version`; later layouts add their upgrade
//! steps to `init_schema`. Timestamps are stored as epoch milliseconds.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use super::{CarStore, LedgerStore};
use crate::domain::{CarId, CarRecord, RarityTier};
use crate::progression::{AchievementState, ProgressionLedger};

/// Database wrapper shared behind a mutex
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open collection db: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::with_connection(conn)
    }

    /// Fresh database that lives only as long as the store
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("Collection DB lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA_SQL)?;
        debug!(version = SCHEMA_VERSION, "Collection schema ready");
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        let version = self.conn().query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )?;
        Ok(version)
    }
}

fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("Timestamp out of range: {}", ms))
}

/// Row as read from `cars`, before validation
struct CarRow {
    id: String,
    name: String,
    rarity: String,
    points: i64,
    captured_at: i64,
    note: Option<String>,
    favorite: bool,
    image_ref: Option<String>,
}

impl CarRow {
    fn into_record(self) -> Result<CarRecord> {
        let rarity = RarityTier::from_label(&self.rarity)
            .ok_or_else(|| anyhow!("Car {} has unknown rarity {:?}", self.id, self.rarity))?;

        Ok(CarRecord {
            id: CarId::Stored(self.id),
            name: self.name,
            rarity,
            points: self.points.max(0) as u64,
            captured_at: from_millis(self.captured_at)?,
            note: self.note,
            favorite: self.favorite,
            image_ref: self.image_ref,
        })
    }
}

impl CarStore for SqliteStore {
    fn create(&self, record: &CarRecord) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.conn()
            .execute(
                "INSERT INTO cars (id, name, rarity, points, captured_at, note, favorite, image_ref)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    record.name,
                    record.rarity.label(),
                    record.points as i64,
                    to_millis(record.captured_at),
                    record.note,
                    record.favorite,
                    record.image_ref,
                ],
            )
            .with_context(|| format!("Failed to save car {:?}", record.name))?;

        debug!(id = %id, car = %record.name, "Car stored");
        Ok(id)
    }

    fn set_favorite(&self, id: &str, favorite: bool) -> Result<()> {
        let changed = self
            .conn()
            .execute("UPDATE cars SET favorite = ?1 WHERE id = ?2", params![favorite, id])?;
        if changed == 0 {
            bail!("No car with id {}", id);
        }
        Ok(())
    }

    fn set_note(&self, id: &str, note: Option<&str>) -> Result<()> {
        let changed = self
            .conn()
            .execute("UPDATE cars SET note = ?1 WHERE id = ?2", params![note, id])?;
        if changed == 0 {
            bail!("No car with id {}", id);
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<Option<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let image_ref: Option<Option<String>> = tx
            .query_row("SELECT image_ref FROM cars WHERE id = ?1", [id], |r| r.get(0))
            .optional()?;
        let Some(image_ref) = image_ref else {
            bail!("No car with id {}", id);
        };

        tx.execute("DELETE FROM cars WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(image_ref)
    }

    fn list(&self) -> Result<Vec<CarRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, rarity, points, captured_at, note, favorite, image_ref
             FROM cars ORDER BY captured_at DESC, rowid DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CarRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    rarity: row.get(2)?,
                    points: row.get(3)?,
                    captured_at: row.get(4)?,
                    note: row.get(5)?,
                    favorite: row.get(6)?,
                    image_ref: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(CarRow::into_record).collect()
    }
}

impl LedgerStore for SqliteStore {
    fn load_ledger(&self) -> Result<ProgressionLedger> {
        let conn = self.conn();

        let (coins, bonus_xp): (i64, i64) = conn.query_row(
            "SELECT coins, bonus_xp FROM wallet WHERE id = 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        let mut stmt = conn.prepare("SELECT key, unlocked_at, claimed_at FROM achievements")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut achievements = Vec::with_capacity(rows.len());
        for (key, unlocked_at, claimed_at) in rows {
            let unlocked_at = from_millis(unlocked_at)?;
            let state = match claimed_at {
                Some(ms) => AchievementState::Claimed {
                    unlocked_at,
                    claimed_at: from_millis(ms)?,
                },
                None => AchievementState::Unlocked { unlocked_at },
            };
            achievements.push((key, state));
        }

        Ok(ProgressionLedger::from_parts(
            coins.max(0) as u64,
            bonus_xp.max(0) as u64,
            achievements,
        ))
    }

    fn save_ledger(&self, ledger: &ProgressionLedger) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE wallet SET coins = ?1, bonus_xp = ?2 WHERE id = 1",
            params![ledger.coins() as i64, ledger.bonus_xp() as i64],
        )?;
        tx.execute("DELETE FROM achievements", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO achievements (key, unlocked_at, claimed_at) VALUES (?1, ?2, ?3)",
            )?;
            for (key, state) in ledger.states() {
                let Some(unlocked_at) = state.unlocked_at() else {
                    continue;
                };
                insert.execute(params![
                    key,
                    to_millis(unlocked_at),
                    state.claimed_at().map(to_millis),
                ])?;
            }
        }

        tx.commit().context("Failed to save ledger")?;
        Ok(())
    }
}

const SCHEMA_VERSION: i32 = 1;

/// SQL schema for the collection database
const SCHEMA_SQL: &str = r#"
-- One row per collected car; points are stamped at capture and never recomputed
CREATE TABLE IF NOT EXISTS cars (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    rarity TEXT NOT NULL,
    points INTEGER NOT NULL,
    captured_at INTEGER NOT NULL,
    note TEXT,
    favorite INTEGER NOT NULL DEFAULT 0,
    image_ref TEXT
);
CREATE INDEX IF NOT EXISTS idx_cars_captured_at ON cars(captured_at);

-- Unlocked (and possibly claimed) achievements; absent keys are locked
CREATE TABLE IF NOT EXISTS achievements (
    key TEXT PRIMARY KEY,
    unlocked_at INTEGER NOT NULL,
    claimed_at INTEGER
);

-- Coin balance and claimed XP (singleton)
CREATE TABLE IF NOT EXISTS wallet (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    coins INTEGER NOT NULL DEFAULT 0,
    bonus_xp INTEGER NOT NULL DEFAULT 0
);
INSERT OR IGNORE INTO wallet (id) VALUES (1);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn car(name: &str, rarity: RarityTier, day: u32) -> CarRecord {
        CarRecord {
            id: CarId::Pending(0),
            name: name.to_string(),
            rarity,
            points: rarity.points(),
            captured_at: Utc.with_ymd_and_hms(2025, 2, day, 10, 0, 0).unwrap(),
            note: None,
            favorite: false,
            image_ref: None,
        }
    }

    #[test]
    fn test_fresh_schema() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(store.load_ledger().unwrap(), ProgressionLedger::new());

        let conn = store.conn();
        for (table, column) in [("cars", "image_ref"), ("wallet", "bonus_xp")] {
            let count: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                    params![table, column],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "{table}.{column}");
        }
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("collection.db");

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            let id = store.create(&car("Nissan GT-R", RarityTier::Rare, 3)).unwrap();
            store.set_note(&id, Some("Track day")).unwrap();
            id
        };

        let store = SqliteStore::open(&path).unwrap();
        let cars = store.list().unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].id, CarId::Stored(id));
        assert_eq!(cars[0].note.as_deref(), Some("Track day"));
        assert_eq!(cars[0].points, 50);
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.set_favorite("missing", true).is_err());
        assert!(store.set_note("missing", None).is_err());
        assert!(store.delete("missing").is_err());
    }

    #[test]
    fn test_ledger_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 8, 15, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 2, 2, 9, 0, 0).unwrap();
        let ledger = ProgressionLedger::from_parts(
            35,
            40,
            [
                ("first_car".to_string(), AchievementState::Claimed { unlocked_at: at, claimed_at: later }),
                ("5_cars".to_string(), AchievementState::Unlocked { unlocked_at: later }),
            ],
        );

        store.save_ledger(&ledger).unwrap();
        assert_eq!(store.load_ledger().unwrap(), ledger);
    }
}
