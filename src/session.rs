//! Progression bound to a store
//!
//! Every mutation is applied in memory first, then persisted. When the store
//! rejects it, the in-memory change is undone and the error returned. The
//! ledger is saved whenever a mutation changes it. Once a car change is
//! stored, a failed ledger save only drops the new unlocks; they come back
//! on the next evaluation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::classifier::{self, SemanticClassifier};
use crate::config::Config;
use crate::domain::{CarId, CarRecord};
use crate::progression::achievements::Clock;
use crate::progression::{AchievementDefinition, ClaimReceipt, LedgerCheckpoint, Progression};
use crate::recognition::CarRecognizer;
use crate::store::{CarStore, LedgerStore, SqliteStore};

/// A newly saved car and whatever it unlocked
#[derive(Debug)]
pub struct Added {
    pub car: CarRecord,
    pub unlocked: Vec<&'static AchievementDefinition>,
}

pub struct Session<St, S, K = fn() -> DateTime<Utc>> {
    store: St,
    progression: Progression<S, K>,
    images_dir: Option<PathBuf>,
}

/// Session over the configured SQLite database and classifier
pub type DefaultSession = Session<SqliteStore, Box<dyn SemanticClassifier>>;

impl DefaultSession {
    pub fn from_config(config: &Config) -> Result<Self> {
        let db_path = config.database_path();
        let store = SqliteStore::open(&db_path)?;
        let progression = Progression::new(classifier::from_settings(&config.classifier));

        let images_dir = db_path
            .parent()
            .map(|p| p.join("images"))
            .unwrap_or_else(|| PathBuf::from("images"));

        Ok(Self::open(store, progression)?.with_images_dir(images_dir))
    }
}

impl<St, S, K> Session<St, S, K>
where
    St: CarStore + LedgerStore,
    S: SemanticClassifier,
    K: Clock,
{
    /// Load persisted cars and ledger into `progression`
    pub fn open(store: St, mut progression: Progression<S, K>) -> Result<Self> {
        let cars = store.list().context("Failed to load collection")?;
        let ledger = store.load_ledger().context("Failed to load ledger")?;
        progression.load(cars, ledger);

        Ok(Self {
            store,
            progression,
            images_dir: None,
        })
    }

    /// Copy photos into `dir` when adding cars with an image
    pub fn with_images_dir(mut self, dir: PathBuf) -> Self {
        self.images_dir = Some(dir);
        self
    }

    pub fn progression(&self) -> &Progression<S, K> {
        &self.progression
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Classify, store and evaluate a car the caller has already identified
    pub fn add_car(&mut self, name: &str, image: Option<&Path>) -> Result<Added> {
        let car = self.progression.on_car_identified(name)?;
        self.persist_new(car, image)
    }

    /// Identify a photo and store the car in it. `None` when no car was found.
    pub fn add_photo(
        &mut self,
        recognizer: &impl CarRecognizer,
        image: &Path,
    ) -> Result<Option<Added>> {
        let bytes = std::fs::read(image)
            .with_context(|| format!("Failed to read image: {}", image.display()))?;

        match self.progression.on_image_captured(recognizer, &bytes) {
            Some(car) => self.persist_new(car, Some(image)).map(Some),
            None => Ok(None),
        }
    }

    fn persist_new(&mut self, car: CarRecord, image: Option<&Path>) -> Result<Added> {
        let CarId::Pending(seq) = car.id else {
            anyhow::bail!("Car {} is already stored", car.id);
        };

        let id = match self.store_pending(seq, image) {
            Ok(id) => id,
            Err(e) => {
                warn!(car = %car.name, error = %e, "Failed to store car, rolling back");
                if let Ok(removed) = self.progression.remove(&CarId::Pending(seq)) {
                    remove_image(removed.image_ref.as_deref());
                }
                return Err(e);
            }
        };

        let car = self
            .progression
            .car(&CarId::Stored(id))
            .cloned()
            .context("Stored car missing from collection")?;
        let unlocked = self.evaluate_stored_change();
        Ok(Added { car, unlocked })
    }

    fn store_pending(&mut self, seq: u64, image: Option<&Path>) -> Result<String> {
        if let Some(image_ref) = self.store_image(image)? {
            self.progression.attach_image(seq, image_ref)?;
        }
        let car = self
            .progression
            .car(&CarId::Pending(seq))
            .context("Pending car missing from collection")?;

        let id = self.store.create(car)?;
        self.progression.assign_id(seq, id.clone())?;
        Ok(id)
    }

    fn store_image(&self, image: Option<&Path>) -> Result<Option<String>> {
        let (Some(image), Some(dir)) = (image, &self.images_dir) else {
            return Ok(None);
        };

        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create images dir: {}", dir.display()))?;

        let ext = image.extension().and_then(|e| e.to_str()).unwrap_or("jpg");
        let target = dir.join(format!("{}.{}", uuid::Uuid::new_v4(), ext));
        std::fs::copy(image, &target)
            .with_context(|| format!("Failed to copy image: {}", image.display()))?;

        Ok(Some(target.to_string_lossy().into_owned()))
    }

    /// Re-evaluate achievements and persist any unlocks
    pub fn evaluate(&mut self) -> Result<Vec<&'static AchievementDefinition>> {
        let checkpoint = self.progression.checkpoint();
        let unlocked = self.progression.on_collection_changed();
        if !unlocked.is_empty() {
            self.save_ledger(checkpoint)?;
        }
        Ok(unlocked)
    }

    /// Evaluate after a car change the store already accepted
    fn evaluate_stored_change(&mut self) -> Vec<&'static AchievementDefinition> {
        match self.evaluate() {
            Ok(unlocked) => unlocked,
            Err(e) => {
                warn!(error = %e, "Unlocks not saved; they will be retried on the next evaluation");
                Vec::new()
            }
        }
    }

    pub fn set_favorite(
        &mut self,
        id: &str,
        favorite: bool,
    ) -> Result<Vec<&'static AchievementDefinition>> {
        let car_id = CarId::Stored(id.to_string());
        let previous = self.progression.set_favorite(&car_id, favorite)?;

        if let Err(e) = self.store.set_favorite(id, favorite) {
            warn!(id, error = %e, "Failed to save favorite, rolling back");
            self.progression.set_favorite(&car_id, previous)?;
            return Err(e);
        }
        Ok(self.evaluate_stored_change())
    }

    /// Set the note; `None` or blank text clears it
    pub fn set_note(
        &mut self,
        id: &str,
        note: Option<String>,
    ) -> Result<Vec<&'static AchievementDefinition>> {
        let car_id = CarId::Stored(id.to_string());
        let previous = self.progression.set_note(&car_id, note)?;
        let current = self
            .progression
            .car(&car_id)
            .and_then(|c| c.note.clone());

        if let Err(e) = self.store.set_note(id, current.as_deref()) {
            warn!(id, error = %e, "Failed to save note, rolling back");
            self.progression.set_note(&car_id, previous)?;
            return Err(e);
        }
        Ok(self.evaluate_stored_change())
    }

    /// Delete a car and its stored photo. Achievements stay unlocked.
    pub fn delete(&mut self, id: &str) -> Result<CarRecord> {
        let removed = self.progression.remove(&CarId::Stored(id.to_string()))?;

        match self.store.delete(id) {
            Ok(image_ref) => {
                remove_image(image_ref.as_deref());
                Ok(removed)
            }
            Err(e) => {
                warn!(id, error = %e, "Failed to delete car, rolling back");
                self.progression.restore(removed);
                Err(e)
            }
        }
    }

    pub fn claim(&mut self, key: &str) -> Result<ClaimReceipt> {
        let checkpoint = self.progression.checkpoint();
        let receipt = self.progression.claim(key)?;
        self.save_ledger(checkpoint)?;
        Ok(receipt)
    }

    /// Persist the current ledger, rolling back to `checkpoint` on failure
    fn save_ledger(&mut self, checkpoint: LedgerCheckpoint) -> Result<()> {
        if let Err(e) = self.store.save_ledger(self.progression.ledger()) {
            warn!(error = %e, "Failed to save ledger, rolling back");
            self.progression.rollback(checkpoint);
            return Err(e);
        }
        debug!(coins = self.progression.ledger().coins(), "Ledger saved");
        Ok(())
    }
}

fn remove_image(image_ref: Option<&str>) {
    let Some(path) = image_ref else {
        return;
    };
    if let Err(e) = std::fs::remove_file(path) {
        warn!(path, error = %e, "Failed to remove car image");
    }
}
