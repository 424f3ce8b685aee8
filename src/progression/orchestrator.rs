//! Composition of classifier, leveling and achievements over one collection

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::achievements::{
    AchievementDefinition, AchievementEngine, ClaimReceipt, Clock, CollectionStats,
    ProgressionLedger,
};
use super::error::ProgressionError;
use super::levels::{PlayerStats, level_for};
use crate::classifier::{RarityClassifier, SemanticClassifier};
use crate::domain::{CarId, CarRecord, MAX_NOTE_CHARS};
use crate::recognition::{CarRecognizer, Recognition, normalize_name};

/// Ledger state saved by [`Progression::checkpoint`]
#[derive(Debug, Clone)]
pub struct LedgerCheckpoint {
    ledger: ProgressionLedger,
    has_new: bool,
}

/// Owns the in-memory collection snapshot and the reward ledger.
///
/// Persistence is the caller's business: records are handed out with a
/// pending id and the store-assigned id is attached with [`assign_id`].
///
/// [`assign_id`]: Progression::assign_id
pub struct Progression<S, K = fn() -> DateTime<Utc>> {
    classifier: RarityClassifier<S>,
    engine: AchievementEngine<K>,
    cars: Vec<CarRecord>,
    ledger: ProgressionLedger,
    has_new: bool,
    next_seq: u64,
}

impl<S: SemanticClassifier> Progression<S> {
    pub fn new(classifier: RarityClassifier<S>) -> Self {
        Self::with_engine(classifier, AchievementEngine::new())
    }
}

impl<S: SemanticClassifier, K: Clock> Progression<S, K> {
    pub fn with_engine(classifier: RarityClassifier<S>, engine: AchievementEngine<K>) -> Self {
        Self {
            classifier,
            engine,
            cars: Vec::new(),
            ledger: ProgressionLedger::new(),
            has_new: false,
            next_seq: 0,
        }
    }

    /// Replace the snapshot with previously persisted state
    pub fn load(&mut self, cars: Vec<CarRecord>, ledger: ProgressionLedger) {
        debug!(cars = cars.len(), unlocked = ledger.unlocked_count(), "Loaded progression state");
        self.cars = cars;
        self.ledger = ledger;
    }

    pub fn classifier(&self) -> &RarityClassifier<S> {
        &self.classifier
    }

    pub fn engine(&self) -> &AchievementEngine<K> {
        &self.engine
    }

    pub fn cars(&self) -> &[CarRecord] {
        &self.cars
    }

    pub fn car(&self, id: &CarId) -> Option<&CarRecord> {
        self.cars.iter().find(|c| &c.id == id)
    }

    pub fn ledger(&self) -> &ProgressionLedger {
        &self.ledger
    }

    /// Classify a recognized name and add it to the snapshot.
    ///
    /// Points are stamped from the tier now and never recomputed. A blank
    /// name is rejected before it reaches the classifier.
    pub fn on_car_identified(&mut self, name: &str) -> Result<CarRecord, ProgressionError> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(ProgressionError::BlankName);
        }
        let rarity = self.classifier.classify(&name);

        let record = CarRecord {
            id: CarId::Pending(self.next_seq),
            name,
            rarity,
            points: rarity.points(),
            captured_at: self.engine.now(),
            note: None,
            favorite: false,
            image_ref: None,
        };
        self.next_seq += 1;

        info!(car = %record.name, %rarity, points = record.points, "Car collected");
        self.cars.push(record.clone());
        Ok(record)
    }

    /// Run recognition on a photo. No record is produced unless a car was
    /// identified.
    pub fn on_image_captured(
        &mut self,
        recognizer: &impl CarRecognizer,
        image: &[u8],
    ) -> Option<CarRecord> {
        match recognizer.identify(image) {
            Ok(Recognition::Car(name)) => match self.on_car_identified(&name) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Recognized car rejected");
                    None
                }
            },
            Ok(Recognition::NotACar) => {
                debug!("No car in image");
                None
            }
            Err(e) => {
                warn!(error = %e, "Car recognition failed");
                None
            }
        }
    }

    /// Attach the store-assigned id to a pending record
    pub fn assign_id(&mut self, seq: u64, id: String) -> Result<(), ProgressionError> {
        let car = self
            .cars
            .iter_mut()
            .find(|c| c.id == CarId::Pending(seq))
            .ok_or(ProgressionError::NotPending(seq))?;
        car.id = CarId::Stored(id);
        Ok(())
    }

    /// Reference the stored photo of a record that is still pending
    pub fn attach_image(&mut self, seq: u64, image_ref: String) -> Result<(), ProgressionError> {
        let car = self
            .cars
            .iter_mut()
            .find(|c| c.id == CarId::Pending(seq))
            .ok_or(ProgressionError::NotPending(seq))?;
        car.image_ref = Some(image_ref);
        Ok(())
    }

    /// Re-evaluate achievements against the current snapshot
    pub fn on_collection_changed(&mut self) -> Vec<&'static AchievementDefinition> {
        let stats = CollectionStats::from_records(&self.cars);
        let total_points = self.total_points();
        let unlocked =
            self.engine
                .evaluate_stats(&mut self.ledger, &stats, level_for(total_points), total_points);

        if !unlocked.is_empty() {
            self.has_new = true;
        }
        unlocked
    }

    /// Returns the previous flag
    pub fn set_favorite(&mut self, id: &CarId, favorite: bool) -> Result<bool, ProgressionError> {
        let car = self.car_mut(id)?;
        Ok(std::mem::replace(&mut car.favorite, favorite))
    }

    /// Set or clear a note; blank text clears. Returns the previous note.
    pub fn set_note(
        &mut self,
        id: &CarId,
        note: Option<String>,
    ) -> Result<Option<String>, ProgressionError> {
        let note = note.filter(|n| !n.trim().is_empty());
        if let Some(text) = &note {
            let len = text.chars().count();
            if len > MAX_NOTE_CHARS {
                return Err(ProgressionError::NoteTooLong {
                    len,
                    max: MAX_NOTE_CHARS,
                });
            }
        }

        let car = self.car_mut(id)?;
        Ok(std::mem::replace(&mut car.note, note))
    }

    /// Drop a record from the snapshot. Unlocked achievements stay unlocked.
    pub fn remove(&mut self, id: &CarId) -> Result<CarRecord, ProgressionError> {
        let index = self
            .cars
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ProgressionError::UnknownCar(id.to_string()))?;
        Ok(self.cars.remove(index))
    }

    /// Put back a record taken out by [`remove`](Progression::remove)
    pub fn restore(&mut self, record: CarRecord) {
        self.cars.push(record);
    }

    /// Capture the ledger and the new-unlock flag before a change
    pub fn checkpoint(&self) -> LedgerCheckpoint {
        LedgerCheckpoint {
            ledger: self.ledger.clone(),
            has_new: self.has_new,
        }
    }

    /// Undo every ledger change made since `checkpoint` was taken
    pub fn rollback(&mut self, checkpoint: LedgerCheckpoint) {
        self.ledger = checkpoint.ledger;
        self.has_new = checkpoint.has_new;
    }

    /// Claim an achievement; coins go to the ledger and XP to its bonus pool
    pub fn claim(&mut self, key: &str) -> Result<ClaimReceipt, ProgressionError> {
        let receipt = self.engine.claim(&mut self.ledger, key)?;
        if receipt.xp > 0 {
            self.ledger.add_bonus_xp(receipt.xp);
        }
        Ok(receipt)
    }

    /// Points of every car in the snapshot
    pub fn collection_points(&self) -> u64 {
        self.cars.iter().map(|c| c.points).sum()
    }

    /// Points that drive leveling: car points plus claimed XP
    pub fn total_points(&self) -> u64 {
        self.collection_points().saturating_add(self.ledger.bonus_xp())
    }

    pub fn player_stats(&self) -> PlayerStats {
        PlayerStats::new(self.total_points())
    }

    pub fn has_unclaimed(&self) -> bool {
        self.ledger.has_unclaimed()
    }

    /// Whether anything unlocked since the last [`acknowledge_new`](Progression::acknowledge_new)
    pub fn has_new_achievements(&self) -> bool {
        self.has_new
    }

    pub fn acknowledge_new(&mut self) {
        self.has_new = false;
    }

    fn car_mut(&mut self, id: &CarId) -> Result<&mut CarRecord, ProgressionError> {
        self.cars
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ProgressionError::UnknownCar(id.to_string()))
    }
}
