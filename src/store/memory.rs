//! In-memory store for tests and dry runs

use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, bail};

use super::{CarStore, LedgerStore};
use crate::domain::{CarId, CarRecord};
use crate::progression::ProgressionLedger;

#[derive(Default)]
struct State {
    cars: Vec<CarRecord>,
    ledger: ProgressionLedger,
    next_id: u64,
    read_only: bool,
}

/// Keeps everything in a mutex-guarded vector
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write while set; reads keep working
    pub fn set_read_only(&self, read_only: bool) {
        self.state().read_only = read_only;
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("Memory store lock poisoned")
    }

    fn writable(&self) -> Result<MutexGuard<'_, State>> {
        let state = self.state();
        if state.read_only {
            bail!("Store is read-only");
        }
        Ok(state)
    }
}

fn find<'a>(cars: &'a mut [CarRecord], id: &str) -> Result<&'a mut CarRecord> {
    match cars.iter_mut().find(|c| c.id.stored() == Some(id)) {
        Some(car) => Ok(car),
        None => bail!("No car with id {}", id),
    }
}

impl CarStore for MemoryStore {
    fn create(&self, record: &CarRecord) -> Result<String> {
        let mut state = self.writable()?;
        state.next_id += 1;
        let id = format!("mem-{}", state.next_id);

        let mut stored = record.clone();
        stored.id = CarId::Stored(id.clone());
        state.cars.push(stored);
        Ok(id)
    }

    fn set_favorite(&self, id: &str, favorite: bool) -> Result<()> {
        let mut state = self.writable()?;
        find(&mut state.cars, id)?.favorite = favorite;
        Ok(())
    }

    fn set_note(&self, id: &str, note: Option<&str>) -> Result<()> {
        let mut state = self.writable()?;
        find(&mut state.cars, id)?.note = note.map(str::to_string);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<Option<String>> {
        let mut state = self.writable()?;
        let Some(index) = state.cars.iter().position(|c| c.id.stored() == Some(id)) else {
            bail!("No car with id {}", id);
        };
        Ok(state.cars.remove(index).image_ref)
    }

    fn list(&self) -> Result<Vec<CarRecord>> {
        let mut cars = self.state().cars.clone();
        cars.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        Ok(cars)
    }
}

impl LedgerStore for MemoryStore {
    fn load_ledger(&self) -> Result<ProgressionLedger> {
        Ok(self.state().ledger.clone())
    }

    fn save_ledger(&self, ledger: &ProgressionLedger) -> Result<()> {
        self.writable()?.ledger = ledger.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RarityTier;
    use chrono::{TimeZone, Utc};

    fn car(name: &str, hour: u32) -> CarRecord {
        CarRecord {
            id: CarId::Pending(0),
            name: name.to_string(),
            rarity: RarityTier::Uncommon,
            points: 25,
            captured_at: Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap(),
            note: None,
            favorite: false,
            image_ref: Some(format!("{name}.jpg")),
        }
    }

    #[test]
    fn test_create_list_delete() {
        let store = MemoryStore::new();
        let first = store.create(&car("Audi A4", 8)).unwrap();
        store.create(&car("Volvo XC60", 9)).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Volvo XC60", "Audi A4"]);

        assert_eq!(store.delete(&first).unwrap(), Some("Audi A4.jpg".to_string()));
        assert!(store.delete(&first).is_err());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let store = MemoryStore::new();
        let id = store.create(&car("Audi A4", 8)).unwrap();

        store.set_read_only(true);
        assert!(store.set_favorite(&id, true).is_err());
        assert!(store.save_ledger(&ProgressionLedger::new()).is_err());
        assert!(!store.list().unwrap()[0].favorite);
    }
}
