use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::tables::FleetTables;
use crate::traits::FleetStore;

/// In-memory fleet store.
///
/// Intended for tests and embedding. A transaction holds the write lock for
/// its whole duration and works on a copy of the tables that replaces the
/// committed state only when the closure succeeds.
pub struct InMemoryFleetStore {
    tables: RwLock<FleetTables>,
}

impl InMemoryFleetStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::with_tables(FleetTables::new())
    }

    /// Create a store seeded with existing tables.
    pub fn with_tables(tables: FleetTables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Copy of the committed tables.
    pub fn snapshot(&self) -> StoreResult<FleetTables> {
        self.read(FleetTables::clone)
    }
}

impl Default for InMemoryFleetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetStore for InMemoryFleetStore {
    fn read<R>(&self, f: impl FnOnce(&FleetTables) -> R) -> StoreResult<R> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&*tables))
    }

    fn transaction<R, E>(&self, f: impl FnOnce(&mut FleetTables) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut committed = self
            .tables
            .write()
            .map_err(|_| E::from(StoreError::LockPoisoned))?;
        // Whole-table copy: each write costs O(total rows), acceptable at fleet scale.
        let mut working = FleetTables::clone(&committed);
        match f(&mut working) {
            Ok(value) => {
                *committed = working;
                Ok(value)
            }
            Err(err) => {
                tracing::trace!("transaction rolled back");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for InMemoryFleetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = self
            .read(|t| (t.cars().count(), t.branches().count(), t.drivers().count()))
            .ok();
        f.debug_struct("InMemoryFleetStore")
            .field("counts", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use fleet_types::{CarId, Custody, NewBranch, NewCar};

    #[test]
    fn committed_writes_are_visible() {
        let store = InMemoryFleetStore::new();
        let car = store.create_car(NewCar::new("Ford", "Fiesta", 2018)).unwrap();
        let found = store.read(|t| t.car(car.id).cloned()).unwrap().unwrap();
        assert_eq!(found, car);
    }

    #[test]
    fn failed_transaction_rolls_back_every_write() {
        let store = InMemoryFleetStore::new();
        let car = store.create_car(NewCar::new("Ford", "Fiesta", 2018)).unwrap();
        let branch = store.create_branch(NewBranch::new("London", "WC2B 6ST")).unwrap();

        let result: Result<(), StoreError> = store.transaction(|t| {
            t.insert_branch_association(car.id, branch.id)?;
            t.set_custody(car.id, Custody::AtBranch(branch.id))?;
            t.car(CarId::new(99))?;
            Ok(())
        });
        assert_eq!(result.unwrap_err(), StoreError::CarNotFound(CarId::new(99)));

        let tables = store.snapshot().unwrap();
        assert_eq!(tables.branch_associations().count(), 0);
        assert!(tables.car(car.id).unwrap().custody.is_unassigned());
    }

    #[test]
    fn transaction_returns_closure_value() {
        let store = InMemoryFleetStore::new();
        let count: StoreResult<usize> = store.transaction(|t| {
            t.insert_car(NewCar::new("Ford", "Fiesta", 2018));
            t.insert_car(NewCar::new("Tesla", "Model S", 2016));
            Ok(t.cars().count())
        });
        assert_eq!(count.unwrap(), 2);
    }

    #[test]
    fn delete_through_trait() {
        let store = InMemoryFleetStore::new();
        let branch = store.create_branch(NewBranch::new("London", "WC2B 6ST")).unwrap();
        store.delete_branch(branch.id).unwrap();
        assert!(store.delete_branch(branch.id).unwrap_err().is_not_found());
    }

    #[test]
    fn concurrent_inserts_issue_distinct_ids() {
        let store = Arc::new(InMemoryFleetStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .create_car(NewCar::new("Ford", format!("Model {i}"), 2018))
                        .unwrap()
                        .id
                })
            })
            .collect();
        let mut ids: Vec<CarId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn debug_shows_counts() {
        let store = InMemoryFleetStore::new();
        store.create_car(NewCar::new("Ford", "Fiesta", 2018)).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryFleetStore"));
        assert!(debug.contains("(1, 0, 0)"));
    }
}
