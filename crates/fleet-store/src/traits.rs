use fleet_types::{Branch, BranchId, Car, CarId, Driver, DriverId, NewBranch, NewCar, NewDriver};

use crate::error::{StoreError, StoreResult};
use crate::tables::FleetTables;

/// Transactional store of fleet tables.
///
/// All implementations must satisfy these invariants:
/// - `transaction` is atomic: if the closure returns `Err`, none of its
///   writes are visible afterwards.
/// - `transaction` is isolated: transactions are serialized, so a
///   read-then-write inside one closure cannot interleave with another.
/// - `read` observes only committed state.
pub trait FleetStore: Send + Sync {
    /// Run `f` against a consistent, read-only view of the tables.
    fn read<R>(&self, f: impl FnOnce(&FleetTables) -> R) -> StoreResult<R>;

    /// Run `f` as one atomic, isolated unit of work.
    ///
    /// Writes made by `f` are committed only if it returns `Ok`.
    fn transaction<R, E>(&self, f: impl FnOnce(&mut FleetTables) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>;

    fn create_car(&self, draft: NewCar) -> StoreResult<Car> {
        self.transaction(|tables| Ok(tables.insert_car(draft)))
    }

    fn create_branch(&self, draft: NewBranch) -> StoreResult<Branch> {
        self.transaction(|tables| Ok(tables.insert_branch(draft)))
    }

    fn create_driver(&self, draft: NewDriver) -> StoreResult<Driver> {
        self.transaction(|tables| Ok(tables.insert_driver(draft)))
    }

    fn delete_car(&self, id: CarId) -> StoreResult<Car> {
        self.transaction(|tables| tables.delete_car(id))
    }

    fn delete_branch(&self, id: BranchId) -> StoreResult<Branch> {
        self.transaction(|tables| tables.delete_branch(id))
    }

    fn delete_driver(&self, id: DriverId) -> StoreResult<Driver> {
        self.transaction(|tables| tables.delete_driver(id))
    }
}
