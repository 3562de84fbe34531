use std::sync::Arc;

use fleet_store::{FleetStore, FleetTables};
use fleet_types::{
    Branch, BranchId, BranchInventory, Car, CarId, Custody, Driver, DriverId, DriverInventory,
};

use crate::error::{CustodyError, CustodyResult};
use crate::ledger::CustodyLedger;

/// Outcome of returning a car to a branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchAssignment {
    pub association: BranchInventory,
    /// Branch the car was moved away from, if it was at one.
    pub previous_branch: Option<Branch>,
    /// Driver who dropped the car off, if it was rented.
    pub dropped_off_by: Option<DriverId>,
    pub message: String,
}

/// Outcome of renting a car to a driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverAssignment {
    pub association: DriverInventory,
    /// Branch the car was checked out of, if it was at one.
    pub checked_out_from: Option<BranchId>,
    pub message: String,
}

/// Custody-changing operations.
///
/// Each operation is one store transaction: reads, rule checks and writes
/// commit together, and a rejected operation leaves the store untouched.
pub struct TransitionService<S> {
    store: Arc<S>,
}

impl<S> Clone for TransitionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FleetStore> TransitionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Return `car` to `branch`, dropping it off from its driver or moving it
    /// from its current branch.
    ///
    /// Fails with `CapacityExceeded` when the branch's current occupancy is
    /// already at capacity. The car's own slot counts toward occupancy, even
    /// when it is already parked at `branch`.
    pub fn assign_to_branch(&self, car: CarId, branch: BranchId) -> CustodyResult<BranchAssignment> {
        let result = self
            .store
            .transaction(|tables| Self::branch_transition(tables, car, branch));
        match &result {
            Ok(outcome) => tracing::info!(car = %car, branch = %branch, "{}", outcome.message),
            Err(err) if err.is_rule_violation() => {
                tracing::warn!(car = %car, branch = %branch, "return rejected: {err}")
            }
            Err(err) => tracing::error!(car = %car, branch = %branch, "return failed: {err}"),
        }
        result
    }

    /// Rent `car` to `driver`, checking it out of its branch if it is at one.
    ///
    /// Fails with `AlreadyAssigned` if the car already has a driver, whether
    /// that is `driver` or someone else, and with `DriverBusy` if `driver` is
    /// already renting another car.
    pub fn assign_to_driver(&self, car: CarId, driver: DriverId) -> CustodyResult<DriverAssignment> {
        let result = self
            .store
            .transaction(|tables| Self::driver_transition(tables, car, driver));
        match &result {
            Ok(outcome) => tracing::info!(car = %car, driver = %driver, "{}", outcome.message),
            Err(err) if err.is_rule_violation() => {
                tracing::warn!(car = %car, driver = %driver, "rental rejected: {err}")
            }
            Err(err) => tracing::error!(car = %car, driver = %driver, "rental failed: {err}"),
        }
        result
    }

    fn branch_transition(
        tables: &mut FleetTables,
        car_id: CarId,
        branch_id: BranchId,
    ) -> CustodyResult<BranchAssignment> {
        let car: Car = tables.car(car_id)?.clone();
        let branch: Branch = tables.branch(branch_id)?.clone();

        let ledger = CustodyLedger::new(tables);
        if ledger.count_at_branch(branch_id) >= branch.capacity as usize {
            return Err(CustodyError::CapacityExceeded { branch });
        }
        let custody = ledger.current_custody(car_id)?;

        let previous_branch = match custody.branch() {
            Some(id) => Some(tables.branch(id)?.clone()),
            None => None,
        };

        tables.remove_driver_associations_for_car(car_id);
        tables.remove_branch_associations_for_car(car_id);
        let association = tables.insert_branch_association(car_id, branch_id)?;
        tables.set_custody(car_id, Custody::AtBranch(branch_id))?;
        tracing::debug!(
            association = %association.id,
            "{}",
            BranchInventory::describe(&car, &branch)
        );

        let message = match &previous_branch {
            Some(previous) => format!("Car {car} has been moved from {previous} to {branch}"),
            None => format!("Car {car} has been returned to {branch}"),
        };

        Ok(BranchAssignment {
            association,
            previous_branch,
            dropped_off_by: custody.driver(),
            message,
        })
    }

    fn driver_transition(
        tables: &mut FleetTables,
        car_id: CarId,
        driver_id: DriverId,
    ) -> CustodyResult<DriverAssignment> {
        let car: Car = tables.car(car_id)?.clone();
        let driver: Driver = tables.driver(driver_id)?.clone();

        let ledger = CustodyLedger::new(tables);
        let custody = ledger.current_custody(car_id)?;
        if let Some(current) = custody.driver() {
            let driver = tables.driver(current)?.clone();
            return Err(CustodyError::AlreadyAssigned { car, driver });
        }
        if let Some(rented) = tables.driver_associations_of(driver_id).next() {
            let rented = tables.car(rented.car)?.clone();
            return Err(CustodyError::DriverBusy { driver, car: rented });
        }

        tables.remove_branch_associations_for_car(car_id);
        let association = tables.insert_driver_association(car_id, driver_id)?;
        tables.set_custody(car_id, Custody::WithDriver(driver_id))?;
        tracing::debug!(
            association = %association.id,
            "{}",
            DriverInventory::describe(&car, &driver)
        );

        Ok(DriverAssignment {
            association,
            checked_out_from: custody.branch(),
            message: format!("Car {car} has been assigned to Driver {driver}"),
        })
    }
}
