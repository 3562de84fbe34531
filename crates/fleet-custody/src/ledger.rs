use fleet_store::FleetTables;
use fleet_types::{BranchId, BranchInventory, CarId, Custody, DriverInventory};

use crate::error::{CustodyError, CustodyResult};

/// Single source of truth for where a car is.
///
/// Answers come from the association tables, never from the car's cached
/// custody reference. Construct one inside a store read or transaction.
#[derive(Clone, Copy)]
pub struct CustodyLedger<'a> {
    tables: &'a FleetTables,
}

impl<'a> CustodyLedger<'a> {
    pub fn new(tables: &'a FleetTables) -> Self {
        Self { tables }
    }

    /// The car's branch association, if any.
    ///
    /// More than one row for the same car is an `InconsistentState`.
    pub fn active_branch_association(&self, car: CarId) -> CustodyResult<Option<BranchInventory>> {
        let mut rows = self.tables.branch_associations_for_car(car);
        let first = rows.next().copied();
        if rows.next().is_some() {
            return Err(CustodyError::InconsistentState { car });
        }
        Ok(first)
    }

    /// The car's driver association, if any.
    pub fn active_driver_association(&self, car: CarId) -> CustodyResult<Option<DriverInventory>> {
        let mut rows = self.tables.driver_associations_for_car(car);
        let first = rows.next().copied();
        if rows.next().is_some() {
            return Err(CustodyError::InconsistentState { car });
        }
        Ok(first)
    }

    /// Resolve the car's custody from its live associations.
    pub fn current_custody(&self, car: CarId) -> CustodyResult<Custody> {
        self.tables.car(car)?;
        let branch = self.active_branch_association(car)?;
        let driver = self.active_driver_association(car)?;
        match (branch, driver) {
            (Some(_), Some(_)) => {
                tracing::error!(car = %car, "car is associated with a branch and a driver");
                Err(CustodyError::InconsistentState { car })
            }
            (Some(row), None) => Ok(Custody::AtBranch(row.branch)),
            (None, Some(row)) => Ok(Custody::WithDriver(row.driver)),
            (None, None) => Ok(Custody::Unassigned),
        }
    }

    /// Number of cars currently associated with `branch`.
    pub fn count_at_branch(&self, branch: BranchId) -> usize {
        self.tables.branch_associations_at(branch).count()
    }
}
