use serde::{Deserialize, Serialize};

use crate::entity::{Branch, Car, Driver};
use crate::id::{AssociationId, BranchId, CarId, DriverId};

/// Active association between a car and the branch it is parked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInventory {
    pub id: AssociationId,
    pub car: CarId,
    pub branch: BranchId,
}

impl BranchInventory {
    /// Human-readable form of the association, e.g. `ID: 1 (Ford Fiesta, 2018) is at London, WC2B 6ST`.
    pub fn describe(car: &Car, branch: &Branch) -> String {
        format!("{car} is at {branch}")
    }
}

/// Active association between a car and the driver renting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInventory {
    pub id: AssociationId,
    pub car: CarId,
    pub driver: DriverId,
}

impl DriverInventory {
    pub fn describe(car: &Car, driver: &Driver) -> String {
        format!("{car} is with {driver}")
    }
}
