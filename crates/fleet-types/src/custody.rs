use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{BranchId, DriverId};

/// Which single entity a car is currently with.
///
/// A car is never with a branch and a driver at the same time; the sum type
/// makes that unrepresentable on the car record itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum Custody {
    /// Not with any branch or driver.
    #[default]
    Unassigned,
    /// Parked at a branch.
    AtBranch(BranchId),
    /// Rented out to a driver.
    WithDriver(DriverId),
}

impl Custody {
    /// Returns `true` if the car is with nobody.
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Self::Unassigned)
    }

    /// The branch holding the car, if any.
    pub fn branch(&self) -> Option<BranchId> {
        match self {
            Self::AtBranch(id) => Some(*id),
            _ => None,
        }
    }

    /// The driver holding the car, if any.
    pub fn driver(&self) -> Option<DriverId> {
        match self {
            Self::WithDriver(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Custody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => write!(f, "unassigned"),
            Self::AtBranch(id) => write!(f, "branch {id}"),
            Self::WithDriver(id) => write!(f, "driver {id}"),
        }
    }
}
