use fleet_store::StoreError;
use fleet_types::{Branch, Car, CarId, Driver};

/// Errors produced by custody operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustodyError {
    /// The target branch already holds as many cars as its capacity allows.
    #[error("The branch {branch} is currently at full capacity.")]
    CapacityExceeded { branch: Branch },

    /// The car is already rented to a driver and must be returned first.
    #[error("Car {car} is already assigned to {driver}")]
    AlreadyAssigned { car: Car, driver: Driver },

    /// The driver is already renting another car and must return it first.
    #[error("Driver {driver} is already renting Car {car}")]
    DriverBusy { driver: Driver, car: Car },

    /// The association tables disagree with themselves. Never repaired
    /// automatically.
    #[error("car {car} has conflicting custody associations")]
    InconsistentState { car: CarId },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CustodyError {
    /// Returns `true` for deterministic business-rule rejections.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. }
                | Self::AlreadyAssigned { .. }
                | Self::DriverBusy { .. }
        )
    }
}

/// Result alias for custody operations.
pub type CustodyResult<T> = Result<T, CustodyError>;
