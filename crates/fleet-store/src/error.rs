use fleet_types::{AssociationId, BranchId, CarId, DriverId};

/// Errors from entity store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("car not found: {0}")]
    CarNotFound(CarId),

    #[error("branch not found: {0}")]
    BranchNotFound(BranchId),

    #[error("driver not found: {0}")]
    DriverNotFound(DriverId),

    #[error("association not found: {0}")]
    AssociationNotFound(AssociationId),

    /// The branch still has cars parked at it.
    #[error("branch {branch} cannot be deleted while {cars} car(s) are assigned to it")]
    BranchInUse { branch: BranchId, cars: usize },

    /// The driver is still renting a car.
    #[error("driver {driver} cannot be deleted while renting {cars} car(s)")]
    DriverInUse { driver: DriverId, cars: usize },

    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Returns `true` for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CarNotFound(_)
                | Self::BranchNotFound(_)
                | Self::DriverNotFound(_)
                | Self::AssociationNotFound(_)
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
