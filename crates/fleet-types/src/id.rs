use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw table key.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw table key.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Primary key of a car.
    CarId,
    "CarId"
);
define_id!(
    /// Primary key of a branch.
    BranchId,
    "BranchId"
);
define_id!(
    /// Primary key of a driver.
    DriverId,
    "DriverId"
);
define_id!(
    /// Primary key of a custody association row (branch or driver inventory).
    AssociationId,
    "AssociationId"
);
