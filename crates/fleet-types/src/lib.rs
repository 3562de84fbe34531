//! Foundation types for the fleet custody service.
//!
//! Every other fleet crate depends on `fleet-types`. Nothing in here touches
//! storage or enforces custody rules; it only describes the records and
//! validates the drafts they are created from.
//!
//! # Key Types
//!
//! - [`Car`], [`Branch`], [`Driver`] -- stored entities
//! - [`Custody`] -- where a car currently is: unassigned, at a branch, or with a driver
//! - [`BranchInventory`], [`DriverInventory`] -- custody association rows
//! - [`NewCar`], [`NewBranch`], [`NewDriver`] -- validated drafts
//! - [`FieldErrors`] -- per-field validation failures

pub mod custody;
pub mod draft;
pub mod entity;
pub mod error;
pub mod id;
pub mod inventory;

pub use custody::Custody;
pub use draft::{FieldReader, NewBranch, NewCar, NewDriver};
pub use entity::{Branch, Car, Driver, DEFAULT_BRANCH_CAPACITY};
pub use error::FieldErrors;
pub use id::{AssociationId, BranchId, CarId, DriverId};
pub use inventory::{BranchInventory, DriverInventory};
