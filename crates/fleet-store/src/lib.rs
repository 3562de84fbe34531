//! Entity store for the fleet custody service.
//!
//! Holds car, branch and driver records together with the two custody
//! association tables. The store has no business rules beyond referential
//! integrity; custody decisions live in `fleet-custody`.
//!
//! # Tables
//!
//! - cars, branches, drivers -- plain entity records
//! - branch inventory -- car parked at a branch
//! - driver inventory -- car rented to a driver
//!
//! # Storage Backends
//!
//! All backends implement the [`FleetStore`] trait:
//!
//! - [`InMemoryFleetStore`] -- `RwLock`-guarded tables for tests and embedding
//!
//! # Design Rules
//!
//! 1. Every mutation runs inside [`FleetStore::transaction`]; a closure that
//!    returns `Err` leaves the tables exactly as they were.
//! 2. Transactions are serialized; a read inside a transaction sees every
//!    write committed before it and nothing committed after.
//! 3. Deleting a car cascades to its associations. Deleting a branch or driver
//!    that an association still references is refused.
//! 4. Identifiers are issued per table, start at 1 and are never reused.

pub mod error;
pub mod memory;
pub mod tables;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryFleetStore;
pub use tables::FleetTables;
pub use traits::FleetStore;
