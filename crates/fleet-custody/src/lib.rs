//! Car custody state machine for the fleet service.
//!
//! This crate is the heart of the fleet service. It provides:
//! - [`CustodyLedger`]: read view answering "where is this car" from the
//!   association tables
//! - [`TransitionService`]: the two custody-changing operations, returning a
//!   car to a branch and renting it to a driver
//! - [`CarProjector`]: cars rendered together with whoever holds them
//! - [`CustodyAuditor`]: full-table invariant checks
//!
//! A car is in exactly one of three states: unassigned, at a branch, or with
//! a driver. Every transition runs as a single store transaction, so the
//! capacity check, the removal of the previous association, the new
//! association and the car's custody reference commit together or not at all.

pub mod audit;
pub mod error;
pub mod ledger;
pub mod projection;
pub mod transition;

pub use audit::{AuditReport, CustodyAuditor, Violation, ViolationKind};
pub use error::{CustodyError, CustodyResult};
pub use ledger::CustodyLedger;
pub use projection::{CarProjector, CarView, CurrentlyWith, UNASSIGNED_MESSAGE};
pub use transition::{BranchAssignment, DriverAssignment, TransitionService};
