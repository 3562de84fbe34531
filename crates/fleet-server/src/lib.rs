//! HTTP server for the fleet custody service.
//!
//! Exposes cars, branches and drivers over a JSON REST API, together with
//! the two custody transitions (return a car to a branch, rent it to a
//! driver). Branch postcodes are checked through a pluggable
//! [`PostcodeValidator`].

pub mod config;
pub mod error;
pub mod handler;
pub mod postcode;
pub mod request;
pub mod router;
pub mod server;
pub mod state;

pub use config::{PostcodeConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use postcode::{AcceptAllPostcodes, PostcodeCheck, PostcodeValidator, PostcodesIoValidator};
pub use server::FleetServer;
pub use state::AppState;
