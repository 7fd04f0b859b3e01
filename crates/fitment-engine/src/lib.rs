//! Orchestration of one wheel/tire/vehicle evaluation.
//!
//! A [`FitmentSession`] validates its inputs, builds the tire envelope,
//! computes fitment metrics and runs the clearance sweep, failing fast on the
//! first error. Sessions hold only configuration; every `evaluate` call is
//! independent.

pub mod cache;
pub mod config;
pub mod error;
pub mod session;
pub mod vehicle;

pub use cache::{FitmentKey, ResultCache};
pub use config::SessionConfig;
pub use error::SessionError;
pub use session::{FitmentSession, SessionResult};
pub use vehicle::{VehicleCatalog, VehicleGeometry, VehicleSource};
