//! Validated value types for wheel/tire fitment.
//!
//! Specs arrive from the outside world as loosely typed records
//! ([`RawWheelSpec`], [`RawTireSpec`]) and only become [`WheelSpec`] /
//! [`TireSpec`] after passing the size codec. Serde deserialisation goes
//! through the same checks, so an invalid record never reaches the engine.

pub mod codec;
pub mod errors;
pub mod ids;
pub mod store;
pub mod tire;
pub mod wheel;

pub use codec::{check_rim_compatibility, parse_tire_size, validate_wheel_spec, validate_wheel_spec_with};
pub use errors::{SpecError, StoreError, WheelSpecErrors};
pub use ids::{TireId, VehicleId, WheelId};
pub use store::SpecStore;
pub use tire::{RawTireSpec, ServiceDescription, SpeedRating, TireSpec};
pub use wheel::{BoltPattern, LoadRating, LoadUnit, RawWheelSpec, WheelLimits, WheelSpec};

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Default tolerance when matching a tire's rim diameter to a wheel (inches).
pub const DEFAULT_RIM_TOLERANCE_IN: f64 = 0.05;
