use std::fmt;

use crate::ids::{TireId, VehicleId, WheelId};

/// A wheel or tire spec failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    #[error("malformed size code {code:?}: {reason}")]
    MalformedSizeCode { code: String, reason: &'static str },

    #[error("{field} = {value} is outside the plausible range [{min}, {max}]")]
    OutOfRangeDimension {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} = {value} has more than one decimal place")]
    ExcessPrecision { field: &'static str, value: f64 },

    #[error("malformed bolt pattern {pattern:?}")]
    MalformedBoltPattern { pattern: String },

    #[error("unsupported bolt count {count}, expected 4, 5, 6 or 8")]
    UnsupportedBoltCount { count: u32 },

    #[error(
        "tire rim diameter {tire_in}\" does not match wheel diameter {wheel_in}\" (tolerance {tolerance_in}\")"
    )]
    IncompatibleRimDiameter {
        tire_in: f64,
        wheel_in: f64,
        tolerance_in: f64,
    },
}

/// Every field error found while validating one wheel record.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelSpecErrors(pub Vec<SpecError>);

impl WheelSpecErrors {
    pub fn errors(&self) -> &[SpecError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any error refers to the named field.
    pub fn has_field(&self, name: &str) -> bool {
        self.0.iter().any(|e| match e {
            SpecError::OutOfRangeDimension { field, .. } | SpecError::ExcessPrecision { field, .. } => {
                *field == name
            }
            SpecError::MalformedBoltPattern { .. } | SpecError::UnsupportedBoltCount { .. } => {
                name == "bolt_pattern"
            }
            _ => false,
        })
    }
}

impl fmt::Display for WheelSpecErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid wheel spec")?;
        for (i, err) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for WheelSpecErrors {}

/// Failures reported by a spec or vehicle store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("wheel {0} not found")]
    WheelNotFound(WheelId),

    #[error("tire {0} not found")]
    TireNotFound(TireId),

    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),

    #[error("store backend error: {0}")]
    Backend(String),
}
