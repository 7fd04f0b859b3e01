use fitment_ops::{FitmentConfig, ProfileConfig, SweepConfig};
use fitment_types::{WheelLimits, DEFAULT_RIM_TOLERANCE_IN};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Everything a session needs besides its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Samples per sidewall of the tire profile.
    pub profile_resolution: usize,
    pub profile: ProfileConfig,
    pub fitment: FitmentConfig,
    pub sweep: SweepConfig,
    /// Travel positions swept when the caller supplies none.
    pub travel_samples: usize,
    /// Steering angles swept when the caller supplies none.
    pub steering_samples: usize,
    /// Allowed difference between tire rim and wheel diameter (inches).
    pub rim_tolerance_in: f64,
    pub wheel_limits: WheelLimits,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile_resolution: 32,
            profile: ProfileConfig::default(),
            fitment: FitmentConfig::default(),
            sweep: SweepConfig::default(),
            travel_samples: 17,
            steering_samples: 15,
            rim_tolerance_in: DEFAULT_RIM_TOLERANCE_IN,
            wheel_limits: WheelLimits::default(),
        }
    }
}

impl SessionConfig {
    /// Coarse sweep for interactive previews.
    pub fn quick() -> Self {
        Self {
            profile_resolution: 12,
            travel_samples: 5,
            steering_samples: 5,
            ..Self::default()
        }
    }

    /// Dense sweep for a final sign-off.
    pub fn thorough() -> Self {
        Self {
            profile_resolution: 96,
            travel_samples: 81,
            steering_samples: 71,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        for (field, count) in [
            ("travel_samples", self.travel_samples),
            ("steering_samples", self.steering_samples),
        ] {
            if count == 0 {
                return Err(SessionError::InvalidConfig { field, value: 0.0 });
            }
        }
        if !self.rim_tolerance_in.is_finite() || self.rim_tolerance_in < 0.0 {
            return Err(SessionError::InvalidConfig {
                field: "rim_tolerance_in",
                value: self.rim_tolerance_in,
            });
        }
        if !self.wheel_limits.min_hub_clearance_mm.is_finite() || self.wheel_limits.min_hub_clearance_mm < 0.0 {
            return Err(SessionError::InvalidConfig {
                field: "min_hub_clearance_mm",
                value: self.wheel_limits.min_hub_clearance_mm,
            });
        }
        self.profile.validate()?;
        self.sweep.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_fit_default_grid_limit() {
        for config in [SessionConfig::quick(), SessionConfig::default(), SessionConfig::thorough()] {
            assert!(config.validate().is_ok());
            assert!(config.travel_samples * config.steering_samples <= config.sweep.max_grid_cells);
            assert!(config.profile_resolution >= config.profile.min_resolution);
        }
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"travel_samples": 3, "sweep": {"parallel": false}}"#).unwrap();
        assert_eq!(config.travel_samples, 3);
        assert!(!config.sweep.parallel);
        assert_eq!(config.sweep.max_grid_cells, SweepConfig::default().max_grid_cells);
        assert_eq!(config.rim_tolerance_in, DEFAULT_RIM_TOLERANCE_IN);
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let config = SessionConfig {
            rim_tolerance_in: -0.1,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SessionError::InvalidConfig {
                field: "rim_tolerance_in",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_sample_axes() {
        let config = SessionConfig {
            travel_samples: 0,
            ..SessionConfig::quick()
        };
        assert_eq!(
            config.validate(),
            Err(SessionError::InvalidConfig {
                field: "travel_samples",
                value: 0.0
            })
        );

        let config = SessionConfig {
            steering_samples: 0,
            ..SessionConfig::quick()
        };
        assert_eq!(
            config.validate(),
            Err(SessionError::InvalidConfig {
                field: "steering_samples",
                value: 0.0
            })
        );
    }
}
