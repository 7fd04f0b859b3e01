use std::collections::HashSet;

use fitment_ops::{
    build_envelope_with, compute_fitment_with, CancellationToken, ClearanceObstacle, ClearanceValidator,
    FitmentError, FitmentResult, InterferenceReport, TireEnvelope,
};
use fitment_types::{check_rim_compatibility, SpecStore, TireId, TireSpec, VehicleId, WheelId, WheelSpec};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::vehicle::{VehicleGeometry, VehicleSource};

/// Everything the presentation layer needs for one wheel/tire/vehicle
/// combination. Only ever returned complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResult {
    pub envelope: TireEnvelope,
    pub fitment: FitmentResult,
    pub interference: InterferenceReport,
}

impl SessionResult {
    /// No interference and no speedometer flag.
    pub fn is_clean(&self) -> bool {
        !self.interference.has_interference && !self.fitment.speedometer_flag()
    }
}

/// Runs evaluations with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct FitmentSession {
    config: SessionConfig,
}

/// Explicit sample sets, or `None` to derive them from the config.
type Samples<'a> = Option<(&'a [f64], &'a [f64])>;

impl FitmentSession {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Evaluate over the configured travel × steering grid.
    #[instrument(skip_all, fields(wheel = wheel.name(), tire = %tire, vehicle = %vehicle.id))]
    pub fn evaluate(
        &self,
        wheel: &WheelSpec,
        tire: &TireSpec,
        vehicle: &VehicleGeometry,
        obstacles: &[ClearanceObstacle],
    ) -> Result<SessionResult, SessionError> {
        self.run(wheel, tire, vehicle, obstacles, None, None)
    }

    /// As [`evaluate`](Self::evaluate); a cancelled sweep fails with
    /// [`FitmentError::SweepAborted`].
    #[instrument(skip_all, fields(wheel = wheel.name(), tire = %tire, vehicle = %vehicle.id))]
    pub fn evaluate_with_cancel(
        &self,
        wheel: &WheelSpec,
        tire: &TireSpec,
        vehicle: &VehicleGeometry,
        obstacles: &[ClearanceObstacle],
        cancel: &CancellationToken,
    ) -> Result<SessionResult, SessionError> {
        self.run(wheel, tire, vehicle, obstacles, None, Some(cancel))
    }

    /// Evaluate at caller-chosen travel positions and steering angles.
    #[instrument(skip_all, fields(wheel = wheel.name(), tire = %tire, vehicle = %vehicle.id))]
    pub fn evaluate_with_samples(
        &self,
        wheel: &WheelSpec,
        tire: &TireSpec,
        vehicle: &VehicleGeometry,
        obstacles: &[ClearanceObstacle],
        travel_samples: &[f64],
        steering_samples: &[f64],
    ) -> Result<SessionResult, SessionError> {
        self.run(wheel, tire, vehicle, obstacles, Some((travel_samples, steering_samples)), None)
    }

    /// Resolve the specs and vehicle by id, then evaluate.
    #[instrument(skip(self, specs, vehicles))]
    pub fn evaluate_stored(
        &self,
        specs: &dyn SpecStore,
        vehicles: &dyn VehicleSource,
        wheel_id: WheelId,
        tire_id: TireId,
        vehicle_id: VehicleId,
    ) -> Result<SessionResult, SessionError> {
        let wheel = specs.get_wheel_spec(wheel_id)?;
        let tire = specs.get_tire_spec(tire_id)?;
        let vehicle = vehicles.vehicle(vehicle_id)?;
        let obstacles = vehicles.obstacles(vehicle_id)?;
        self.run(&wheel, &tire, &vehicle, &obstacles, None, None)
    }

    fn run(
        &self,
        wheel: &WheelSpec,
        tire: &TireSpec,
        vehicle: &VehicleGeometry,
        obstacles: &[ClearanceObstacle],
        samples: Samples<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<SessionResult, SessionError> {
        let config = &self.config;
        let model = &vehicle.suspension;

        let (travel, steering) = match samples {
            Some((t, s)) => (t.to_vec(), s.to_vec()),
            None => (
                model.travel_samples(config.travel_samples),
                model.steering_samples(config.steering_samples),
            ),
        };
        self.validate_inputs(wheel, tire, vehicle, obstacles, &travel, &steering)?;
        debug!(travel = travel.len(), steering = steering.len(), "inputs validated");

        let envelope = build_envelope_with(tire, wheel, config.profile_resolution, &config.profile)?;
        let fitment = compute_fitment_with(wheel, tire, vehicle.baseline.as_ref(), &config.fitment);

        let mut validator = ClearanceValidator::new(config.sweep);
        if let Some(token) = cancel {
            validator = validator.with_cancellation(token.clone());
        }
        let interference = validator.check(&envelope, model, obstacles, &travel, &steering)?;

        info!(
            backspacing_mm = fitment.backspacing_mm,
            speedometer_flag = fitment.speedometer_flag(),
            has_interference = interference.has_interference,
            events = interference.events.len(),
            "session complete"
        );

        Ok(SessionResult {
            envelope,
            fitment,
            interference,
        })
    }

    /// Every check that can fail before geometry is built.
    fn validate_inputs(
        &self,
        wheel: &WheelSpec,
        tire: &TireSpec,
        vehicle: &VehicleGeometry,
        obstacles: &[ClearanceObstacle],
        travel: &[f64],
        steering: &[f64],
    ) -> Result<(), SessionError> {
        let config = &self.config;
        config.validate()?;
        wheel.check_limits(&config.wheel_limits)?;
        check_rim_compatibility(tire, wheel, config.rim_tolerance_in).map_err(FitmentError::from)?;
        if config.profile_resolution < config.profile.min_resolution {
            return Err(FitmentError::DegenerateProfileResolution {
                resolution: config.profile_resolution,
                min: config.profile.min_resolution,
            }
            .into());
        }

        let mut seen = HashSet::new();
        for obstacle in obstacles {
            obstacle.validate()?;
            if !seen.insert(obstacle.id.as_str()) {
                return Err(SessionError::DuplicateObstacle {
                    id: obstacle.id.clone(),
                });
            }
        }

        for &t in travel {
            vehicle.suspension.check_travel(t)?;
        }
        for &s in steering {
            vehicle.suspension.check_steering(s)?;
        }
        let cells = travel.len().saturating_mul(steering.len());
        if cells > config.sweep.max_grid_cells {
            return Err(FitmentError::SampleGridTooLarge {
                cells,
                limit: config.sweep.max_grid_cells,
            }
            .into());
        }
        Ok(())
    }
}
