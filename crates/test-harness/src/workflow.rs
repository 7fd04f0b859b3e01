//! FitmentBuilder: fluent API for scripting fitment evaluations in tests.
//!
//! Drives the real `FitmentSession`, not a simulation. Obstacles are named
//! by their ids; wheels and tires are given as sizes and codes.

use fit_kernel::Transform;
use fit_tessellation::{tessellate_envelope_posed, TriangleMesh};
use fitment_engine::{FitmentSession, SessionConfig, SessionResult, VehicleGeometry};
use fitment_ops::{build_envelope_with, ClearanceObstacle, SuspensionGeometryModel, TireEnvelope};
use fitment_types::{TireSpec, WheelSpec};

use crate::helpers::*;
use crate::oracle::{self, OracleVerdict};

/// A fluent builder for assembling and verifying one fitment in tests.
pub struct FitmentBuilder {
    wheel: Option<WheelSpec>,
    tire: Option<TireSpec>,
    vehicle: VehicleGeometry,
    obstacles: Vec<ClearanceObstacle>,
    config: SessionConfig,
    samples: Option<(Vec<f64>, Vec<f64>)>,
    auto_check: bool,
}

impl FitmentBuilder {
    /// Neutral suspension (see [`neutral_model`]), quick sweep settings.
    pub fn new() -> Result<Self, HarnessError> {
        Ok(Self {
            wheel: None,
            tire: None,
            vehicle: vehicle("test corner", neutral_model()?, None),
            obstacles: Vec::new(),
            config: SessionConfig::quick(),
            samples: None,
            auto_check: false,
        })
    }

    /// Enable auto-checking: every evaluation runs the oracles and fails on
    /// the first failing verdict.
    pub fn with_auto_check(mut self) -> Self {
        self.auto_check = true;
        self
    }

    // ── Inputs ──────────────────────────────────────────────────────────

    pub fn wheel(&mut self, diameter_in: f64, width_in: f64, offset_mm: f64) -> Result<&mut Self, HarnessError> {
        self.wheel = Some(wheel(diameter_in, width_in, offset_mm)?);
        Ok(self)
    }

    pub fn tire(&mut self, code: &str) -> Result<&mut Self, HarnessError> {
        self.tire = Some(tire(code)?);
        Ok(self)
    }

    /// Factory wheel and tire for deltas and the speedometer flag.
    pub fn baseline(
        &mut self,
        diameter_in: f64,
        width_in: f64,
        offset_mm: f64,
        code: &str,
    ) -> Result<&mut Self, HarnessError> {
        let pair = (wheel(diameter_in, width_in, offset_mm)?, tire(code)?);
        self.vehicle = vehicle(&self.vehicle.name, self.vehicle.suspension.clone(), Some(pair));
        Ok(self)
    }

    pub fn suspension(&mut self, model: SuspensionGeometryModel) -> &mut Self {
        self.vehicle.suspension = model;
        self
    }

    pub fn obstacle(&mut self, obstacle: ClearanceObstacle) -> Result<&mut Self, HarnessError> {
        if self.obstacles.iter().any(|o| o.id == obstacle.id) {
            return Err(HarnessError::DuplicateObstacle { id: obstacle.id });
        }
        self.obstacles.push(obstacle);
        Ok(self)
    }

    pub fn config(&mut self, config: SessionConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Sweep exactly these travel positions and steering angles.
    pub fn samples(&mut self, travel: &[f64], steering: &[f64]) -> &mut Self {
        self.samples = Some((travel.to_vec(), steering.to_vec()));
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn wheel_spec(&self) -> Result<&WheelSpec, HarnessError> {
        self.wheel.as_ref().ok_or(HarnessError::MissingInput { what: "wheel" })
    }

    pub fn tire_spec(&self) -> Result<&TireSpec, HarnessError> {
        self.tire.as_ref().ok_or(HarnessError::MissingInput { what: "tire" })
    }

    pub fn vehicle_geometry(&self) -> &VehicleGeometry {
        &self.vehicle
    }

    pub fn obstacles(&self) -> &[ClearanceObstacle] {
        &self.obstacles
    }

    // ── Evaluation ──────────────────────────────────────────────────────

    /// Run the session on the current inputs.
    pub fn evaluate(&self) -> Result<SessionResult, HarnessError> {
        let (wheel, tire) = (self.wheel_spec()?, self.tire_spec()?);
        let session = FitmentSession::new(self.config.clone());
        let result = match &self.samples {
            Some((travel, steering)) => {
                session.evaluate_with_samples(wheel, tire, &self.vehicle, &self.obstacles, travel, steering)?
            }
            None => session.evaluate(wheel, tire, &self.vehicle, &self.obstacles)?,
        };

        if self.auto_check {
            let verdicts = self.check(&result)?;
            if let Some(failed) = verdicts.iter().find(|v| !v.passed) {
                return Err(HarnessError::OracleFailure {
                    oracle: failed.oracle_name.clone(),
                    detail: failed.detail.clone(),
                });
            }
        }
        Ok(result)
    }

    /// Run every oracle against `result`.
    pub fn check(&self, result: &SessionResult) -> Result<Vec<OracleVerdict>, HarnessError> {
        let (wheel, tire) = (self.wheel_spec()?, self.tire_spec()?);
        Ok(oracle::run_all(result, wheel, tire, self.config.sweep.contact_tolerance_mm))
    }

    /// The envelope the session would build.
    pub fn envelope(&self) -> Result<TireEnvelope, HarnessError> {
        let (wheel, tire) = (self.wheel_spec()?, self.tire_spec()?);
        build_envelope_with(tire, wheel, self.config.profile_resolution, &self.config.profile)
            .map_err(|e| HarnessError::InvalidFixture { detail: e.to_string() })
    }

    /// Tire frame to corner frame at one cell.
    pub fn tire_transform(&self, travel_mm: f64, steering_deg: f64) -> Result<Transform, HarnessError> {
        tire_to_corner(&self.vehicle.suspension, self.wheel_spec()?.offset_mm(), travel_mm, steering_deg)
    }

    /// Tessellate the tire where the suspension puts it at one cell.
    pub fn tessellate_at(&self, travel_mm: f64, steering_deg: f64, segments: usize) -> Result<TriangleMesh, HarnessError> {
        let envelope = self.envelope()?;
        let transform = self.tire_transform(travel_mm, steering_deg)?;
        tessellate_envelope_posed(&envelope, segments, &transform)
            .map_err(|e| HarnessError::InvalidFixture { detail: e.to_string() })
    }
}
