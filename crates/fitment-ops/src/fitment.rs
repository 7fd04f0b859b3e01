//! Fitment metrics for a wheel/tire pair, optionally against a baseline pair.

use fitment_types::{TireSpec, WheelSpec};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Thresholds for the fitment flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitmentConfig {
    /// Speedometer error beyond which the pair is flagged, in percent.
    pub speedometer_threshold_pct: f64,
}

impl Default for FitmentConfig {
    fn default() -> Self {
        Self {
            speedometer_threshold_pct: 3.0,
        }
    }
}

/// The reference wheel/tire pair a fitment is compared against, usually
/// the vehicle's factory fitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitmentBaseline {
    pub wheel: WheelSpec,
    pub tire: TireSpec,
}

/// Derived metrics for one wheel/tire pair. Immutable; a different input
/// produces a new result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitmentResult {
    /// Mounting face to the inner rim edge.
    pub backspacing_mm: f64,
    /// Mounting face to the outer rim edge.
    pub frontspacing_mm: f64,
    pub sidewall_height_mm: f64,
    pub overall_diameter_mm: f64,
    pub circumference_mm: f64,
    pub comparison: Option<BaselineComparison>,
}

impl FitmentResult {
    /// `false` when there is no baseline to compare with.
    pub fn speedometer_flag(&self) -> bool {
        self.comparison.as_ref().is_some_and(|c| c.speedometer_flag)
    }
}

/// Changes relative to the baseline pair. Positive deltas mean "more":
/// larger, further outboard, higher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineComparison {
    /// New offset minus baseline offset: how far the wheel centreline moved
    /// outboard, which grows the scrub radius by the same amount.
    pub scrub_delta_mm: f64,
    pub diameter_delta_pct: f64,
    pub circumference_delta_pct: f64,
    /// How far the true speed departs from the indicated one, in percent.
    /// Positive means the speedometer under-reads.
    pub speedometer_error_pct: f64,
    /// True speed when the speedometer shows 100 km/h.
    pub actual_speed_at_100_kmh: f64,
    /// Change in axle height, half the diameter change.
    pub ride_height_delta_mm: f64,
    /// Outboard movement of the outer rim face.
    pub poke_delta_mm: f64,
    /// Inboard movement of the inner rim face.
    pub inner_delta_mm: f64,
    pub speedometer_flag: bool,
}

/// Compute fitment metrics with the default thresholds.
pub fn compute_fitment(wheel: &WheelSpec, tire: &TireSpec, baseline: Option<&FitmentBaseline>) -> FitmentResult {
    compute_fitment_with(wheel, tire, baseline, &FitmentConfig::default())
}

pub fn compute_fitment_with(
    wheel: &WheelSpec,
    tire: &TireSpec,
    baseline: Option<&FitmentBaseline>,
    config: &FitmentConfig,
) -> FitmentResult {
    let backspacing = backspacing_mm(wheel);
    let frontspacing = frontspacing_mm(wheel);

    let comparison = baseline.map(|base| {
        let base_backspacing = backspacing_mm(&base.wheel);
        let base_frontspacing = frontspacing_mm(&base.wheel);
        let ratio = tire.circumference_mm() / base.tire.circumference_mm();
        let speedometer_error = (ratio - 1.0) * 100.0;
        let flag = speedometer_error.abs() > config.speedometer_threshold_pct;
        if flag {
            warn!(
                speedometer_error_pct = speedometer_error,
                threshold_pct = config.speedometer_threshold_pct,
                tire = %tire,
                baseline = %base.tire,
                "speedometer error beyond threshold"
            );
        }
        BaselineComparison {
            scrub_delta_mm: wheel.offset_mm() - base.wheel.offset_mm(),
            diameter_delta_pct: pct_change(tire.overall_diameter_mm(), base.tire.overall_diameter_mm()),
            circumference_delta_pct: pct_change(tire.circumference_mm(), base.tire.circumference_mm()),
            speedometer_error_pct: speedometer_error,
            actual_speed_at_100_kmh: 100.0 * ratio,
            ride_height_delta_mm: (tire.overall_diameter_mm() - base.tire.overall_diameter_mm()) / 2.0,
            poke_delta_mm: frontspacing - base_frontspacing,
            inner_delta_mm: backspacing - base_backspacing,
            speedometer_flag: flag,
        }
    });

    FitmentResult {
        backspacing_mm: backspacing,
        frontspacing_mm: frontspacing,
        sidewall_height_mm: tire.sidewall_height_mm(),
        overall_diameter_mm: tire.overall_diameter_mm(),
        circumference_mm: tire.circumference_mm(),
        comparison,
    }
}

fn backspacing_mm(wheel: &WheelSpec) -> f64 {
    wheel.width_mm() / 2.0 - wheel.offset_mm()
}

fn frontspacing_mm(wheel: &WheelSpec) -> f64 {
    wheel.width_mm() / 2.0 + wheel.offset_mm()
}

fn pct_change(value: f64, base: f64) -> f64 {
    (value / base - 1.0) * 100.0
}
