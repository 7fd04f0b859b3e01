//! Structured text-based fitment reports.
//!
//! Reports are plain text first so a failing test prints something a
//! person can read; `to_json` is there for tooling that wants the data.

use std::fmt;

use fitment_engine::SessionResult;
use fitment_types::{TireSpec, WheelSpec};
use serde::Serialize;

use crate::oracle::OracleVerdict;

/// A complete fitment report with all sections.
#[derive(Debug, Clone, Serialize)]
pub struct FitmentReport {
    pub wheel: String,
    pub tire: String,
    pub dimensions: DimensionSummary,
    pub comparison: Option<ComparisonSummary>,
    pub clearance: ClearanceSummary,
    #[serde(skip)]
    pub oracle_results: Vec<OracleVerdict>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionSummary {
    pub backspacing_mm: f64,
    pub frontspacing_mm: f64,
    pub sidewall_height_mm: f64,
    pub overall_diameter_mm: f64,
    pub circumference_mm: f64,
    pub profile_points: usize,
    pub max_half_width_mm: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub scrub_delta_mm: f64,
    pub poke_delta_mm: f64,
    pub inner_delta_mm: f64,
    pub ride_height_delta_mm: f64,
    pub speedometer_error_pct: f64,
    pub speedometer_flag: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearanceSummary {
    pub cells_evaluated: usize,
    pub has_interference: bool,
    /// `(travel_mm, steering_deg, obstacle_id, clearance_mm)` in sweep order.
    pub events: Vec<(f64, f64, String, f64)>,
    /// `(distance_mm, travel_mm, steering_deg, obstacle_id)`.
    pub min_clearance: Option<(f64, f64, f64, String)>,
}

impl FitmentReport {
    /// Build a report from a session result.
    pub fn generate(wheel: &WheelSpec, tire: &TireSpec, result: &SessionResult) -> Self {
        let f = &result.fitment;
        let r = &result.interference;
        Self {
            wheel: format!(
                "{} ({}x{} ET{})",
                wheel.name(),
                wheel.diameter_in(),
                wheel.width_in(),
                wheel.offset_mm()
            ),
            tire: tire.to_string(),
            dimensions: DimensionSummary {
                backspacing_mm: f.backspacing_mm,
                frontspacing_mm: f.frontspacing_mm,
                sidewall_height_mm: f.sidewall_height_mm,
                overall_diameter_mm: f.overall_diameter_mm,
                circumference_mm: f.circumference_mm,
                profile_points: result.envelope.points().len(),
                max_half_width_mm: result.envelope.max_half_width_mm(),
            },
            comparison: f.comparison.as_ref().map(|c| ComparisonSummary {
                scrub_delta_mm: c.scrub_delta_mm,
                poke_delta_mm: c.poke_delta_mm,
                inner_delta_mm: c.inner_delta_mm,
                ride_height_delta_mm: c.ride_height_delta_mm,
                speedometer_error_pct: c.speedometer_error_pct,
                speedometer_flag: c.speedometer_flag,
            }),
            clearance: ClearanceSummary {
                cells_evaluated: r.cells_evaluated,
                has_interference: r.has_interference,
                events: r
                    .events
                    .iter()
                    .map(|e| (e.travel_mm, e.steering_deg, e.obstacle_id.clone(), e.clearance_mm))
                    .collect(),
                min_clearance: r
                    .min_clearance
                    .as_ref()
                    .map(|m| (m.distance_mm, m.travel_mm, m.steering_deg, m.obstacle_id.clone())),
            },
            oracle_results: Vec::new(),
        }
    }

    /// Attach oracle verdicts to the report.
    pub fn with_oracles(mut self, verdicts: Vec<OracleVerdict>) -> Self {
        self.oracle_results = verdicts;
        self
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Fitment Report ===\n\n");
        out.push_str(&format!("Wheel: {}\nTire:  {}\n\n", self.wheel, self.tire));

        let d = &self.dimensions;
        out.push_str("Dimensions:\n");
        out.push_str(&format!("  backspacing:     {:.2} mm\n", d.backspacing_mm));
        out.push_str(&format!("  frontspacing:    {:.2} mm\n", d.frontspacing_mm));
        out.push_str(&format!("  sidewall height: {:.2} mm\n", d.sidewall_height_mm));
        out.push_str(&format!("  overall dia.:    {:.2} mm\n", d.overall_diameter_mm));
        out.push_str(&format!("  circumference:   {:.2} mm\n", d.circumference_mm));
        out.push_str(&format!(
            "  envelope:        {} points, half-width {:.2} mm\n",
            d.profile_points, d.max_half_width_mm
        ));

        out.push_str("\nBaseline:\n");
        match &self.comparison {
            Some(c) => {
                out.push_str(&format!("  scrub delta:     {:+.2} mm\n", c.scrub_delta_mm));
                out.push_str(&format!("  poke delta:      {:+.2} mm\n", c.poke_delta_mm));
                out.push_str(&format!("  inner delta:     {:+.2} mm\n", c.inner_delta_mm));
                out.push_str(&format!("  ride height:     {:+.2} mm\n", c.ride_height_delta_mm));
                out.push_str(&format!(
                    "  speedometer:     {:+.2}%{}\n",
                    c.speedometer_error_pct,
                    if c.speedometer_flag { " [FLAGGED]" } else { "" }
                ));
            }
            None => out.push_str("  (none)\n"),
        }

        let c = &self.clearance;
        out.push_str(&format!("\nClearance ({} cells):\n", c.cells_evaluated));
        match &c.min_clearance {
            Some((dist, travel, steer, id)) => out.push_str(&format!(
                "  closest: {dist:.2} mm to {id} at travel {travel:.1} mm, steering {steer:.1}°\n"
            )),
            None => out.push_str("  closest: (no obstacles)\n"),
        }
        if c.events.is_empty() {
            out.push_str("  no interference\n");
        } else {
            out.push_str(&format!("  {} interference events:\n", c.events.len()));
            for (travel, steer, id, clearance) in &c.events {
                out.push_str(&format!(
                    "    travel {travel:>6.1} mm  steering {steer:>6.1}°  {id} ({clearance:.2} mm)\n"
                ));
            }
        }

        if !self.oracle_results.is_empty() {
            out.push_str("\nOracles:\n");
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }
        out
    }

    /// The report data as pretty JSON. Oracle verdicts are not included.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FitmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
