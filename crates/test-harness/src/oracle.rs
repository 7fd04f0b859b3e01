//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use fit_tessellation::TriangleMesh;
use fitment_engine::SessionResult;
use fitment_ops::{FitmentResult, InterferenceReport, TireEnvelope};
use fitment_types::{TireSpec, WheelSpec};

const EPS: f64 = 1e-9;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Interference Oracles ────────────────────────────────────────────────────

/// Events strictly ascending by (travel, steering, obstacle id).
pub fn check_event_order(report: &InterferenceReport) -> OracleVerdict {
    let name = "event_order";
    for (i, pair) in report.events.windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        let ordered = a
            .travel_mm
            .total_cmp(&b.travel_mm)
            .then_with(|| a.steering_deg.total_cmp(&b.steering_deg))
            .then_with(|| a.obstacle_id.cmp(&b.obstacle_id))
            .is_lt();
        if !ordered {
            return OracleVerdict::fail(
                name,
                format!(
                    "event {} ({}, {}, {}) not before event {} ({}, {}, {})",
                    i,
                    a.travel_mm,
                    a.steering_deg,
                    a.obstacle_id,
                    i + 1,
                    b.travel_mm,
                    b.steering_deg,
                    b.obstacle_id,
                ),
            );
        }
    }
    OracleVerdict::pass(name, format!("{} events in order", report.events.len()))
}

/// `has_interference` is set exactly when there are events.
pub fn check_interference_flag(report: &InterferenceReport) -> OracleVerdict {
    let name = "interference_flag";
    if report.has_interference == !report.events.is_empty() {
        OracleVerdict::pass(
            name,
            format!("has_interference={} with {} events", report.has_interference, report.events.len()),
        )
    } else {
        OracleVerdict::fail(
            name,
            format!("has_interference={} but {} events", report.has_interference, report.events.len()),
        )
    }
}

/// The minimum clearance is no larger than any event's clearance, sits
/// within the contact tolerance when anything interferes, and beyond it
/// otherwise.
pub fn check_min_clearance_bound(report: &InterferenceReport, contact_tolerance_mm: f64) -> OracleVerdict {
    let name = "min_clearance_bound";
    let Some(min) = &report.min_clearance else {
        return if report.events.is_empty() {
            OracleVerdict::pass(name, "no obstacles measured".into())
        } else {
            OracleVerdict::fail(name, format!("{} events but no minimum clearance", report.events.len()))
        };
    };

    if let Some(e) = report.events.iter().find(|e| e.clearance_mm < min.distance_mm - EPS) {
        return OracleVerdict::fail_val(
            name,
            format!(
                "event {} at ({}, {}) has clearance {:.4} below the minimum {:.4}",
                e.obstacle_id, e.travel_mm, e.steering_deg, e.clearance_mm, min.distance_mm
            ),
            min.distance_mm,
        );
    }

    let within = min.distance_mm <= contact_tolerance_mm;
    if within != report.has_interference {
        return OracleVerdict::fail_val(
            name,
            format!(
                "minimum clearance {:.4} vs tolerance {} disagrees with has_interference={}",
                min.distance_mm, contact_tolerance_mm, report.has_interference
            ),
            min.distance_mm,
        );
    }
    OracleVerdict::pass_val(
        name,
        format!("minimum clearance {:.4} mm against {}", min.distance_mm, min.obstacle_id),
        min.distance_mm,
    )
}

// ── Geometry Oracles ────────────────────────────────────────────────────────

/// The profile starts and ends on the bead seat, reaches the tread radius,
/// and never goes negative.
pub fn check_envelope_endpoints(envelope: &TireEnvelope, tire: &TireSpec) -> OracleVerdict {
    let name = "envelope_endpoints";
    let points = envelope.points();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return OracleVerdict::fail(name, "empty profile".into());
    };

    let bead = tire.rim_diameter_in() * 25.4 / 2.0;
    if (first.radius - bead).abs() > 1e-6 || (last.radius - bead).abs() > 1e-6 {
        return OracleVerdict::fail_val(
            name,
            format!("ends at radii {:.4} / {:.4}, bead seat {:.4}", first.radius, last.radius, bead),
            first.radius,
        );
    }
    if (first.axial + last.axial).abs() > 1e-6 {
        return OracleVerdict::fail(
            name,
            format!("bead points not mirrored: {:.4} / {:.4}", first.axial, last.axial),
        );
    }

    let peak = points.iter().map(|p| p.radius).fold(0.0, f64::max);
    let tread = tire.overall_diameter_mm() / 2.0;
    if (peak - tread).abs() > 1e-6 {
        return OracleVerdict::fail_val(name, format!("peak radius {peak:.4}, tread radius {tread:.4}"), peak);
    }
    if let Some(p) = points.iter().find(|p| p.radius < 0.0) {
        return OracleVerdict::fail_val(name, format!("negative radius {:.4}", p.radius), p.radius);
    }
    OracleVerdict::pass_val(name, format!("{} points, bead {bead:.2}, tread {tread:.2}", points.len()), peak)
}

/// Backspacing and frontspacing agree with the offset and add up to the
/// wheel width.
pub fn check_backspacing(fitment: &FitmentResult, wheel: &WheelSpec) -> OracleVerdict {
    let name = "backspacing";
    let expected = wheel.width_mm() / 2.0 - wheel.offset_mm();
    if (fitment.backspacing_mm - expected).abs() > 1e-6 {
        return OracleVerdict::fail_val(
            name,
            format!("backspacing {:.4}, expected {:.4}", fitment.backspacing_mm, expected),
            fitment.backspacing_mm,
        );
    }
    let total = fitment.backspacing_mm + fitment.frontspacing_mm;
    if (total - wheel.width_mm()).abs() > 1e-6 {
        return OracleVerdict::fail_val(
            name,
            format!("back + front = {:.4}, wheel width {:.4}", total, wheel.width_mm()),
            total,
        );
    }
    OracleVerdict::pass_val(name, format!("backspacing {:.2} mm", fitment.backspacing_mm), fitment.backspacing_mm)
}

/// Index and attribute buffers are consistent.
pub fn check_mesh_indices(mesh: &TriangleMesh) -> OracleVerdict {
    let name = "mesh_indices";
    if mesh.positions.len() % 3 != 0 || mesh.indices.len() % 3 != 0 {
        return OracleVerdict::fail(
            name,
            format!("buffer lengths {} / {} not multiples of 3", mesh.positions.len(), mesh.indices.len()),
        );
    }
    if mesh.normals.len() != mesh.positions.len() {
        return OracleVerdict::fail(
            name,
            format!("{} normals for {} positions", mesh.normals.len(), mesh.positions.len()),
        );
    }
    let count = mesh.vertex_count();
    if let Some(bad) = mesh.indices.iter().find(|&&i| i as usize >= count) {
        return OracleVerdict::fail(name, format!("index {bad} out of range ({count} vertices)"));
    }
    OracleVerdict::pass(name, format!("{} triangles over {} vertices", mesh.triangle_count(), count))
}

// ── Composite ───────────────────────────────────────────────────────────────

/// Every oracle that applies to a session result.
pub fn run_all(
    result: &SessionResult,
    wheel: &WheelSpec,
    tire: &TireSpec,
    contact_tolerance_mm: f64,
) -> Vec<OracleVerdict> {
    vec![
        check_event_order(&result.interference),
        check_interference_flag(&result.interference),
        check_min_clearance_bound(&result.interference, contact_tolerance_mm),
        check_envelope_endpoints(&result.envelope, tire),
        check_backspacing(&result.fitment, wheel),
    ]
}
