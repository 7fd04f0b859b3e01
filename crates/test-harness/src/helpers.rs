//! Helper functions: error types, spec fixtures, obstacle constructors, pose math.

use fit_kernel::{BoundingBox, Capsule, ConvexHull, Point3d, Sphere, Transform, Vec3};
use fitment_engine::{SessionError, VehicleGeometry};
use fitment_ops::{ClearanceObstacle, FitmentBaseline, ObstacleVolume, SuspensionGeometryModel};
use fitment_types::{parse_tire_size, validate_wheel_spec, RawWheelSpec, TireSpec, VehicleId, WheelSpec};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("missing input: {what}")]
    MissingInput { what: &'static str },

    #[error("invalid fixture: {detail}")]
    InvalidFixture { detail: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("duplicate obstacle: {id}")]
    DuplicateObstacle { id: String },
}

fn fixture_error(e: impl std::fmt::Display) -> HarnessError {
    HarnessError::InvalidFixture { detail: e.to_string() }
}

// ── Spec Fixtures ───────────────────────────────────────────────────────────

/// A 5x114.3 wheel with the given size and offset.
pub fn wheel(diameter_in: f64, width_in: f64, offset_mm: f64) -> Result<WheelSpec, HarnessError> {
    validate_wheel_spec(&RawWheelSpec {
        name: format!("{diameter_in}x{width_in} ET{offset_mm}"),
        diameter: diameter_in,
        width: width_in,
        offset: offset_mm,
        bolt_pattern: "5x114.3".into(),
        center_bore: 64.1,
        load_rating: 690,
        load_unit: Default::default(),
    })
    .map_err(fixture_error)
}

pub fn tire(code: &str) -> Result<TireSpec, HarnessError> {
    parse_tire_size(code).map_err(fixture_error)
}

/// Linear suspension with the wheel centre moving straight up with travel.
pub fn gains_model(
    travel: (f64, f64),
    static_camber_deg: f64,
    camber_gain: f64,
    bump_steer: f64,
    lock_deg: f64,
) -> Result<SuspensionGeometryModel, HarnessError> {
    SuspensionGeometryModel::from_gains(travel.0, travel.1, static_camber_deg, camber_gain, bump_steer, lock_deg)
        .map_err(fixture_error)
}

/// Travel [-30, 50] mm, no camber or toe change, ±35° lock.
pub fn neutral_model() -> Result<SuspensionGeometryModel, HarnessError> {
    gains_model((-30.0, 50.0), 0.0, 0.0, 0.0, 35.0)
}

pub fn vehicle(
    name: &str,
    suspension: SuspensionGeometryModel,
    baseline: Option<(WheelSpec, TireSpec)>,
) -> VehicleGeometry {
    VehicleGeometry {
        id: VehicleId::new(),
        name: name.to_string(),
        suspension,
        baseline: baseline.map(|(wheel, tire)| FitmentBaseline { wheel, tire }),
    }
}

// ── Obstacle Constructors ───────────────────────────────────────────────────

pub fn sphere_obstacle(id: &str, center: Point3d, radius: f64) -> Result<ClearanceObstacle, HarnessError> {
    let sphere = Sphere::new(center, radius).map_err(fixture_error)?;
    Ok(ClearanceObstacle::chassis(id, ObstacleVolume::Sphere(sphere)))
}

pub fn capsule_obstacle(id: &str, a: Point3d, b: Point3d, radius: f64) -> Result<ClearanceObstacle, HarnessError> {
    let capsule = Capsule::new(a, b, radius).map_err(fixture_error)?;
    Ok(ClearanceObstacle::chassis(id, ObstacleVolume::Capsule(capsule)))
}

/// Sphere bolted to the upright, given in the hub frame: it steers and
/// travels with the wheel.
pub fn caliper_obstacle(id: &str, center: Point3d, radius: f64) -> Result<ClearanceObstacle, HarnessError> {
    let sphere = Sphere::new(center, radius).map_err(fixture_error)?;
    Ok(ClearanceObstacle::upright(id, ObstacleVolume::Sphere(sphere)))
}

/// Axis-aligned box as an eight-point hull.
pub fn box_obstacle(id: &str, min: Point3d, max: Point3d) -> Result<ClearanceObstacle, HarnessError> {
    let hull = ConvexHull::from_box(&BoundingBox::new(min, max)).map_err(fixture_error)?;
    Ok(ClearanceObstacle::chassis(id, ObstacleVolume::Hull(hull)))
}

// ── Pose Math ───────────────────────────────────────────────────────────────

/// Tire frame to corner frame for a wheel of `wheel_offset_mm` at one
/// (travel, steering) cell.
pub fn tire_to_corner(
    model: &SuspensionGeometryModel,
    wheel_offset_mm: f64,
    travel_mm: f64,
    steering_deg: f64,
) -> Result<Transform, HarnessError> {
    model.check_steering(steering_deg).map_err(fixture_error)?;
    let pose = model.sample_at(travel_mm).map_err(fixture_error)?;
    let hub = model.hub_transform(&pose, steering_deg);
    Ok(Transform::translation(0.0, wheel_offset_mm, 0.0).then(&hub))
}

/// Point on the tread at `angle_deg` from the forward axis towards the top
/// and `axial_mm` from the tire centreline, in the tire frame.
pub fn tread_point(tread_radius_mm: f64, angle_deg: f64, axial_mm: f64) -> Point3d {
    let a = angle_deg.to_radians();
    Point3d::new(tread_radius_mm * a.cos(), axial_mm, tread_radius_mm * a.sin())
}

/// Centre for a sphere of `radius` that overlaps the tread by `depth` at the
/// given tread point, in the tire frame.
pub fn sphere_center_overlapping(tread: Point3d, radius: f64, depth: f64) -> Point3d {
    let radial = Vec3::new(tread.x, 0.0, tread.z);
    match radial.normalized() {
        Some(n) => tread + n * (radius - depth),
        None => tread,
    }
}
