//! Tests for the FitmentBuilder workflow API.

use approx::assert_relative_eq;
use fit_kernel::Point3d;
use test_harness::helpers::*;
use test_harness::{FitmentBuilder, HarnessError};

#[test]
fn evaluate_requires_wheel_and_tire() {
    let mut b = FitmentBuilder::new().unwrap();
    assert!(matches!(b.evaluate(), Err(HarnessError::MissingInput { what: "wheel" })));
    b.wheel(17.0, 8.5, 35.0).unwrap();
    assert!(matches!(b.evaluate(), Err(HarnessError::MissingInput { what: "tire" })));
    b.tire("225/45R17").unwrap();
    assert!(b.evaluate().is_ok());
}

#[test]
fn bad_fixtures_are_reported() {
    let mut b = FitmentBuilder::new().unwrap();
    assert!(matches!(b.tire("225/45/17"), Err(HarnessError::InvalidFixture { .. })));
    assert!(matches!(b.wheel(40.0, 8.5, 35.0), Err(HarnessError::InvalidFixture { .. })));
}

#[test]
fn tire_transform_places_centre_at_offset() {
    let mut b = FitmentBuilder::new().unwrap();
    b.wheel(17.0, 8.5, 35.0).unwrap();
    let centre = b.tire_transform(20.0, 0.0).unwrap().transform_point(&Point3d::ORIGIN);
    assert_relative_eq!(centre.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(centre.y, 35.0, epsilon = 1e-12);
    assert_relative_eq!(centre.z, 20.0, epsilon = 1e-12);
}

#[test]
fn tire_transform_checks_domain() {
    let mut b = FitmentBuilder::new().unwrap();
    b.wheel(17.0, 8.5, 35.0).unwrap();
    assert!(b.tire_transform(80.0, 0.0).is_err());
    assert!(b.tire_transform(0.0, 36.0).is_err());
}

#[test]
fn suspension_swap_changes_sweep_domain() {
    let mut b = FitmentBuilder::new().unwrap();
    b.wheel(17.0, 8.5, 35.0).unwrap().tire("225/45R17").unwrap();
    b.suspension(gains_model((-80.0, 100.0), -1.0, -0.01, 0.0, 40.0).unwrap());
    b.samples(&[80.0], &[38.0]);
    assert!(b.evaluate().is_ok());
    assert_eq!(b.vehicle_geometry().suspension.travel_domain(), (-80.0, 100.0));
}

#[test]
fn baseline_keeps_suspension() {
    let mut b = FitmentBuilder::new().unwrap();
    b.suspension(gains_model((-50.0, 50.0), 0.0, 0.0, 0.0, 30.0).unwrap());
    b.baseline(17.0, 7.5, 45.0, "225/45R17").unwrap();
    let vehicle = b.vehicle_geometry();
    assert_eq!(vehicle.suspension.travel_domain(), (-50.0, 50.0));
    assert!(vehicle.baseline.is_some());
}

#[test]
fn auto_check_passes_on_real_results() {
    let mut b = FitmentBuilder::new().unwrap().with_auto_check();
    b.wheel(18.0, 9.0, 40.0).unwrap().tire("245/40R18").unwrap();
    b.obstacle(box_obstacle("liner", Point3d::new(-50.0, -60.0, 300.0), Point3d::new(50.0, 120.0, 420.0)).unwrap())
        .unwrap();
    let result = b.evaluate().unwrap();
    assert!(result.interference.cells_evaluated > 0);
    assert_eq!(b.obstacles().len(), 1);
}

#[test]
fn envelope_matches_session() {
    let mut b = FitmentBuilder::new().unwrap();
    b.wheel(17.0, 8.5, 35.0).unwrap().tire("225/45R17").unwrap();
    let result = b.evaluate().unwrap();
    assert_eq!(b.envelope().unwrap(), result.envelope);
}
