//! Tests for verification oracles: each one passes on real results and
//! catches a hand-corrupted one.

use fit_kernel::Point3d;
use fit_tessellation::TriangleMesh;
use fitment_engine::SessionResult;
use fitment_ops::InterferenceEvent;
use test_harness::helpers::*;
use test_harness::oracle::*;
use test_harness::FitmentBuilder;

fn evaluated() -> (FitmentBuilder, SessionResult) {
    let mut b = FitmentBuilder::new().unwrap();
    b.wheel(17.0, 8.5, 35.0).unwrap().tire("225/45R17").unwrap();
    b.obstacle(sphere_obstacle("strut", Point3d::new(0.0, 35.0, 320.0), 15.0).unwrap())
        .unwrap();
    b.samples(&[0.0, 10.0], &[-5.0, 5.0]);
    let result = b.evaluate().unwrap();
    (b, result)
}

#[test]
fn all_oracles_pass_on_session_result() {
    let (b, result) = evaluated();
    let verdicts = b.check(&result).unwrap();
    assert_eq!(verdicts.len(), 5);
    for v in &verdicts {
        assert!(v.passed, "{}: {}", v.oracle_name, v.detail);
    }
}

#[test]
fn event_order_catches_swapped_events() {
    let (_, mut result) = evaluated();
    assert!(result.interference.events.len() >= 2);
    result.interference.events.swap(0, 1);
    let v = check_event_order(&result.interference);
    assert!(!v.passed);
    assert!(v.detail.contains("not before"));
}

#[test]
fn event_order_catches_duplicates() {
    let (_, mut result) = evaluated();
    let first = result.interference.events[0].clone();
    result.interference.events.insert(0, first);
    assert!(!check_event_order(&result.interference).passed);
}

#[test]
fn interference_flag_catches_mismatch() {
    let (_, mut result) = evaluated();
    result.interference.has_interference = false;
    assert!(!check_interference_flag(&result.interference).passed);
}

#[test]
fn min_clearance_catches_smaller_event() {
    let (_, mut result) = evaluated();
    if let Some(min) = result.interference.min_clearance.as_mut() {
        min.distance_mm = 5.0;
    }
    result.interference.events.push(InterferenceEvent {
        travel_mm: 50.0,
        steering_deg: 0.0,
        obstacle_id: "zz".into(),
        clearance_mm: 1.0,
    });
    let v = check_min_clearance_bound(&result.interference, 0.0);
    assert!(!v.passed);
    assert_eq!(v.value, Some(5.0));
}

#[test]
fn min_clearance_checks_tolerance_against_flag() {
    let (_, result) = evaluated();
    // The overlapping strut is within any tolerance; a clean report is not.
    let mut clean = result.interference.clone();
    clean.events.clear();
    clean.has_interference = false;
    assert!(!check_min_clearance_bound(&clean, 0.0).passed);
    assert!(check_min_clearance_bound(&result.interference, 0.0).passed);
}

#[test]
fn envelope_endpoints_pass_and_fail() {
    let (b, result) = evaluated();
    let tire = *b.tire_spec().unwrap();
    let v = check_envelope_endpoints(&result.envelope, &tire);
    assert!(v.passed, "{}", v.detail);

    let other = test_harness::helpers::tire("245/40R18").unwrap();
    assert!(!check_envelope_endpoints(&result.envelope, &other).passed);
}

#[test]
fn backspacing_catches_wrong_wheel() {
    let (b, result) = evaluated();
    assert!(check_backspacing(&result.fitment, b.wheel_spec().unwrap()).passed);

    let wider = test_harness::helpers::wheel(17.0, 9.5, 35.0).unwrap();
    let v = check_backspacing(&result.fitment, &wider);
    assert!(!v.passed);
    assert!(v.detail.contains("expected"));
}

#[test]
fn mesh_indices_pass_and_fail() {
    let (b, _) = evaluated();
    let mesh = b.tessellate_at(0.0, 0.0, 16).unwrap();
    assert!(check_mesh_indices(&mesh).passed);

    let mut broken = mesh.clone();
    broken.indices.push(broken.vertex_count() as u32);
    broken.indices.extend([0, 0]);
    assert!(!check_mesh_indices(&broken).passed);

    let mut missing_normals = TriangleMesh::new();
    missing_normals.positions.extend([0.0, 0.0, 0.0]);
    assert!(!check_mesh_indices(&missing_normals).passed);
}
