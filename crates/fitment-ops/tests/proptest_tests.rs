//! Property-based tests for the fitment operations using the `proptest` crate.

use proptest::prelude::*;

use fit_kernel::{Point3d, Sphere};
use fitment_ops::{
    build_envelope, check_interference, ClearanceObstacle, ClearanceValidator, Interpolation, ObstacleVolume,
    SuspensionGeometryModel, SuspensionSample, SweepConfig, TireEnvelope,
};
use fitment_types::{validate_wheel_spec, RawWheelSpec, TireSpec, WheelSpec};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn wheel(diameter: f64) -> WheelSpec {
    validate_wheel_spec(&RawWheelSpec {
        name: String::new(),
        diameter,
        width: 8.0,
        offset: 40.0,
        bolt_pattern: "5x112".into(),
        center_bore: 66.6,
        load_rating: 690,
        load_unit: Default::default(),
    })
    .unwrap()
}

/// A tire and a wheel of matching rim diameter.
fn arb_pair() -> impl Strategy<Value = (TireSpec, WheelSpec)> {
    (115u16..=445, 25u8..=85, 10u32..=24).prop_map(|(width, aspect, rim)| {
        let tire = TireSpec::new(width, aspect, rim as f64).unwrap();
        (tire, wheel(rim as f64))
    })
}

fn arb_resolution() -> impl Strategy<Value = usize> {
    8usize..64
}

fn model() -> SuspensionGeometryModel {
    SuspensionGeometryModel::from_gains(-30.0, 50.0, -1.0, -0.015, 0.002, 35.0).unwrap()
}

/// Travel positions inside the model's domain.
fn arb_travel_set() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-30.0f64..=50.0, 0..6)
}

/// Steering angles inside the lock range.
fn arb_steering_set() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-35.0f64..=35.0, 0..5)
}

fn arb_sphere_obstacles() -> impl Strategy<Value = Vec<ClearanceObstacle>> {
    prop::collection::vec(
        ((-400.0f64..400.0, -250.0f64..250.0, -400.0f64..400.0), 5.0f64..60.0),
        1..4,
    )
    .prop_map(|spheres| {
        spheres
            .into_iter()
            .enumerate()
            .map(|(i, ((x, y, z), r))| {
                let sphere = Sphere::new(Point3d::new(x, y, z), r).unwrap();
                ClearanceObstacle::chassis(format!("obstacle_{i}"), ObstacleVolume::Sphere(sphere))
            })
            .collect()
    })
}

fn reference_envelope(resolution: usize) -> TireEnvelope {
    build_envelope(&TireSpec::new(225, 45, 17.0).unwrap(), &wheel(17.0), resolution).unwrap()
}

// ---------------------------------------------------------------------------
// 1. Envelope construction is deterministic and well-formed
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn envelope_is_deterministic((tire, wheel) in arb_pair(), resolution in arb_resolution()) {
        let a = build_envelope(&tire, &wheel, resolution).unwrap();
        let b = build_envelope(&tire, &wheel, resolution).unwrap();
        prop_assert_eq!(a.points(), b.points());
        prop_assert_eq!(a.points().len(), 3 * resolution - 2);
    }

    #[test]
    fn envelope_never_negative((tire, wheel) in arb_pair(), resolution in arb_resolution()) {
        let env = build_envelope(&tire, &wheel, resolution).unwrap();
        for p in env.points() {
            prop_assert!(p.radius > 0.0);
        }
        for p in &env.points()[..resolution] {
            prop_assert!(p.axial > 0.0);
        }
        prop_assert!(env.max_radius_mm() >= env.bead_radius_mm());
    }
}

// ---------------------------------------------------------------------------
// 2. Zero obstacles never report interference
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn zero_obstacles_never_interfere(travel in arb_travel_set(), steering in arb_steering_set()) {
        let report = check_interference(&reference_envelope(16), &model(), &[], &travel, &steering).unwrap();
        prop_assert!(!report.has_interference);
        prop_assert!(report.events.is_empty());
    }
}

// ---------------------------------------------------------------------------
// 3. Events are ordered by (travel, steering, obstacle id) for any input order
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn events_are_sorted(
        travel in arb_travel_set(),
        steering in arb_steering_set(),
        obstacles in arb_sphere_obstacles(),
    ) {
        let report = check_interference(&reference_envelope(12), &model(), &obstacles, &travel, &steering).unwrap();
        for pair in report.events.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key_a = (a.travel_mm, a.steering_deg, a.obstacle_id.as_str());
            let key_b = (b.travel_mm, b.steering_deg, b.obstacle_id.as_str());
            prop_assert!(key_a <= key_b, "{:?} before {:?}", key_a, key_b);
        }
        prop_assert_eq!(report.has_interference, !report.events.is_empty());
    }
}

// ---------------------------------------------------------------------------
// 4. Parallel and sequential sweeps agree
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn parallel_matches_sequential(
        travel in arb_travel_set(),
        steering in arb_steering_set(),
        obstacles in arb_sphere_obstacles(),
    ) {
        let env = reference_envelope(12);
        let run = |parallel| {
            ClearanceValidator::new(SweepConfig { parallel, ..SweepConfig::default() })
                .check(&env, &model(), &obstacles, &travel, &steering)
                .unwrap()
        };
        prop_assert_eq!(run(true), run(false));
    }
}

// ---------------------------------------------------------------------------
// 5. Clearance converges as the profile resolution grows
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn clearance_converges_with_resolution(obstacles in arb_sphere_obstacles()) {
        let travel = [-30.0, 0.0, 50.0];
        let steering = [-35.0, 0.0, 35.0];
        let min_at = |resolution| {
            check_interference(&reference_envelope(resolution), &model(), &obstacles, &travel, &steering)
                .unwrap()
                .min_clearance
                .map(|c| c.distance_mm)
                .unwrap_or(f64::INFINITY)
        };
        let coarse = min_at(32);
        let fine = min_at(128);
        // Coarse bands stand off the sidewall by at most one radial step.
        prop_assert!((fine - coarse).abs() <= 5.0, "coarse {} fine {}", coarse, fine);
    }
}

// ---------------------------------------------------------------------------
// 6. Interpolated poses stay within the sampled range
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn monotone_cubic_never_overshoots(
        cambers in prop::collection::vec(-3.0f64..1.0, 2..8),
        t in 0.0f64..1.0,
    ) {
        let n = cambers.len();
        let samples: Vec<SuspensionSample> = cambers
            .iter()
            .enumerate()
            .map(|(i, &camber_deg)| SuspensionSample {
                travel_mm: -30.0 + 80.0 * i as f64 / (n - 1) as f64,
                camber_deg,
                toe_deg: 0.0,
                wheel_center_offset: fit_kernel::Vec3::ZERO,
            })
            .collect();
        let m = SuspensionGeometryModel::new(samples, 30.0, Interpolation::MonotoneCubic).unwrap();
        let travel = -30.0 + 80.0 * t;
        let pose = m.sample_at(travel).unwrap();
        let lo = cambers.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = cambers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(pose.camber_deg >= lo - 1e-9 && pose.camber_deg <= hi + 1e-9);
    }
}
