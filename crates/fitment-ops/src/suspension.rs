//! Suspension geometry as a function of wheel travel.
//!
//! Camber, toe and wheel-centre motion are sampled at increasing travel
//! positions (droop negative, bump positive) and interpolated between
//! samples. Positions outside the sampled domain are rejected, never
//! extrapolated.

use fit_kernel::{Point3d, Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::FitmentError;

/// One sampled suspension position. Angles in degrees, lengths in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspensionSample {
    pub travel_mm: f64,
    /// Negative camber tilts the top of the wheel inboard.
    pub camber_deg: f64,
    /// Positive toe is toe-in.
    pub toe_deg: f64,
    /// Wheel-centre displacement from the design position.
    pub wheel_center_offset: Vec3,
}

/// The interpolated state at one travel position.
pub type SuspensionPose = SuspensionSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    /// Fritsch-Carlson monotone cubic Hermite; never overshoots the samples.
    MonotoneCubic,
}

const CHANNELS: usize = 5;

/// Sampled camber/toe/wheel-centre curves plus the steering lock range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SuspensionModelRecord", into = "SuspensionModelRecord")]
pub struct SuspensionGeometryModel {
    samples: Vec<SuspensionSample>,
    lock_max_deg: f64,
    interpolation: Interpolation,
    steering_axis_origin: Point3d,
    /// Per-sample Hermite slopes, one per channel. Empty for linear curves.
    slopes: Vec<[f64; CHANNELS]>,
}

/// Serialised form of [`SuspensionGeometryModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspensionModelRecord {
    pub samples: Vec<SuspensionSample>,
    pub lock_max_deg: f64,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default = "default_axis_origin")]
    pub steering_axis_origin: Point3d,
}

fn default_axis_origin() -> Point3d {
    Point3d::ORIGIN
}

impl TryFrom<SuspensionModelRecord> for SuspensionGeometryModel {
    type Error = FitmentError;

    fn try_from(record: SuspensionModelRecord) -> Result<Self, Self::Error> {
        let model = Self::new(record.samples, record.lock_max_deg, record.interpolation)?;
        model.with_steering_axis_origin(record.steering_axis_origin)
    }
}

impl From<SuspensionGeometryModel> for SuspensionModelRecord {
    fn from(model: SuspensionGeometryModel) -> Self {
        Self {
            samples: model.samples,
            lock_max_deg: model.lock_max_deg,
            interpolation: model.interpolation,
            steering_axis_origin: model.steering_axis_origin,
        }
    }
}

fn invalid(reason: impl Into<String>) -> FitmentError {
    FitmentError::InvalidSuspensionModel { reason: reason.into() }
}

impl SuspensionGeometryModel {
    /// Samples must be non-empty, finite and strictly increasing in travel;
    /// the lock angle must be finite and non-negative.
    pub fn new(
        samples: Vec<SuspensionSample>,
        lock_max_deg: f64,
        interpolation: Interpolation,
    ) -> Result<Self, FitmentError> {
        if samples.is_empty() {
            return Err(invalid("at least one travel sample is required"));
        }
        if let Some(bad) = samples.iter().position(|s| {
            !(s.travel_mm.is_finite() && s.camber_deg.is_finite() && s.toe_deg.is_finite())
                || !s.wheel_center_offset.is_finite()
        }) {
            return Err(invalid(format!("sample {bad} has a non-finite value")));
        }
        if let Some(k) = samples.windows(2).position(|w| w[1].travel_mm <= w[0].travel_mm) {
            return Err(invalid(format!(
                "travel must be strictly increasing: sample {} at {} mm follows {} mm",
                k + 1,
                samples[k + 1].travel_mm,
                samples[k].travel_mm
            )));
        }
        if !lock_max_deg.is_finite() || lock_max_deg < 0.0 {
            return Err(invalid(format!("steering lock must be non-negative, got {lock_max_deg}")));
        }

        let slopes = match interpolation {
            Interpolation::Linear => Vec::new(),
            Interpolation::MonotoneCubic => monotone_slopes(&samples),
        };

        Ok(Self {
            samples,
            lock_max_deg,
            interpolation,
            steering_axis_origin: Point3d::ORIGIN,
            slopes,
        })
    }

    /// Linear model from static settings and per-millimetre gains; the wheel
    /// centre moves vertically with travel.
    pub fn from_gains(
        travel_min_mm: f64,
        travel_max_mm: f64,
        static_camber_deg: f64,
        camber_gain_deg_per_mm: f64,
        bump_steer_deg_per_mm: f64,
        lock_max_deg: f64,
    ) -> Result<Self, FitmentError> {
        let at = |t: f64| SuspensionSample {
            travel_mm: t,
            camber_deg: static_camber_deg + camber_gain_deg_per_mm * t,
            toe_deg: bump_steer_deg_per_mm * t,
            wheel_center_offset: Vec3::new(0.0, 0.0, t),
        };
        let mut travels = vec![travel_min_mm];
        if travel_min_mm < 0.0 && travel_max_mm > 0.0 {
            travels.push(0.0);
        }
        if travel_max_mm != travel_min_mm {
            travels.push(travel_max_mm);
        }
        Self::new(travels.into_iter().map(at).collect(), lock_max_deg, Interpolation::Linear)
    }

    /// Point the vertical steering axis passes through, in the corner frame.
    pub fn with_steering_axis_origin(mut self, origin: Point3d) -> Result<Self, FitmentError> {
        if !origin.is_finite() {
            return Err(invalid("steering axis origin must be finite"));
        }
        self.steering_axis_origin = origin;
        Ok(self)
    }

    pub fn samples(&self) -> &[SuspensionSample] {
        &self.samples
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn steering_axis_origin(&self) -> Point3d {
        self.steering_axis_origin
    }

    /// `(travel_min, travel_max)`, droop to bump.
    pub fn travel_domain(&self) -> (f64, f64) {
        let first = self.samples[0].travel_mm;
        let last = self.samples[self.samples.len() - 1].travel_mm;
        (first, last)
    }

    /// `(-lock_max, +lock_max)` in degrees.
    pub fn steering_lock_range(&self) -> (f64, f64) {
        (-self.lock_max_deg, self.lock_max_deg)
    }

    pub fn check_travel(&self, travel_mm: f64) -> Result<(), FitmentError> {
        let (min_mm, max_mm) = self.travel_domain();
        if (min_mm..=max_mm).contains(&travel_mm) {
            Ok(())
        } else {
            Err(FitmentError::TravelOutOfDomain {
                travel_mm,
                min_mm,
                max_mm,
            })
        }
    }

    pub fn check_steering(&self, angle_deg: f64) -> Result<(), FitmentError> {
        let (min_deg, max_deg) = self.steering_lock_range();
        if (min_deg..=max_deg).contains(&angle_deg) {
            Ok(())
        } else {
            Err(FitmentError::SteeringOutOfDomain {
                angle_deg,
                min_deg,
                max_deg,
            })
        }
    }

    /// Camber, toe and wheel-centre offset at `travel_mm`.
    pub fn sample_at(&self, travel_mm: f64) -> Result<SuspensionPose, FitmentError> {
        self.check_travel(travel_mm)?;
        let n = self.samples.len();
        if n == 1 {
            return Ok(self.samples[0]);
        }

        // Interval k spans samples k and k + 1.
        let k = self
            .samples
            .partition_point(|s| s.travel_mm <= travel_mm)
            .saturating_sub(1)
            .min(n - 2);
        let (a, b) = (&self.samples[k], &self.samples[k + 1]);
        let h = b.travel_mm - a.travel_mm;
        let t = (travel_mm - a.travel_mm) / h;

        let ya = channels(a);
        let yb = channels(b);
        let mut y = [0.0; CHANNELS];
        match self.interpolation {
            Interpolation::Linear => {
                for c in 0..CHANNELS {
                    y[c] = (1.0 - t) * ya[c] + t * yb[c];
                }
            }
            Interpolation::MonotoneCubic => {
                let (t2, t3) = (t * t, t * t * t);
                let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
                let h10 = t3 - 2.0 * t2 + t;
                let h01 = -2.0 * t3 + 3.0 * t2;
                let h11 = t3 - t2;
                let (ma, mb) = (self.slopes[k], self.slopes[k + 1]);
                for c in 0..CHANNELS {
                    y[c] = h00 * ya[c] + h10 * h * ma[c] + h01 * yb[c] + h11 * h * mb[c];
                }
            }
        }

        Ok(SuspensionPose {
            travel_mm,
            camber_deg: y[0],
            toe_deg: y[1],
            wheel_center_offset: Vec3::new(y[2], y[3], y[4]),
        })
    }

    /// Rigid motion of the hub from its design position to `pose` with the
    /// wheel steered by `steering_deg`: camber about X through the hub face,
    /// steer minus toe-in about the vertical steering axis, then the
    /// wheel-centre offset.
    pub fn hub_transform(&self, pose: &SuspensionPose, steering_deg: f64) -> Transform {
        let pivot = Vec3::new(self.steering_axis_origin.x, self.steering_axis_origin.y, 0.0);
        let yaw = (steering_deg - pose.toe_deg).to_radians();
        Transform::rotation_x(-pose.camber_deg.to_radians())
            .then(&Transform::from_translation_vec(-pivot))
            .then(&Transform::rotation_z(yaw))
            .then(&Transform::from_translation_vec(pivot))
            .then(&Transform::from_translation_vec(pose.wheel_center_offset))
    }

    /// `n` evenly spaced travel positions covering the domain, endpoints
    /// included. A single sample is the in-domain position nearest design
    /// ride height.
    pub fn travel_samples(&self, n: usize) -> Vec<f64> {
        let (min, max) = self.travel_domain();
        linspace(min, max, n)
    }

    /// `n` evenly spaced steering angles across the lock range. A single
    /// sample is straight ahead.
    pub fn steering_samples(&self, n: usize) -> Vec<f64> {
        let (min, max) = self.steering_lock_range();
        linspace(min, max, n)
    }
}

fn channels(s: &SuspensionSample) -> [f64; CHANNELS] {
    [
        s.camber_deg,
        s.toe_deg,
        s.wheel_center_offset.x,
        s.wheel_center_offset.y,
        s.wheel_center_offset.z,
    ]
}

fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0_f64.clamp(min, max)],
        _ => {
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    let s = i as f64 / last;
                    (1.0 - s) * min + s * max
                })
                .collect()
        }
    }
}

/// Fritsch-Carlson slopes for each channel.
fn monotone_slopes(samples: &[SuspensionSample]) -> Vec<[f64; CHANNELS]> {
    let n = samples.len();
    let mut slopes = vec![[0.0; CHANNELS]; n];
    if n < 2 {
        return slopes;
    }

    let ys: Vec<[f64; CHANNELS]> = samples.iter().map(channels).collect();
    for c in 0..CHANNELS {
        let secants: Vec<f64> = (0..n - 1)
            .map(|k| (ys[k + 1][c] - ys[k][c]) / (samples[k + 1].travel_mm - samples[k].travel_mm))
            .collect();

        let mut m = vec![0.0; n];
        m[0] = secants[0];
        m[n - 1] = secants[n - 2];
        for k in 1..n - 1 {
            m[k] = if secants[k - 1] * secants[k] <= 0.0 {
                0.0
            } else {
                (secants[k - 1] + secants[k]) / 2.0
            };
        }

        for k in 0..n - 1 {
            let d = secants[k];
            if d == 0.0 {
                m[k] = 0.0;
                m[k + 1] = 0.0;
                continue;
            }
            let alpha = m[k] / d;
            let beta = m[k + 1] / d;
            let r = alpha * alpha + beta * beta;
            if r > 9.0 {
                let tau = 3.0 / r.sqrt();
                m[k] = tau * alpha * d;
                m[k + 1] = tau * beta * d;
            }
        }

        for k in 0..n {
            slopes[k][c] = m[k];
        }
    }
    slopes
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(travel_mm: f64, camber_deg: f64, toe_deg: f64, z: f64) -> SuspensionSample {
        SuspensionSample {
            travel_mm,
            camber_deg,
            toe_deg,
            wheel_center_offset: Vec3::new(0.0, 0.0, z),
        }
    }

    fn model(interpolation: Interpolation) -> SuspensionGeometryModel {
        SuspensionGeometryModel::new(
            vec![
                sample(-30.0, 0.5, 0.05, -30.0),
                sample(0.0, -0.5, 0.0, 0.0),
                sample(20.0, -1.5, -0.02, 20.0),
                sample(50.0, -1.6, -0.1, 50.0),
            ],
            35.0,
            interpolation,
        )
        .unwrap()
    }

    #[test]
    fn test_linear_interpolation() {
        let m = model(Interpolation::Linear);
        let pose = m.sample_at(10.0).unwrap();
        assert_relative_eq!(pose.camber_deg, -1.0, epsilon = 1e-12);
        assert_relative_eq!(pose.toe_deg, -0.01, epsilon = 1e-12);
        assert_relative_eq!(pose.wheel_center_offset.z, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_at_samples() {
        for interp in [Interpolation::Linear, Interpolation::MonotoneCubic] {
            let m = model(interp);
            for s in m.samples().to_vec() {
                let pose = m.sample_at(s.travel_mm).unwrap();
                assert_relative_eq!(pose.camber_deg, s.camber_deg, epsilon = 1e-12);
                assert_relative_eq!(pose.toe_deg, s.toe_deg, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_out_of_domain() {
        let m = model(Interpolation::Linear);
        assert_eq!(m.travel_domain(), (-30.0, 50.0));
        assert_eq!(
            m.sample_at(80.0),
            Err(FitmentError::TravelOutOfDomain {
                travel_mm: 80.0,
                min_mm: -30.0,
                max_mm: 50.0
            })
        );
        assert!(m.sample_at(-30.1).is_err());
        assert!(m.sample_at(f64::NAN).is_err());
        assert!(m.check_steering(35.0).is_ok());
        assert!(matches!(m.check_steering(-36.0), Err(FitmentError::SteeringOutOfDomain { .. })));
    }

    #[test]
    fn test_monotone_cubic_stays_within_samples() {
        let m = model(Interpolation::MonotoneCubic);
        // Camber falls monotonically across the domain; the curve must too.
        let mut prev = f64::INFINITY;
        for i in 0..=160 {
            let t = -30.0 + i as f64 * 0.5;
            let pose = m.sample_at(t).unwrap();
            assert!(pose.camber_deg <= prev + 1e-12, "camber rose at {t}");
            assert!(pose.camber_deg <= 0.5 + 1e-12 && pose.camber_deg >= -1.6 - 1e-12);
            prev = pose.camber_deg;
        }
    }

    #[test]
    fn test_invalid_models() {
        let unordered = vec![sample(0.0, 0.0, 0.0, 0.0), sample(0.0, 0.0, 0.0, 0.0)];
        assert!(matches!(
            SuspensionGeometryModel::new(unordered, 30.0, Interpolation::Linear),
            Err(FitmentError::InvalidSuspensionModel { .. })
        ));
        assert!(SuspensionGeometryModel::new(vec![], 30.0, Interpolation::Linear).is_err());
        assert!(SuspensionGeometryModel::new(vec![sample(0.0, 0.0, 0.0, 0.0)], -1.0, Interpolation::Linear).is_err());
    }

    #[test]
    fn test_from_gains() {
        let m = SuspensionGeometryModel::from_gains(-30.0, 50.0, -1.0, -0.02, 0.001, 35.0).unwrap();
        assert_eq!(m.samples().len(), 3);
        let pose = m.sample_at(20.0).unwrap();
        assert_relative_eq!(pose.camber_deg, -1.4, epsilon = 1e-12);
        assert_relative_eq!(pose.toe_deg, 0.02, epsilon = 1e-12);
        assert_relative_eq!(pose.wheel_center_offset.z, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_grids() {
        let m = model(Interpolation::Linear);
        assert_eq!(m.travel_samples(5), vec![-30.0, -10.0, 10.0, 30.0, 50.0]);
        assert_eq!(m.travel_samples(1), vec![0.0]);
        assert!(m.travel_samples(0).is_empty());
        assert_eq!(m.steering_samples(3), vec![-35.0, 0.0, 35.0]);
    }

    #[test]
    fn test_hub_transform_camber_and_steer() {
        let m = model(Interpolation::Linear);
        let pose = SuspensionPose {
            travel_mm: 0.0,
            camber_deg: -2.0,
            toe_deg: 0.0,
            wheel_center_offset: Vec3::ZERO,
        };
        let t = m.hub_transform(&pose, 0.0);
        // Negative camber leans the top inboard.
        assert!(t.transform_point(&Point3d::new(0.0, 0.0, 300.0)).y < 0.0);

        let straight = SuspensionPose { camber_deg: 0.0, ..pose };
        let t = m.hub_transform(&straight, 15.0);
        // Positive steer swings the front of the wheel outboard.
        assert!(t.transform_point(&Point3d::new(300.0, 0.0, 0.0)).y > 0.0);
    }

    #[test]
    fn test_serde_validates() {
        let m = model(Interpolation::MonotoneCubic);
        let json = serde_json::to_string(&m).unwrap();
        let back: SuspensionGeometryModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        let bad = r#"{"samples":[],"lock_max_deg":30}"#;
        assert!(serde_json::from_str::<SuspensionGeometryModel>(bad).is_err());
    }
}
