//! Tire cross-section profile and its revolved envelope.
//!
//! The profile lives in the tire's local frame: `radius` is the distance from
//! the spin axis, `axial` is measured along the spin axis from the wheel
//! centreline, positive outboard.

use std::f64::consts::PI;

use fit_kernel::{ConvexHull, Cylinder, Point3d, Transform, Vec3};
use fitment_types::{TireSpec, WheelSpec, MM_PER_INCH};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::FitmentError;

/// Lowest sidewall sample count any configuration may allow.
pub const MIN_PROFILE_RESOLUTION: usize = 8;

/// Shape parameters for the sidewall curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Peak sidewall bulge beyond the straight bead-to-shoulder line, as a
    /// fraction of the sidewall height.
    pub bulge_factor: f64,
    /// Smallest accepted sample count per sidewall; never below
    /// [`MIN_PROFILE_RESOLUTION`].
    pub min_resolution: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            bulge_factor: 0.08,
            min_resolution: MIN_PROFILE_RESOLUTION,
        }
    }
}

impl ProfileConfig {
    /// Straight sidewalls, no bulge.
    pub fn flat() -> Self {
        Self {
            bulge_factor: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), FitmentError> {
        if !self.bulge_factor.is_finite() || self.bulge_factor < 0.0 {
            return Err(FitmentError::InvalidConfig {
                field: "bulge_factor",
                value: self.bulge_factor,
            });
        }
        if self.min_resolution < MIN_PROFILE_RESOLUTION {
            return Err(FitmentError::InvalidConfig {
                field: "min_resolution",
                value: self.min_resolution as f64,
            });
        }
        Ok(())
    }
}

/// One point of the cross-section, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub radius: f64,
    pub axial: f64,
}

/// One sidewall band of an [`EnvelopeCover`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoverBand {
    /// Contains every sector of the band.
    pub bound: Cylinder,
    pub sectors: Vec<ConvexHull>,
}

/// Annular convex cover of a tire envelope. See [`TireEnvelope::cover`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeCover {
    pub bands: Vec<CoverBand>,
    /// Contains every band.
    pub bound: Cylinder,
}

impl EnvelopeCover {
    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            bands: self
                .bands
                .iter()
                .map(|band| CoverBand {
                    bound: band.bound.transformed(t),
                    sectors: band.sectors.iter().map(|s| s.transformed(t)).collect(),
                })
                .collect(),
            bound: self.bound.transformed(t),
        }
    }
}

/// The revolved tire cross-section plus the metadata needed to bound it.
///
/// Built once from a tire/wheel pair and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TireEnvelope {
    points: Vec<ProfilePoint>,
    resolution: usize,
    bead_radius_mm: f64,
    max_radius_mm: f64,
    max_half_width_mm: f64,
    wheel_offset_mm: f64,
    /// Largest amount the sampled sidewall can fall short of the true curve
    /// between two samples.
    chord_error_mm: f64,
}

/// Build the envelope with the default profile shape.
pub fn build_envelope(tire: &TireSpec, wheel: &WheelSpec, resolution: usize) -> Result<TireEnvelope, FitmentError> {
    build_envelope_with(tire, wheel, resolution, &ProfileConfig::default())
}

/// Build the cross-section: outboard sidewall from bead to shoulder, the flat
/// tread crown, then the inboard sidewall back down to the bead.
///
/// The sidewall half-width blends linearly from the rim to the section width
/// and adds `bulge × sin(πs)`, so it is continuous, exact at both ends and
/// widest near mid-sidewall.
#[instrument(skip(tire, wheel, config), fields(tire = %tire, wheel = wheel.name()))]
pub fn build_envelope_with(
    tire: &TireSpec,
    wheel: &WheelSpec,
    resolution: usize,
    config: &ProfileConfig,
) -> Result<TireEnvelope, FitmentError> {
    config.validate()?;
    if resolution < config.min_resolution {
        return Err(FitmentError::DegenerateProfileResolution {
            resolution,
            min: config.min_resolution,
        });
    }

    let bead_radius = tire.rim_diameter_in() * MM_PER_INCH / 2.0;
    let tread_radius = tire.overall_diameter_mm() / 2.0;
    let bead_half_width = wheel.width_mm() / 2.0;
    let tread_half_width = tire.section_width_mm() / 2.0;
    let bulge = config.bulge_factor * tire.sidewall_height_mm();

    let last = resolution - 1;
    let sidewall: Vec<ProfilePoint> = (0..resolution)
        .map(|i| {
            let s = i as f64 / last as f64;
            let bulge_term = if i == 0 || i == last { 0.0 } else { bulge * (PI * s).sin() };
            ProfilePoint {
                radius: lerp(bead_radius, tread_radius, s),
                axial: lerp(bead_half_width, tread_half_width, s) + bulge_term,
            }
        })
        .collect();

    let mut points = Vec::with_capacity(3 * resolution - 2);
    points.extend_from_slice(&sidewall);
    points.extend((1..last).map(|j| ProfilePoint {
        radius: tread_radius,
        axial: lerp(tread_half_width, -tread_half_width, j as f64 / last as f64),
    }));
    points.extend(sidewall.iter().rev().map(|p| ProfilePoint {
        radius: p.radius,
        axial: -p.axial,
    }));

    let max_half_width = sidewall.iter().map(|p| p.axial).fold(0.0, f64::max);
    let step = 1.0 / last as f64;
    let chord_error = bulge * PI * PI * step * step / 8.0;

    debug!(points = points.len(), bead_radius, tread_radius, max_half_width, "profile sampled");
    info!(resolution, max_radius = tread_radius, max_half_width, "envelope built");

    Ok(TireEnvelope {
        points,
        resolution,
        bead_radius_mm: bead_radius,
        max_radius_mm: tread_radius,
        max_half_width_mm: max_half_width,
        wheel_offset_mm: wheel.offset_mm(),
        chord_error_mm: chord_error,
    })
}

/// Exact at both `s = 0` and `s = 1`.
fn lerp(a: f64, b: f64, s: f64) -> f64 {
    (1.0 - s) * a + s * b
}

impl TireEnvelope {
    /// Closed cross-section, bead to bead, outboard side first.
    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn bead_radius_mm(&self) -> f64 {
        self.bead_radius_mm
    }

    pub fn max_radius_mm(&self) -> f64 {
        self.max_radius_mm
    }

    pub fn max_half_width_mm(&self) -> f64 {
        self.max_half_width_mm
    }

    /// Offset of the wheel the envelope was built for. The tire centreline
    /// sits this far outboard of the hub mounting face.
    pub fn wheel_offset_mm(&self) -> f64 {
        self.wheel_offset_mm
    }

    /// The outboard sidewall, bead to shoulder.
    fn outboard_sidewall(&self) -> &[ProfilePoint] {
        &self.points[..self.resolution]
    }

    /// Convex pieces covering the tire in the tire frame, from the bead seat
    /// out to the tread. The wheel bore inside the bead seat stays open, so
    /// parts sitting inside the barrel are measured against the barrel wall.
    ///
    /// Band `k` spans sidewall samples `k` and `k + 1` axially and radially.
    /// It is split into `sectors` angular pieces; sector `j` is centred on
    /// angle `2πj / sectors`, measured like [`revolve`](Self::revolve). Each
    /// sector is the hull of eight points whose outer edge sits at
    /// `r / cos(π / sectors)`, so it touches the true outer arc at its
    /// middle and never falls inside it.
    pub fn cover(&self, sectors: usize) -> Result<EnvelopeCover, FitmentError> {
        if sectors < 3 {
            return Err(FitmentError::TooFewSegments { segments: sectors });
        }
        let half_angle = PI / sectors as f64;
        let sagitta_scale = 1.0 / half_angle.cos();

        let mut bands = Vec::with_capacity(self.resolution - 1);
        for pair in self.outboard_sidewall().windows(2) {
            let inner = pair[0].radius;
            let outer = pair[1].radius * sagitta_scale;
            let half = pair[0].axial.max(pair[1].axial) + self.chord_error_mm;

            let sector_list = (0..sectors)
                .map(|j| {
                    let mid = 2.0 * PI * j as f64 / sectors as f64;
                    let mut points = Vec::with_capacity(8);
                    for theta in [mid - half_angle, mid + half_angle] {
                        let (sin, cos) = theta.sin_cos();
                        for r in [inner, outer] {
                            for y in [-half, half] {
                                points.push(Point3d::new(r * cos, y, r * sin));
                            }
                        }
                    }
                    Ok(ConvexHull::new(points)?)
                })
                .collect::<Result<Vec<_>, FitmentError>>()?;

            bands.push(CoverBand {
                bound: Cylinder::new(Point3d::ORIGIN, Vec3::Y, outer, half)?,
                sectors: sector_list,
            });
        }

        let bound = Cylinder::new(
            Point3d::ORIGIN,
            Vec3::Y,
            self.max_radius_mm * sagitta_scale,
            self.max_half_width_mm + self.chord_error_mm,
        )?;
        debug!(bands = bands.len(), sectors, "envelope cover built");
        Ok(EnvelopeCover { bands, bound })
    }

    /// Sweep the profile around the spin axis: one ring of `segments` points
    /// per profile point. Ring point `j` sits at angle `2πj / segments`
    /// measured from +X towards +Z.
    pub fn revolve(&self, segments: usize) -> Result<Vec<Vec<Point3d>>, FitmentError> {
        if segments < 3 {
            return Err(FitmentError::TooFewSegments { segments });
        }
        let angles: Vec<(f64, f64)> = (0..segments)
            .map(|j| {
                let theta = 2.0 * PI * j as f64 / segments as f64;
                (theta.cos(), theta.sin())
            })
            .collect();
        Ok(self
            .points
            .iter()
            .map(|p| {
                angles
                    .iter()
                    .map(|(c, s)| Point3d::new(p.radius * c, p.axial, p.radius * s))
                    .collect()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fit_kernel::ConvexShape;
    use fitment_types::{parse_tire_size, validate_wheel_spec, RawWheelSpec};

    fn wheel() -> WheelSpec {
        validate_wheel_spec(&RawWheelSpec {
            name: "Sport 17".into(),
            diameter: 17.0,
            width: 8.5,
            offset: 35.0,
            bolt_pattern: "5x114.3".into(),
            center_bore: 64.1,
            load_rating: 1500,
            load_unit: Default::default(),
        })
        .unwrap()
    }

    fn tire() -> TireSpec {
        parse_tire_size("225/45R17").unwrap()
    }

    #[test]
    fn test_point_count_and_endpoints() {
        let env = build_envelope(&tire(), &wheel(), 12).unwrap();
        let pts = env.points();
        assert_eq!(pts.len(), 3 * 12 - 2);

        // Bead at the rim seat and nominal wheel width, on both sides.
        assert_relative_eq!(pts[0].radius, 215.9, epsilon = 1e-9);
        assert_relative_eq!(pts[0].axial, 107.95, epsilon = 1e-9);
        assert_eq!(pts[pts.len() - 1].axial, -pts[0].axial);

        // Shoulder at the tread radius and half section width.
        assert_relative_eq!(pts[11].radius, 317.15, epsilon = 1e-9);
        assert_eq!(pts[11].axial, 112.5);
    }

    #[test]
    fn test_sidewall_bulges_outward() {
        let env = build_envelope(&tire(), &wheel(), 9).unwrap();
        let mid = env.points()[4];
        let straight = (107.95 + 112.5) / 2.0;
        assert_relative_eq!(mid.axial - straight, 0.08 * 101.25, epsilon = 1e-9);
        assert_relative_eq!(env.max_half_width_mm(), mid.axial, epsilon = 1e-12);
    }

    #[test]
    fn test_no_negative_values() {
        let env = build_envelope(&tire(), &wheel(), 32).unwrap();
        assert!(env.points().iter().all(|p| p.radius > 0.0));
        assert!(env.points()[..32].iter().all(|p| p.axial > 0.0));
    }

    #[test]
    fn test_degenerate_resolution() {
        assert_eq!(
            build_envelope(&tire(), &wheel(), 7),
            Err(FitmentError::DegenerateProfileResolution { resolution: 7, min: 8 })
        );
    }

    #[test]
    fn test_invalid_bulge() {
        let config = ProfileConfig {
            bulge_factor: -0.1,
            ..ProfileConfig::default()
        };
        assert!(matches!(
            build_envelope_with(&tire(), &wheel(), 16, &config),
            Err(FitmentError::InvalidConfig { field: "bulge_factor", .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let a = build_envelope(&tire(), &wheel(), 24).unwrap();
        let b = build_envelope(&tire(), &wheel(), 24).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cover_spans_bead_to_tread() {
        let env = build_envelope(&tire(), &wheel(), 16).unwrap();
        let cover = env.cover(32).unwrap();
        assert_eq!(cover.bands.len(), 15);
        assert!(cover.bands.iter().all(|b| b.sectors.len() == 32));

        // Every revolved profile point lies inside its band's sector boxes.
        let rings = env.revolve(32).unwrap();
        for (k, band) in cover.bands.iter().enumerate() {
            for p in rings[k].iter().chain(&rings[k + 1]) {
                let covered = band
                    .sectors
                    .iter()
                    .any(|s| s.bounding_box().expanded(1e-9).contains_point(p));
                assert!(covered, "{p:?} not covered by band {k}");
            }
            assert!(band.bound.radius <= cover.bound.radius);
            assert!(band.bound.half_height <= cover.bound.half_height);
        }

        // The sector centred on +Z touches the tread arc at its middle.
        let top = cover.bands[14].sectors[8].support(&Vec3::Z);
        assert_relative_eq!(top.z, 317.15, epsilon = 1e-9);
    }

    #[test]
    fn test_cover_leaves_bore_open() {
        let env = build_envelope(&tire(), &wheel(), 16).unwrap();
        let cover = env.cover(32).unwrap();
        let inner = 215.9 * (PI / 32.0).cos();
        for band in &cover.bands {
            for (j, sector) in band.sectors.iter().enumerate() {
                let (sin, cos) = (2.0 * PI * j as f64 / 32.0).sin_cos();
                let outward = Vec3::new(cos, 0.0, sin);
                let lowest = sector.support(&-outward).to_vec3().dot(&outward);
                assert!(lowest >= inner - 1e-9, "sector {j} reaches radius {lowest}");
            }
        }
        assert_eq!(env.cover(2), Err(FitmentError::TooFewSegments { segments: 2 }));
    }

    #[test]
    fn test_min_resolution_floor() {
        let config = ProfileConfig {
            min_resolution: 2,
            ..ProfileConfig::default()
        };
        assert_eq!(
            build_envelope_with(&tire(), &wheel(), 4, &config),
            Err(FitmentError::InvalidConfig {
                field: "min_resolution",
                value: 2.0
            })
        );
        // Raising the floor is fine.
        let strict = ProfileConfig {
            min_resolution: 12,
            ..ProfileConfig::default()
        };
        assert_eq!(
            build_envelope_with(&tire(), &wheel(), 10, &strict),
            Err(FitmentError::DegenerateProfileResolution { resolution: 10, min: 12 })
        );
    }

    #[test]
    fn test_revolve_rings() {
        let env = build_envelope(&tire(), &wheel(), 8).unwrap();
        let rings = env.revolve(6).unwrap();
        assert_eq!(rings.len(), env.points().len());
        let p = env.points()[10];
        for q in &rings[10] {
            assert_relative_eq!((q.x * q.x + q.z * q.z).sqrt(), p.radius, epsilon = 1e-9);
            assert_eq!(q.y, p.axial);
        }
        assert_eq!(env.revolve(2), Err(FitmentError::TooFewSegments { segments: 2 }));
    }
}
