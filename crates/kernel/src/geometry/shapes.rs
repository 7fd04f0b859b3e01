//! Convex bounding volumes described by their support mappings.

use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::transform::{BoundingBox, Transform};
use super::vector::Vec3;
use crate::error::GeometryError;

/// A closed convex set that can report its furthest point in any direction.
pub trait ConvexShape {
    /// A point of the shape maximising the dot product with `direction`.
    /// `direction` need not be normalised and may be zero.
    fn support(&self, direction: &Vec3) -> Point3d;

    /// Some point inside the shape.
    fn interior_point(&self) -> Point3d;

    fn bounding_box(&self) -> BoundingBox;
}

fn check_dimension(parameter: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidDimension { parameter, value })
    }
}

fn check_point(shape: &'static str, p: &Point3d) -> Result<(), GeometryError> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { shape })
    }
}

/// Solid ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3d,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point3d, radius: f64) -> Result<Self, GeometryError> {
        let sphere = Self { center, radius };
        sphere.validate()?;
        Ok(sphere)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        check_point("sphere", &self.center)?;
        check_dimension("sphere radius", self.radius)
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            center: t.transform_point(&self.center),
            radius: self.radius,
        }
    }
}

impl ConvexShape for Sphere {
    fn support(&self, direction: &Vec3) -> Point3d {
        match direction.normalized() {
            Some(d) => self.center + d * self.radius,
            None => self.center,
        }
    }

    fn interior_point(&self) -> Point3d {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.center, Vec3::new(self.radius, self.radius, self.radius))
    }
}

/// Segment `a`-`b` swept by a ball of `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    pub a: Point3d,
    pub b: Point3d,
    pub radius: f64,
}

impl Capsule {
    pub fn new(a: Point3d, b: Point3d, radius: f64) -> Result<Self, GeometryError> {
        let capsule = Self { a, b, radius };
        capsule.validate()?;
        Ok(capsule)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        check_point("capsule", &self.a)?;
        check_point("capsule", &self.b)?;
        check_dimension("capsule radius", self.radius)
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            a: t.transform_point(&self.a),
            b: t.transform_point(&self.b),
            radius: self.radius,
        }
    }
}

impl ConvexShape for Capsule {
    fn support(&self, direction: &Vec3) -> Point3d {
        let end = if (self.b - self.a).dot(direction) > 0.0 {
            self.b
        } else {
            self.a
        };
        match direction.normalized() {
            Some(d) => end + d * self.radius,
            None => end,
        }
    }

    fn interior_point(&self) -> Point3d {
        self.a.midpoint(&self.b)
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&[self.a, self.b]).expanded(self.radius)
    }
}

/// Convex hull of a point set. The points need not all be extreme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexHull {
    pub points: Vec<Point3d>,
}

impl ConvexHull {
    pub fn new(points: Vec<Point3d>) -> Result<Self, GeometryError> {
        let hull = Self { points };
        hull.validate()?;
        Ok(hull)
    }

    /// Axis-aligned box as a hull of its eight corners.
    pub fn from_box(bb: &BoundingBox) -> Result<Self, GeometryError> {
        let (lo, hi) = (bb.min, bb.max);
        let mut points = Vec::with_capacity(8);
        for x in [lo.x, hi.x] {
            for y in [lo.y, hi.y] {
                for z in [lo.z, hi.z] {
                    points.push(Point3d::new(x, y, z));
                }
            }
        }
        Self::new(points)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.points.is_empty() {
            return Err(GeometryError::EmptyHull);
        }
        self.points.iter().try_for_each(|p| check_point("convex hull", p))
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            points: self.points.iter().map(|p| t.transform_point(p)).collect(),
        }
    }
}

impl ConvexShape for ConvexHull {
    fn support(&self, direction: &Vec3) -> Point3d {
        let mut best = Point3d::ORIGIN;
        let mut best_dot = f64::NEG_INFINITY;
        for p in &self.points {
            let d = p.to_vec3().dot(direction);
            if d > best_dot {
                best_dot = d;
                best = *p;
            }
        }
        best
    }

    fn interior_point(&self) -> Point3d {
        let n = self.points.len().max(1) as f64;
        let sum = self.points.iter().fold(Vec3::ZERO, |acc, p| acc + p.to_vec3());
        Point3d::ORIGIN + sum / n
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }
}

/// Finite solid cylinder, centred on `center` with a unit `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    pub center: Point3d,
    pub axis: Vec3,
    pub radius: f64,
    pub half_height: f64,
}

impl Cylinder {
    pub fn new(center: Point3d, axis: Vec3, radius: f64, half_height: f64) -> Result<Self, GeometryError> {
        check_point("cylinder", &center)?;
        check_dimension("cylinder radius", radius)?;
        check_dimension("cylinder half height", half_height)?;
        let axis = axis.normalized().ok_or(GeometryError::ZeroDirection)?;
        Ok(Self {
            center,
            axis,
            radius,
            half_height,
        })
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            center: t.transform_point(&self.center),
            axis: t.transform_vector(&self.axis),
            radius: self.radius,
            half_height: self.half_height,
        }
    }
}

impl ConvexShape for Cylinder {
    fn support(&self, direction: &Vec3) -> Point3d {
        let along = if direction.dot(&self.axis) >= 0.0 {
            self.half_height
        } else {
            -self.half_height
        };
        let cap = self.center + self.axis * along;
        match direction.reject_from(&self.axis).normalized() {
            Some(radial) => cap + radial * self.radius,
            None => cap,
        }
    }

    fn interior_point(&self) -> Point3d {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox {
        // Per world axis: the axis segment's extent plus the rim disc's extent.
        let extent = |a: f64| self.half_height * a.abs() + self.radius * (1.0 - a * a).max(0.0).sqrt();
        let half = Vec3::new(extent(self.axis.x), extent(self.axis.y), extent(self.axis.z));
        BoundingBox::around(self.center, half)
    }
}
