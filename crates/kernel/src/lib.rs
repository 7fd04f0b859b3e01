//! Geometry kernel for fitment checks: points, vectors, rigid transforms,
//! convex bounding volumes and exact convex-convex distance.

pub mod error;
pub mod geometry;

pub use error::GeometryError;
pub use geometry::distance::{convex_distance, convex_intersects};
pub use geometry::point::Point3d;
pub use geometry::shapes::{Capsule, ConvexHull, ConvexShape, Cylinder, Sphere};
pub use geometry::transform::{BoundingBox, Transform};
pub use geometry::vector::Vec3;

/// Tolerance configuration for geometric comparisons. Lengths are millimetres.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident.
    pub coincidence: f64,
    /// Relative gap between the upper and lower distance bounds at which the
    /// convex distance iteration stops.
    pub convergence: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            convergence: 1e-10,
        }
    }
}
