use fit_kernel::{BoundingBox, Capsule, ConvexHull, ConvexShape, Point3d, Sphere, Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::FitmentError;

/// Bounding volume of a vehicle component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ObstacleVolume {
    Sphere(Sphere),
    Capsule(Capsule),
    Hull(ConvexHull),
}

impl ObstacleVolume {
    pub fn validate(&self) -> Result<(), fit_kernel::GeometryError> {
        match self {
            Self::Sphere(s) => s.validate(),
            Self::Capsule(c) => c.validate(),
            Self::Hull(h) => h.validate(),
        }
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        match self {
            Self::Sphere(s) => Self::Sphere(s.transformed(t)),
            Self::Capsule(c) => Self::Capsule(c.transformed(t)),
            Self::Hull(h) => Self::Hull(h.transformed(t)),
        }
    }
}

impl ConvexShape for ObstacleVolume {
    fn support(&self, direction: &Vec3) -> Point3d {
        match self {
            Self::Sphere(s) => s.support(direction),
            Self::Capsule(c) => c.support(direction),
            Self::Hull(h) => h.support(direction),
        }
    }

    fn interior_point(&self) -> Point3d {
        match self {
            Self::Sphere(s) => s.interior_point(),
            Self::Capsule(c) => c.interior_point(),
            Self::Hull(h) => h.interior_point(),
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        match self {
            Self::Sphere(s) => s.bounding_box(),
            Self::Capsule(c) => c.bounding_box(),
            Self::Hull(h) => h.bounding_box(),
        }
    }
}

/// What an obstacle is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleMount {
    /// Body or frame; fixed in the corner frame.
    #[default]
    Chassis,
    /// Knuckle-mounted (calipers, strut bodies); moves with the hub through
    /// travel, camber and steering but not with the wheel offset.
    Upright,
}

/// A named bounding volume owned by the vehicle model.
///
/// Upright-mounted volumes are given in the hub frame at design ride height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearanceObstacle {
    pub id: String,
    pub volume: ObstacleVolume,
    #[serde(default)]
    pub mount: ObstacleMount,
}

impl ClearanceObstacle {
    pub fn chassis(id: impl Into<String>, volume: ObstacleVolume) -> Self {
        Self {
            id: id.into(),
            volume,
            mount: ObstacleMount::Chassis,
        }
    }

    pub fn upright(id: impl Into<String>, volume: ObstacleVolume) -> Self {
        Self {
            id: id.into(),
            volume,
            mount: ObstacleMount::Upright,
        }
    }

    pub fn validate(&self) -> Result<(), FitmentError> {
        self.volume.validate().map_err(|source| FitmentError::InvalidObstacle {
            id: self.id.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_shape_tag() {
        let json = r#"{
            "id": "fender_lip",
            "volume": {"shape": "sphere", "center": {"x": 0, "y": 90, "z": 330}, "radius": 15}
        }"#;
        let obstacle: ClearanceObstacle = serde_json::from_str(json).unwrap();
        assert_eq!(obstacle.mount, ObstacleMount::Chassis);
        assert!(matches!(obstacle.volume, ObstacleVolume::Sphere(_)));
        assert!(obstacle.validate().is_ok());
    }

    #[test]
    fn test_invalid_volume_names_obstacle() {
        let obstacle = ClearanceObstacle::upright(
            "caliper_front_left",
            ObstacleVolume::Hull(ConvexHull { points: vec![] }),
        );
        match obstacle.validate() {
            Err(FitmentError::InvalidObstacle { id, .. }) => assert_eq!(id, "caliper_front_left"),
            other => panic!("expected InvalidObstacle, got {other:?}"),
        }
    }
}
