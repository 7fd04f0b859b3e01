/// Invalid input to a geometric constructor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("{parameter} must be finite and non-negative, got {value}")]
    InvalidDimension { parameter: &'static str, value: f64 },

    #[error("{shape} has a non-finite coordinate")]
    NonFinite { shape: &'static str },

    #[error("direction vector has zero length")]
    ZeroDirection,

    #[error("convex hull needs at least one point")]
    EmptyHull,
}
