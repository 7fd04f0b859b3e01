pub mod distance;
pub mod point;
pub mod shapes;
pub mod transform;
pub mod vector;
