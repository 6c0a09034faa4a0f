mod aabb;
mod color;
mod plane;

pub use aabb::Aabb;
pub use color::Rgb;
pub use plane::ClipPlane;
