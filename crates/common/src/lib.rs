//! Shared types for the protogame workspace.
//!
//! World space is X forward, Y left, Z up. Orientation angles are degrees.

pub mod color;
pub mod math;
pub mod types;
pub mod vertex;

pub use color::Rgba8;
pub use math::{Aabb2, Aabb3, cos_degrees, sin_degrees};
pub use types::{EulerAngles, model_to_world, vec3_from_polar_degrees};
pub use vertex::Vertex;
