use glam::{Vec2, Vec3};

use crate::Rgba8;

/// Position / color / texture-coordinate vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Rgba8,
    pub uv: Vec2,
}

impl Vertex {
    pub const fn new(position: Vec3, color: Rgba8, uv: Vec2) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }
}
