use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

pub fn sin_degrees(degrees: f32) -> f32 {
    degrees.to_radians().sin()
}

pub fn cos_degrees(degrees: f32) -> f32 {
    degrees.to_radians().cos()
}

/// Axis-aligned 2D box, typically a screen-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub mins: Vec2,
    pub maxs: Vec2,
}

impl Aabb2 {
    pub const ZERO_TO_ONE: Self = Self {
        mins: Vec2::ZERO,
        maxs: Vec2::ONE,
    };

    pub const fn new(mins: Vec2, maxs: Vec2) -> Self {
        Self { mins, maxs }
    }

    pub fn from_coords(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    pub fn dimensions(&self) -> Vec2 {
        self.maxs - self.mins
    }

    pub fn center(&self) -> Vec2 {
        (self.mins + self.maxs) * 0.5
    }

    /// Point at normalized coordinates inside the box ((0,0) = mins, (1,1) = maxs).
    pub fn point_at_uv(&self, uv: Vec2) -> Vec2 {
        self.mins + self.dimensions() * uv
    }
}

/// Axis-aligned 3D box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    pub mins: Vec3,
    pub maxs: Vec3,
}

impl Aabb3 {
    pub const fn new(mins: Vec3, maxs: Vec3) -> Self {
        Self { mins, maxs }
    }

    pub fn from_coords(
        min_x: f32,
        min_y: f32,
        min_z: f32,
        max_x: f32,
        max_y: f32,
        max_z: f32,
    ) -> Self {
        Self::new(
            Vec3::new(min_x, min_y, min_z),
            Vec3::new(max_x, max_y, max_z),
        )
    }

    pub fn center(&self) -> Vec3 {
        (self.mins + self.maxs) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trig_in_degrees() {
        assert!((sin_degrees(90.0) - 1.0).abs() < 1e-6);
        assert!(cos_degrees(90.0).abs() < 1e-6);
        assert!((sin_degrees(30.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn aabb2_point_at_uv() {
        let b = Aabb2::from_coords(0.0, 0.0, 1600.0, 800.0);
        assert_eq!(b.point_at_uv(Vec2::new(0.5, 0.5)), Vec2::new(800.0, 400.0));
        assert_eq!(b.center(), Vec2::new(800.0, 400.0));
        assert_eq!(b.dimensions(), Vec2::new(1600.0, 800.0));
    }

    #[test]
    fn aabb3_center() {
        let b = Aabb3::from_coords(-1.0, -2.0, -3.0, 1.0, 2.0, 3.0);
        assert_eq!(b.center(), Vec3::ZERO);
    }
}
