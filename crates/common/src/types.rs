use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::math::{cos_degrees, sin_degrees};

/// Yaw/pitch/roll orientation in degrees.
///
/// Composed yaw (about +Z), then pitch (about the yawed +Y), then roll (about
/// the resulting forward axis). Positive pitch tips the nose towards -Z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub roll_degrees: f32,
}

impl EulerAngles {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(yaw_degrees: f32, pitch_degrees: f32, roll_degrees: f32) -> Self {
        Self {
            yaw_degrees,
            pitch_degrees,
            roll_degrees,
        }
    }

    /// Forward (I), left (J) and up (K) basis vectors in world space.
    pub fn basis_ifwd_jleft_kup(&self) -> (Vec3, Vec3, Vec3) {
        let (cy, sy) = (cos_degrees(self.yaw_degrees), sin_degrees(self.yaw_degrees));
        let (cp, sp) = (
            cos_degrees(self.pitch_degrees),
            sin_degrees(self.pitch_degrees),
        );
        let (cr, sr) = (cos_degrees(self.roll_degrees), sin_degrees(self.roll_degrees));

        let i = Vec3::new(cy * cp, sy * cp, -sp);
        let j = Vec3::new(-sy * cr + cy * sp * sr, cy * cr + sy * sp * sr, cp * sr);
        let k = Vec3::new(sy * sr + cy * sp * cr, -cy * sr + sy * sp * cr, cp * cr);
        (i, j, k)
    }

    /// Rotation-only matrix whose columns are the forward/left/up basis.
    pub fn as_matrix_ifwd_jleft_kup(&self) -> Mat4 {
        let (i, j, k) = self.basis_ifwd_jleft_kup();
        Mat4::from_cols(i.extend(0.0), j.extend(0.0), k.extend(0.0), Vec4::W)
    }

    pub fn forward(&self) -> Vec3 {
        self.basis_ifwd_jleft_kup().0
    }

    pub fn left(&self) -> Vec3 {
        self.basis_ifwd_jleft_kup().1
    }

    pub fn up(&self) -> Vec3 {
        self.basis_ifwd_jleft_kup().2
    }
}

/// Model-to-world transform: translation, then the orientation appended.
pub fn model_to_world(position: Vec3, orientation: &EulerAngles) -> Mat4 {
    Mat4::from_translation(position) * orientation.as_matrix_ifwd_jleft_kup()
}

/// Point at `length` along the direction given by polar angles in degrees.
pub fn vec3_from_polar_degrees(latitude_degrees: f32, longitude_degrees: f32, length: f32) -> Vec3 {
    let cp = cos_degrees(latitude_degrees);
    Vec3::new(
        cp * cos_degrees(longitude_degrees),
        cp * sin_degrees(longitude_degrees),
        -sin_degrees(latitude_degrees),
    ) * length
}
