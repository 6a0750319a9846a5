use glam::{Mat4, Vec2, Vec3};
use protogame_common::{Aabb2, EulerAngles, model_to_world};

/// Perspective projection parameters. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveParams {
    pub aspect: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Orthographic {
        bottom_left: Vec2,
        top_right: Vec2,
        near: f32,
        far: f32,
    },
    Perspective(PerspectiveParams),
}

/// A view into the world: placement, projection and the fixed change of
/// basis from game axes to render axes.
///
/// Render space is left-handed: X right, Y up, Z into the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    orientation: EulerAngles,
    projection: Projection,
    camera_to_render: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: EulerAngles::ZERO,
            projection: Projection::Orthographic {
                bottom_left: Vec2::ZERO,
                top_right: Vec2::ONE,
                near: 0.0,
                far: 1.0,
            },
            camera_to_render: Mat4::IDENTITY,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera looking along game +X with game +Z up.
    ///
    /// Maps game forward (I) to render +Z, game left (J) to render -X and
    /// game up (K) to render +Y.
    pub fn game_to_render_transform() -> Mat4 {
        Mat4::from_cols(
            Vec3::Z.extend(0.0),
            (-Vec3::X).extend(0.0),
            Vec3::Y.extend(0.0),
            Vec3::ZERO.extend(1.0),
        )
    }

    pub fn set_ortho_view(&mut self, bottom_left: Vec2, top_right: Vec2) {
        self.projection = Projection::Orthographic {
            bottom_left,
            top_right,
            near: 0.0,
            far: 1.0,
        };
    }

    pub fn set_perspective_view(&mut self, aspect: f32, fov_degrees: f32, near: f32, far: f32) {
        self.projection = Projection::Perspective(PerspectiveParams {
            aspect,
            fov_degrees,
            near,
            far,
        });
    }

    pub fn set_position_and_orientation(&mut self, position: Vec3, orientation: EulerAngles) {
        self.position = position;
        self.orientation = orientation;
    }

    pub fn set_camera_to_render_transform(&mut self, transform: Mat4) {
        self.camera_to_render = transform;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> EulerAngles {
        self.orientation
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn camera_to_render_transform(&self) -> Mat4 {
        self.camera_to_render
    }

    /// Perspective parameters, if this is a perspective camera.
    pub fn perspective(&self) -> Option<PerspectiveParams> {
        match self.projection {
            Projection::Perspective(p) => Some(p),
            Projection::Orthographic { .. } => None,
        }
    }

    /// Orthographic bounds, if this is an orthographic camera.
    pub fn ortho_bounds(&self) -> Option<Aabb2> {
        match self.projection {
            Projection::Orthographic {
                bottom_left,
                top_right,
                ..
            } => Some(Aabb2::new(bottom_left, top_right)),
            Projection::Perspective(_) => None,
        }
    }

    pub fn model_to_world(&self) -> Mat4 {
        model_to_world(self.position, &self.orientation)
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        self.model_to_world().inverse()
    }

    /// Render-to-clip transform (depth 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Orthographic {
                bottom_left,
                top_right,
                near,
                far,
            } => Mat4::orthographic_lh(
                bottom_left.x,
                top_right.x,
                bottom_left.y,
                top_right.y,
                near,
                far,
            ),
            Projection::Perspective(p) => {
                Mat4::perspective_lh(p.fov_degrees.to_radians(), p.aspect, p.near, p.far)
            }
        }
    }

    /// World-to-clip: projection · camera-to-render · view.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.camera_to_render * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_is_unit_ortho() {
        let cam = Camera::default();
        assert_eq!(cam.ortho_bounds(), Some(Aabb2::ZERO_TO_ONE));
        assert!(cam.perspective().is_none());
    }

    #[test]
    fn perspective_params_round_trip() {
        let mut cam = Camera::new();
        cam.set_perspective_view(2.0, 60.0, 0.1, 100.0);
        let p = cam.perspective().unwrap();
        assert_eq!(p.aspect, 2.0);
        assert_eq!(p.fov_degrees, 60.0);
        assert!(cam.ortho_bounds().is_none());
    }

    #[test]
    fn screen_ortho_maps_corners_to_ndc() {
        let mut cam = Camera::new();
        cam.set_ortho_view(Vec2::ZERO, Vec2::new(1600.0, 800.0));
        let vp = cam.view_projection();
        let bl = vp.project_point3(Vec3::ZERO);
        let tr = vp.project_point3(Vec3::new(1600.0, 800.0, 0.0));
        assert!((bl - Vec3::new(-1.0, -1.0, 0.0)).length() < 1e-5);
        assert!((tr - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn game_forward_is_screen_center() {
        let mut cam = Camera::new();
        cam.set_camera_to_render_transform(Camera::game_to_render_transform());
        cam.set_perspective_view(2.0, 60.0, 0.1, 100.0);
        cam.set_position_and_orientation(Vec3::new(-1.0, 0.0, 0.5), EulerAngles::ZERO);

        let vp = cam.view_projection();
        let ahead = vp.project_point3(Vec3::new(9.0, 0.0, 0.5));
        assert!(ahead.x.abs() < 1e-5 && ahead.y.abs() < 1e-5);
        assert!(ahead.z > 0.0 && ahead.z < 1.0);

        // Game +Y (left) lands on the left half of the screen.
        let left = vp.project_point3(Vec3::new(9.0, 1.0, 0.5));
        assert!(left.x < 0.0);
        // Game +Z (up) lands on the upper half.
        let up = vp.project_point3(Vec3::new(9.0, 0.0, 1.5));
        assert!(up.y > 0.0);
    }
}
