use std::sync::OnceLock;

use glam::Vec3;
use protogame_common::{Aabb2, Rgba8, Vertex};
use protogame_render::vertex_utils::{add_verts_for_quad3d, add_verts_for_sphere3d};
use protogame_render::{BlendMode, DepthMode, RasterizerMode, Renderer, TextureHandle};

use crate::entity::{Entity, EntityState, UpdateContext};

/// Texture bound while drawing the sphere prop.
pub const SPHERE_TEXTURE_PATH: &str = "Data/Images/TestUV.png";

static CUBE_VERTS: OnceLock<Vec<Vertex>> = OnceLock::new();
static SPHERE_VERTS: OnceLock<Vec<Vertex>> = OnceLock::new();

/// Unit cube centered on the origin, one color per face.
pub fn cube_vertices() -> &'static [Vertex] {
    CUBE_VERTS.get_or_init(|| {
        let h = 0.5;
        let uvs = Aabb2::ZERO_TO_ONE;
        let mut verts = Vec::with_capacity(36);
        let faces = [
            // +X
            (
                [Vec3::new(h, -h, -h), Vec3::new(h, h, -h), Vec3::new(h, h, h), Vec3::new(h, -h, h)],
                Rgba8::RED,
            ),
            // -X
            (
                [Vec3::new(-h, h, -h), Vec3::new(-h, -h, -h), Vec3::new(-h, -h, h), Vec3::new(-h, h, h)],
                Rgba8::CYAN,
            ),
            // +Y
            (
                [Vec3::new(h, h, -h), Vec3::new(-h, h, -h), Vec3::new(-h, h, h), Vec3::new(h, h, h)],
                Rgba8::GREEN,
            ),
            // -Y
            (
                [Vec3::new(-h, -h, -h), Vec3::new(h, -h, -h), Vec3::new(h, -h, h), Vec3::new(-h, -h, h)],
                Rgba8::MAGENTA,
            ),
            // +Z
            (
                [Vec3::new(h, h, h), Vec3::new(-h, h, h), Vec3::new(-h, -h, h), Vec3::new(h, -h, h)],
                Rgba8::BLUE,
            ),
            // -Z
            (
                [Vec3::new(-h, h, -h), Vec3::new(h, h, -h), Vec3::new(h, -h, -h), Vec3::new(-h, -h, -h)],
                Rgba8::YELLOW,
            ),
        ];
        for ([bl, br, tr, tl], color) in faces {
            add_verts_for_quad3d(&mut verts, bl, br, tr, tl, color, uvs);
        }
        verts
    })
}

/// Unit-radius UV sphere, 32 slices by 16 stacks.
pub fn sphere_vertices() -> &'static [Vertex] {
    SPHERE_VERTS.get_or_init(|| {
        let mut verts = Vec::with_capacity(32 * 16 * 6);
        add_verts_for_sphere3d(
            &mut verts,
            Vec3::ZERO,
            1.0,
            Rgba8::WHITE,
            Aabb2::ZERO_TO_ONE,
            32,
            16,
        );
        verts
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropShape {
    Cube,
    Sphere,
}

/// Static scenery. Inert on update; the game animates it directly.
#[derive(Debug, Clone)]
pub struct Prop {
    state: EntityState,
    shape: PropShape,
    texture: Option<TextureHandle>,
}

impl Prop {
    pub fn cube(position: Vec3) -> Self {
        Self {
            state: EntityState::at(position),
            shape: PropShape::Cube,
            texture: None,
        }
    }

    pub fn sphere(position: Vec3, texture: Option<TextureHandle>) -> Self {
        Self {
            state: EntityState::at(position),
            shape: PropShape::Sphere,
            texture,
        }
    }

    pub fn shape(&self) -> PropShape {
        self.shape
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    fn vertices(&self) -> &'static [Vertex] {
        match self.shape {
            PropShape::Cube => cube_vertices(),
            PropShape::Sphere => sphere_vertices(),
        }
    }
}

impl Entity for Prop {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn update(&mut self, _delta_seconds: f32, _ctx: &mut UpdateContext<'_>) {}

    fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.set_blend_mode(BlendMode::Opaque);
        renderer.set_rasterizer_mode(RasterizerMode::SolidCullBack);
        renderer.set_depth_mode(DepthMode::ReadWriteLessEqual);
        renderer.bind_texture(self.texture);
        renderer.set_model_constants(self.model_to_world_transform(), self.state.color);
        renderer.draw_vertex_array(self.vertices());
    }
}
