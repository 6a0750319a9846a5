use glam::{Mat4, Vec3};
use protogame_common::{EulerAngles, Rgba8, model_to_world};
use protogame_input::{InputSystem, KeyBindings};
use protogame_render::Renderer;
use protogame_tools::DebugRenderSystem;

use crate::{Player, Prop};

/// Placement and tint shared by every entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityState {
    pub position: Vec3,
    pub orientation: EulerAngles,
    pub color: Rgba8,
}

impl EntityState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: EulerAngles::ZERO,
            color: Rgba8::WHITE,
        }
    }
}

/// Engine services an entity may touch while updating.
pub struct UpdateContext<'a> {
    pub input: &'a InputSystem,
    pub bindings: &'a KeyBindings,
    pub debug_render: &'a mut DebugRenderSystem,
}

pub trait Entity {
    fn state(&self) -> &EntityState;

    fn state_mut(&mut self) -> &mut EntityState;

    fn update(&mut self, delta_seconds: f32, ctx: &mut UpdateContext<'_>);

    /// Emit draw calls. Never mutates the entity.
    fn render<R: Renderer + ?Sized>(&self, renderer: &mut R);

    fn model_to_world_transform(&self) -> Mat4 {
        let state = self.state();
        model_to_world(state.position, &state.orientation)
    }
}

/// The closed set of entity kinds a game holds.
#[derive(Debug, Clone)]
pub enum GameEntity {
    Player(Player),
    Prop(Prop),
}

impl Entity for GameEntity {
    fn state(&self) -> &EntityState {
        match self {
            Self::Player(p) => p.state(),
            Self::Prop(p) => p.state(),
        }
    }

    fn state_mut(&mut self) -> &mut EntityState {
        match self {
            Self::Player(p) => p.state_mut(),
            Self::Prop(p) => p.state_mut(),
        }
    }

    fn update(&mut self, delta_seconds: f32, ctx: &mut UpdateContext<'_>) {
        match self {
            Self::Player(p) => p.update(delta_seconds, ctx),
            Self::Prop(p) => p.update(delta_seconds, ctx),
        }
    }

    fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            Self::Player(p) => p.render(renderer),
            Self::Prop(p) => p.render(renderer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_white_and_unrotated() {
        let s = EntityState::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(s.color, Rgba8::WHITE);
        assert_eq!(s.orientation, EulerAngles::ZERO);
    }

    #[test]
    fn default_transform_is_translation_then_rotation() {
        let mut e = GameEntity::Prop(Prop::cube(Vec3::new(1.0, 2.0, 3.0)));
        e.state_mut().orientation = EulerAngles::new(90.0, 0.0, 0.0);
        let m = e.model_to_world_transform();
        // Local forward maps to world +Y after a 90° yaw, offset by position.
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 3.0, 3.0)).length() < 1e-5);
    }
}
