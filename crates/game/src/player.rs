use glam::{Vec2, Vec3};
use protogame_common::{EulerAngles, Rgba8, vec3_from_polar_degrees};
use protogame_input::{Action, XboxButton};
use protogame_render::{Camera, Renderer};
use protogame_tools::{DebugRenderMode, DebugRenderSystem};

use crate::config::{CameraConfig, PlayerConfig};
use crate::entity::{Entity, EntityState, UpdateContext};

const POINT_COLOR: Rgba8 = Rgba8::opaque(150, 75, 0);

/// First-person fly camera.
///
/// Reads pointer, keyboard and the first gamepad every update, then clamps
/// pitch and roll and syncs its camera.
#[derive(Debug, Clone)]
pub struct Player {
    state: EntityState,
    camera: Camera,
    settings: PlayerConfig,
    lens: CameraConfig,
}

impl Player {
    pub fn new(settings: PlayerConfig, lens: CameraConfig) -> Self {
        let mut camera = Camera::new();
        camera.set_camera_to_render_transform(Camera::game_to_render_transform());
        let mut player = Self {
            state: EntityState::at(settings.start_position),
            camera,
            settings,
            lens,
        };
        player.sync_camera();
        player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn orientation(&self) -> EulerAngles {
        self.state.orientation
    }

    /// Back to the world origin, unrotated.
    pub fn reset(&mut self) {
        self.state.position = Vec3::ZERO;
        self.state.orientation = EulerAngles::ZERO;
        tracing::debug!("player reset");
    }

    /// Forward direction scaled to the debug spawn distance.
    fn spawn_offset(&self) -> Vec3 {
        let o = self.state.orientation;
        vec3_from_polar_degrees(o.pitch_degrees, o.yaw_degrees, 2.0)
    }

    fn apply_pointer(&mut self, delta: Vec2) {
        let s = self.settings.mouse_sensitivity;
        self.state.orientation.yaw_degrees += s * delta.x;
        self.state.orientation.pitch_degrees -= s * delta.y;
    }

    fn apply_keyboard(&mut self, dt: f32, ctx: &mut UpdateContext<'_>) {
        let down = |action| ctx.input.is_action_down(ctx.bindings, action);

        let mut speed = self.settings.move_speed;
        if down(Action::SpeedBoost) {
            speed *= self.settings.boost_multiplier;
        }

        let roll = self.settings.roll_rate_degrees * dt;
        if down(Action::RollNegative) {
            self.state.orientation.roll_degrees -= roll;
        }
        if down(Action::RollPositive) {
            self.state.orientation.roll_degrees += roll;
        }

        let (forward, left, _) = self.state.orientation.basis_ifwd_jleft_kup();
        let step = speed * dt;
        let mut motion = Vec3::ZERO;
        if down(Action::MoveLeft) {
            motion += left;
        }
        if down(Action::MoveRight) {
            motion -= left;
        }
        if down(Action::MoveForward) {
            motion += forward;
        }
        if down(Action::MoveBackward) {
            motion -= forward;
        }
        if down(Action::MoveDown) {
            motion -= Vec3::Z;
        }
        if down(Action::MoveUp) {
            motion += Vec3::Z;
        }
        self.state.position += motion * step;

        if ctx.input.was_action_just_pressed(ctx.bindings, Action::ResetPlayer) {
            self.reset();
        }

        self.spawn_debug_shapes(ctx);
    }

    fn spawn_debug_shapes(&self, ctx: &mut UpdateContext<'_>) {
        let pressed = |action| ctx.input.was_action_just_pressed(ctx.bindings, action);
        let held = ctx.input.is_action_down(ctx.bindings, Action::DebugPoint);
        let fire_line = pressed(Action::DebugLine);
        let fire_wire_sphere = pressed(Action::DebugWireSphere);
        let fire_basis = pressed(Action::DebugBasis);
        let fire_text = pressed(Action::DebugBillboardText);
        let fire_cylinder = pressed(Action::DebugWireCylinder);
        let fire_message = pressed(Action::DebugMessage);

        let debug: &mut DebugRenderSystem = &mut *ctx.debug_render;
        let pos = self.state.position;
        let ahead = pos + self.spawn_offset();
        let o = self.state.orientation;

        if fire_line {
            debug.add_world_line(
                pos,
                pos + self.spawn_offset() * 10.0,
                0.0625,
                10.0,
                Rgba8::YELLOW,
                Rgba8::YELLOW,
                DebugRenderMode::XRay,
            );
        }
        if held {
            debug.add_world_point(
                Vec3::new(pos.x, pos.y, 0.0),
                0.2,
                60.0,
                POINT_COLOR,
                POINT_COLOR,
                DebugRenderMode::UseDepth,
            );
        }
        if fire_wire_sphere {
            debug.add_world_wire_sphere(
                ahead,
                1.0,
                5.0,
                Rgba8::GREEN,
                Rgba8::RED,
                DebugRenderMode::UseDepth,
            );
        }
        if fire_basis {
            debug.add_world_basis(self.model_to_world_transform(), 20.0, DebugRenderMode::UseDepth);
        }
        if fire_text {
            let text = format!(
                "Position: {:.1} {:.1} {:.1}, Orientation: {:.1}, {:.1}, {:.1},",
                pos.x, pos.y, pos.z, o.yaw_degrees, o.pitch_degrees, o.roll_degrees
            );
            debug.add_world_billboard_text(
                text,
                ahead,
                0.15,
                Vec2::splat(0.5),
                10.0,
                Rgba8::WHITE,
                Rgba8::RED,
                DebugRenderMode::UseDepth,
            );
        }
        if fire_cylinder {
            debug.add_world_wire_cylinder(
                pos,
                pos + Vec3::Z,
                0.5,
                10.0,
                Rgba8::WHITE,
                Rgba8::RED,
                DebugRenderMode::UseDepth,
            );
        }
        if fire_message {
            let text = format!(
                "Orientation: {:.1}, {:.1}, {:.1},",
                o.yaw_degrees, o.pitch_degrees, o.roll_degrees
            );
            debug.add_message(text, 5.0, Rgba8::WHITE, Rgba8::WHITE);
        }
    }

    /// Gamepad pass. Trigger roll replaces the accumulated roll outright.
    fn apply_controller(&mut self, dt: f32, ctx: &UpdateContext<'_>) {
        let pad = ctx.input.controller(0);
        if !pad.is_connected() {
            return;
        }

        let mut speed = self.settings.move_speed;
        if pad.is_button_down(XboxButton::A) {
            speed *= self.settings.boost_multiplier;
        }

        let roll = self.settings.roll_rate_degrees * dt;
        if pad.left_trigger() != 0.0 {
            self.state.orientation.roll_degrees = -roll;
        }
        if pad.right_trigger() != 0.0 {
            self.state.orientation.roll_degrees = roll;
        }

        let stick = pad.left_stick();
        if stick.magnitude() > 0.0 {
            let (forward, left, _) = self.state.orientation.basis_ifwd_jleft_kup();
            let p = stick.position();
            self.state.position += -speed * p.x * left * dt;
            self.state.position += speed * p.y * forward * dt;
        }

        if pad.is_button_down(XboxButton::LeftShoulder) {
            self.state.position -= speed * Vec3::Z * dt;
        }
        if pad.is_button_down(XboxButton::RightShoulder) {
            self.state.position += speed * Vec3::Z * dt;
        }

        if pad.was_button_just_pressed(XboxButton::Start) {
            self.reset();
        }
    }

    fn clamp_orientation(&mut self) {
        let pitch = self.settings.pitch_limit_degrees;
        let roll = self.settings.roll_limit_degrees;
        let o = &mut self.state.orientation;
        o.pitch_degrees = o.pitch_degrees.clamp(-pitch, pitch);
        o.roll_degrees = o.roll_degrees.clamp(-roll, roll);
    }

    fn sync_camera(&mut self) {
        self.camera
            .set_position_and_orientation(self.state.position, self.state.orientation);
        let lens = self.lens;
        self.camera
            .set_perspective_view(lens.aspect, lens.fov_degrees, lens.near, lens.far);
    }
}

impl Entity for Player {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn update(&mut self, delta_seconds: f32, ctx: &mut UpdateContext<'_>) {
        self.apply_pointer(ctx.input.cursor_client_delta());
        self.apply_keyboard(delta_seconds, ctx);
        self.apply_controller(delta_seconds, ctx);
        self.clamp_orientation();
        self.sync_camera();
    }

    fn render<R: Renderer + ?Sized>(&self, _renderer: &mut R) {}
}

#[cfg(test)]
mod tests {
    use protogame_input::{CursorMode, InputSystem, KeyBindings, KeyCode};
    use protogame_kernel::EngineSubsystem;

    use super::*;

    struct Rig {
        input: InputSystem,
        bindings: KeyBindings,
        debug: DebugRenderSystem,
        player: Player,
    }

    impl Rig {
        fn new() -> Self {
            let mut input = InputSystem::new();
            input.set_cursor_mode(CursorMode::Fps);
            Self {
                input,
                bindings: KeyBindings::default(),
                debug: DebugRenderSystem::new(),
                player: Player::new(PlayerConfig::default(), CameraConfig::default()),
            }
        }

        fn step(&mut self, dt: f32) {
            self.input.begin_frame();
            let mut ctx = UpdateContext {
                input: &self.input,
                bindings: &self.bindings,
                debug_render: &mut self.debug,
            };
            self.player.update(dt, &mut ctx);
            self.input.end_frame();
        }
    }

    #[test]
    fn starts_at_configured_position() {
        let rig = Rig::new();
        assert_eq!(rig.player.position(), Vec3::new(-1.0, 0.0, 0.5));
        assert_eq!(rig.player.camera().position(), Vec3::new(-1.0, 0.0, 0.5));
    }

    #[test]
    fn pointer_turns_and_pitch_clamps() {
        let mut rig = Rig::new();
        rig.input.add_cursor_motion(Vec2::new(100.0, -5000.0));
        rig.step(0.016);
        let o = rig.player.orientation();
        assert!((o.yaw_degrees - 8.0).abs() < 1e-4);
        assert_eq!(o.pitch_degrees, 85.0);

        rig.input.add_cursor_motion(Vec2::new(0.0, 10_000.0));
        rig.step(0.016);
        assert_eq!(rig.player.orientation().pitch_degrees, -85.0);
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut rig = Rig::new();
        for _ in 0..10 {
            rig.input.add_cursor_motion(Vec2::new(1000.0, 0.0));
            rig.step(0.016);
        }
        assert!((rig.player.orientation().yaw_degrees - 800.0).abs() < 1e-2);
    }

    #[test]
    fn keyboard_roll_accumulates_then_clamps() {
        let mut rig = Rig::new();
        rig.input.handle_key_pressed(KeyCode::E);
        rig.step(0.1);
        assert!((rig.player.orientation().roll_degrees - 9.0).abs() < 1e-4);
        for _ in 0..10 {
            rig.step(0.1);
        }
        assert_eq!(rig.player.orientation().roll_degrees, 45.0);
    }

    #[test]
    fn forward_and_boost() {
        let mut rig = Rig::new();
        rig.input.handle_key_pressed(KeyCode::W);
        rig.step(0.5);
        assert!((rig.player.position() - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);

        rig.input.handle_key_pressed(KeyCode::Shift);
        rig.step(0.5);
        assert!((rig.player.position() - Vec3::new(10.0, 0.0, 0.5)).length() < 1e-4);
    }

    #[test]
    fn strafe_left_and_rise() {
        let mut rig = Rig::new();
        rig.input.handle_key_pressed(KeyCode::A);
        rig.input.handle_key_pressed(KeyCode::C);
        rig.step(1.0);
        assert!((rig.player.position() - Vec3::new(-1.0, 2.0, 2.5)).length() < 1e-5);
    }

    #[test]
    fn h_resets_to_origin() {
        let mut rig = Rig::new();
        rig.input.add_cursor_motion(Vec2::new(50.0, 0.0));
        rig.step(0.016);
        rig.input.handle_key_pressed(KeyCode::H);
        rig.step(0.016);
        assert_eq!(rig.player.position(), Vec3::ZERO);
        assert_eq!(rig.player.orientation(), EulerAngles::ZERO);
    }

    #[test]
    fn trigger_roll_overwrites_keyboard_roll() {
        let mut rig = Rig::new();
        rig.input.handle_key_pressed(KeyCode::E);
        rig.step(0.1);
        rig.step(0.1);
        assert!((rig.player.orientation().roll_degrees - 18.0).abs() < 1e-4);

        let pad = rig.input.controller_mut(0);
        pad.set_connected(true);
        pad.set_triggers(1.0, 0.0);
        rig.step(0.1);
        assert!((rig.player.orientation().roll_degrees + 9.0).abs() < 1e-4);
    }

    #[test]
    fn stick_moves_along_basis() {
        let mut rig = Rig::new();
        let pad = rig.input.controller_mut(0);
        pad.set_connected(true);
        // Past the outer dead zone: full deflection to the right.
        pad.left_stick_mut().update_position(Vec2::new(1.0, 0.0));
        rig.step(1.0);
        assert!((rig.player.position() - Vec3::new(-1.0, -2.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn left_shoulder_lowers() {
        let mut rig = Rig::new();
        let pad = rig.input.controller_mut(0);
        pad.set_connected(true);
        pad.set_button(XboxButton::LeftShoulder, true);
        rig.step(1.0);
        assert!((rig.player.position() - Vec3::new(-1.0, 0.0, -1.5)).length() < 1e-5);
    }

    #[test]
    fn right_shoulder_with_a_rises_boosted() {
        let mut rig = Rig::new();
        let pad = rig.input.controller_mut(0);
        pad.set_connected(true);
        pad.set_button(XboxButton::RightShoulder, true);
        pad.set_button(XboxButton::A, true);
        rig.step(1.0);
        assert!((rig.player.position() - Vec3::new(-1.0, 0.0, 20.5)).length() < 1e-4);
    }

    #[test]
    fn start_button_resets() {
        let mut rig = Rig::new();
        let pad = rig.input.controller_mut(0);
        pad.set_connected(true);
        pad.set_button(XboxButton::Start, true);
        rig.step(0.016);
        assert_eq!(rig.player.position(), Vec3::ZERO);
    }

    #[test]
    fn perspective_is_fixed_after_update() {
        let mut rig = Rig::new();
        rig.input.handle_key_pressed(KeyCode::W);
        rig.step(0.05);
        let p = rig.player.camera().perspective().unwrap();
        assert_eq!((p.aspect, p.fov_degrees, p.near, p.far), (2.0, 60.0, 0.1, 100.0));
    }

    #[test]
    fn debug_keys_spawn_primitives() {
        let mut rig = Rig::new();
        for key in [KeyCode::Digit1, KeyCode::Digit3, KeyCode::Digit4, KeyCode::Digit5, KeyCode::Digit6] {
            rig.input.handle_key_pressed(key);
        }
        rig.step(0.016);
        assert_eq!(rig.debug.world_count(), 5);

        rig.input.handle_key_pressed(KeyCode::Digit7);
        rig.step(0.016);
        assert_eq!(rig.debug.screen_count(), 1);
        // Keys still held, but only edges spawn again.
        assert_eq!(rig.debug.world_count(), 5);
    }

    #[test]
    fn held_point_key_spawns_every_frame() {
        let mut rig = Rig::new();
        rig.input.handle_key_pressed(KeyCode::Digit2);
        rig.step(0.016);
        rig.step(0.016);
        rig.step(0.016);
        assert_eq!(rig.debug.world_count(), 3);
    }
}
