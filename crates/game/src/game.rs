use glam::{Mat4, Vec2, Vec3};
use protogame_common::{EulerAngles, Rgba8, Vertex, sin_degrees};
use protogame_input::Action;
use protogame_kernel::{Clock, EventArgs};
use protogame_render::{BlendMode, Camera, DepthMode, RasterizerMode, Renderer};
use protogame_tools::{DebugRenderMode, DevConsole, FOREVER};

use crate::config::GameConfig;
use crate::engine::Engine;
use crate::entity::{Entity, GameEntity, UpdateContext};
use crate::grid::build_grid_vertices;
use crate::player::Player;
use crate::prop::{Prop, SPHERE_TEXTURE_PATH};

/// Event fired when the player asks to leave the program.
pub const QUIT_EVENT: &str = "Quit";

const CUBE_SPIN_DEGREES_PER_SECOND: f32 = 30.0;
const SPHERE_SPIN_DEGREES_PER_SECOND: f32 = 45.0;
const BRIGHTNESS_DEGREES_PER_SECOND: f32 = 30.0;
const SLOW_MOTION_SCALE: f64 = 0.1;

const PLAY_CLEAR_COLOR: Rgba8 = Rgba8::opaque(70, 70, 70);
const DIVIDER: &str = "----------------------------------------------------------------------";

const HELP_LINES: &[(&str, Rgba8)] = &[
    ("Welcome to Protogame3D!", DevConsole::INFO_MAJOR),
    (DIVIDER, Rgba8::SEAWEED),
    ("CONTROLS:", DevConsole::INFO_MAJOR),
    ("ESC   - Quits the game", DevConsole::INFO_MINOR),
    ("SPACE - Start game", DevConsole::INFO_MINOR),
    ("SHIFT - Increase speed by factor of 10.", DevConsole::INFO_MINOR),
    ("H     - Reset position and orientation back to 0.", DevConsole::INFO_MINOR),
    ("Q/E   - Roll negative/positive", DevConsole::INFO_MINOR),
    ("A/D   - Move left/right", DevConsole::INFO_MINOR),
    ("W/S   - Move forward/backward", DevConsole::INFO_MINOR),
    ("Z/C   - Move down/up", DevConsole::INFO_MINOR),
    ("T     - Slow motion while held", DevConsole::INFO_MINOR),
    ("P/O   - Pause / step one frame", DevConsole::INFO_MINOR),
    ("F8    - Restart the game", DevConsole::INFO_MINOR),
    (DIVIDER, Rgba8::SEAWEED),
    ("DEBUG CONTROLS:", DevConsole::INFO_MAJOR),
    ("1   - Spawns an xray line", DevConsole::INFO_MINOR),
    ("2   - Spawns a point at xy plane", DevConsole::INFO_MINOR),
    ("3   - Spawns a wire sphere", DevConsole::INFO_MINOR),
    ("4   - Spawns a world basis", DevConsole::INFO_MINOR),
    ("5   - Spawns full opposing billboard text", DevConsole::INFO_MINOR),
    ("6   - Spawns a wire cylinder", DevConsole::INFO_MINOR),
    ("7   - Spawns an orientation message", DevConsole::INFO_MINOR),
    (DIVIDER, Rgba8::SEAWEED),
];

/// The demo scene: player, two cubes, a textured sphere and the floor grid.
///
/// Created empty; `startup` populates it. Everything the scene animates runs
/// on the game clock, which follows the engine's system clock.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    clock: Clock,
    attract_mode: bool,
    player: Player,
    /// Generic entities in insertion order: the spinning cube, then the
    /// pulsing one.
    entities: Vec<GameEntity>,
    sphere: Prop,
    grid: Vec<Vertex>,
    brightness_degrees: f32,
    screen_camera: Camera,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.clone(),
            clock: Clock::with_max_delta(config.clock.max_delta_seconds),
            attract_mode: true,
            player: Player::new(config.player, config.camera),
            entities: Vec::new(),
            sphere: Prop::sphere(Vec3::new(10.0, -5.0, 1.0), None),
            grid: Vec::new(),
            brightness_degrees: 0.0,
            screen_camera: Camera::new(),
        }
    }

    /// Write the controls list to `console`. Printed once per program run,
    /// not per game.
    pub fn print_controls(console: &mut DevConsole) {
        for (text, color) in HELP_LINES {
            console.add_line(*color, *text);
        }
    }

    pub fn startup<R: Renderer>(&mut self, engine: &mut Engine<R>) {
        self.player = Player::new(self.config.player, self.config.camera);
        self.entities = vec![
            GameEntity::Prop(Prop::cube(Vec3::new(2.0, 2.0, 0.0))),
            GameEntity::Prop(Prop::cube(Vec3::new(-2.0, -2.0, 0.0))),
        ];
        let texture = engine.renderer.create_or_get_texture(SPHERE_TEXTURE_PATH);
        self.sphere = Prop::sphere(Vec3::new(10.0, -5.0, 1.0), Some(texture));

        self.add_axis_markers(engine);

        self.grid = build_grid_vertices();
        self.screen_camera
            .set_ortho_view(Vec2::ZERO, self.screen_size());
        tracing::info!(
            entities = self.entities.len(),
            grid_vertices = self.grid.len(),
            "game started"
        );
    }

    fn add_axis_markers<R: Renderer>(&self, engine: &mut Engine<R>) {
        let debug = &mut engine.debug_render;
        let radius = 0.15;
        for (axis, color) in [(Vec3::X, Rgba8::RED), (Vec3::Y, Rgba8::GREEN), (Vec3::Z, Rgba8::BLUE)] {
            debug.add_world_arrow(Vec3::ZERO, axis, radius, FOREVER, color, color, DebugRenderMode::UseDepth);
        }

        let labels = [
            ("x - forward", Vec3::new(0.7, 0.0, 0.2), EulerAngles::new(0.0, 0.0, 90.0), Rgba8::RED),
            ("y - left", Vec3::new(0.0, 0.6, 0.2), EulerAngles::new(-90.0, 0.0, 90.0), Rgba8::GREEN),
            ("z - up", Vec3::new(0.0, -0.25, 0.5), EulerAngles::new(-90.0, -90.0, 90.0), Rgba8::BLUE),
        ];
        for (text, position, orientation, color) in labels {
            let transform = Mat4::from_translation(position) * orientation.as_matrix_ifwd_jleft_kup();
            debug.add_world_text(
                text,
                transform,
                0.1,
                Vec2::splat(0.5),
                FOREVER,
                color,
                color,
                DebugRenderMode::UseDepth,
            );
        }

        debug.add_screen_text(
            "+",
            self.config.screen.bounds(),
            20.0,
            Vec2::splat(0.5),
            FOREVER,
            Rgba8::WHITE,
            Rgba8::WHITE,
        );
    }

    pub fn update<R: Renderer>(&mut self, engine: &mut Engine<R>) {
        self.clock.advance(engine.system_clock.delta_seconds());
        let dt = self.clock.delta_seconds() as f32;

        self.animate_props(dt);
        self.add_status_text(engine);

        let mut ctx = UpdateContext {
            input: &engine.input,
            bindings: &engine.bindings,
            debug_render: &mut engine.debug_render,
        };
        self.player.update(dt, &mut ctx);

        self.adjust_for_pause_and_time_distortion(engine);
        self.handle_mode_keys(engine);

        self.screen_camera
            .set_ortho_view(Vec2::ZERO, self.screen_size());
    }

    fn animate_props(&mut self, dt: f32) {
        self.brightness_degrees += BRIGHTNESS_DEGREES_PER_SECOND * dt;
        let level = (sin_degrees(self.brightness_degrees).abs().clamp(0.0, 1.0) * 255.0) as u8;

        if let Some(cube) = self.entities.get_mut(0) {
            let o = &mut cube.state_mut().orientation;
            o.pitch_degrees += CUBE_SPIN_DEGREES_PER_SECOND * dt;
            o.roll_degrees += CUBE_SPIN_DEGREES_PER_SECOND * dt;
        }
        if let Some(pulsing) = self.entities.get_mut(1) {
            pulsing.state_mut().color = Rgba8::gray(level);
        }
        self.sphere.state_mut().orientation.yaw_degrees += SPHERE_SPIN_DEGREES_PER_SECOND * dt;
    }

    fn add_status_text<R: Renderer>(&self, engine: &mut Engine<R>) {
        let bounds = self.config.screen.bounds();
        let p = self.player.position();
        let system = &engine.system_clock;
        let position_text = format!("Player position: {:.2} {:.2} {:.2}", p.x, p.y, p.z);
        let time_text = format!(
            "Time: {:.2}s FPS: {:.2} Scale: {:.2}",
            system.total_seconds(),
            system.frame_rate(),
            self.clock.time_scale()
        );
        let debug = &mut engine.debug_render;
        debug.add_screen_text(position_text, bounds, 10.0, Vec2::new(0.0, 0.97), 0.0, Rgba8::WHITE, Rgba8::WHITE);
        debug.add_screen_text(time_text, bounds, 15.0, Vec2::new(0.98, 0.97), 0.0, Rgba8::WHITE, Rgba8::WHITE);
    }

    fn adjust_for_pause_and_time_distortion<R: Renderer>(&mut self, engine: &mut Engine<R>) {
        let input = &engine.input;
        let bindings = &engine.bindings;

        let scale = if input.is_action_down(bindings, Action::SlowMotion) {
            SLOW_MOTION_SCALE
        } else {
            1.0
        };
        self.clock.set_time_scale(scale);

        if input.was_action_just_pressed(bindings, Action::TogglePause) {
            self.clock.toggle_pause();
            tracing::debug!(paused = self.clock.is_paused(), "game clock pause toggled");
        }
        if input.was_action_just_pressed(bindings, Action::StepFrame) {
            self.clock.step_single_frame();
            tracing::debug!("game clock single step");
        }
        if input.was_action_just_pressed(bindings, Action::Cancel) && self.attract_mode {
            tracing::info!("quit requested from attract mode");
            engine.events.fire(QUIT_EVENT, &EventArgs::new());
        }
    }

    fn handle_mode_keys<R: Renderer>(&mut self, engine: &Engine<R>) {
        let input = &engine.input;
        let bindings = &engine.bindings;
        if input.was_action_just_pressed(bindings, Action::StartGame) && self.attract_mode {
            self.attract_mode = false;
            tracing::info!("entering play mode");
        }
        if input.was_action_just_pressed(bindings, Action::Cancel) && !self.attract_mode {
            self.attract_mode = true;
            tracing::info!("entering attract mode");
        }
    }

    pub fn render<R: Renderer>(&self, engine: &mut Engine<R>) {
        let renderer = &mut engine.renderer;
        if self.attract_mode {
            renderer.begin_camera(&self.screen_camera);
            renderer.end_camera(&self.screen_camera);
            return;
        }

        let camera = *self.player.camera();
        renderer.begin_camera(&camera);
        renderer.clear_screen(PLAY_CLEAR_COLOR);
        for entity in &self.entities {
            renderer.set_model_constants(entity.model_to_world_transform(), entity.state().color);
            entity.render(renderer);
        }
        self.sphere.render(renderer);
        self.render_grid(renderer);
        renderer.end_camera(&camera);

        engine.debug_render.render_world(renderer, &camera);
        engine
            .debug_render
            .render_screen(renderer, &self.screen_camera);
    }

    fn render_grid<R: Renderer>(&self, renderer: &mut R) {
        renderer.reset_model_constants();
        renderer.set_blend_mode(BlendMode::Opaque);
        renderer.set_rasterizer_mode(RasterizerMode::SolidCullBack);
        renderer.set_depth_mode(DepthMode::ReadWriteLessEqual);
        renderer.bind_texture(None);
        renderer.draw_vertex_array(&self.grid);
    }

    pub fn shutdown(&mut self) {
        self.entities.clear();
        self.grid.clear();
        tracing::info!("game shut down");
    }

    fn screen_size(&self) -> Vec2 {
        Vec2::new(self.config.screen.width, self.config.screen.height)
    }

    pub fn is_attract_mode(&self) -> bool {
        self.attract_mode
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn entities(&self) -> &[GameEntity] {
        &self.entities
    }

    pub fn sphere(&self) -> &Prop {
        &self.sphere
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn grid_vertices(&self) -> &[Vertex] {
        &self.grid
    }

    pub fn brightness_degrees(&self) -> f32 {
        self.brightness_degrees
    }

    pub fn screen_camera(&self) -> &Camera {
        &self.screen_camera
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use protogame_input::KeyCode;
    use protogame_render::{DrawCommand, RecordingRenderer};

    use super::*;

    const DT: f64 = 1.0 / 64.0;

    fn started() -> (Game, Engine<RecordingRenderer>) {
        let config = GameConfig::default();
        let mut engine = Engine::new(RecordingRenderer::new(), &config);
        engine.startup();
        let mut game = Game::new(&config);
        game.startup(&mut engine);
        (game, engine)
    }

    fn frame(game: &mut Game, engine: &mut Engine<RecordingRenderer>) {
        engine.begin_frame(DT);
        game.update(engine);
        game.render(engine);
        engine.end_frame();
    }

    fn tap(game: &mut Game, engine: &mut Engine<RecordingRenderer>, key: KeyCode) {
        engine.input.handle_key_pressed(key);
        frame(game, engine);
        engine.input.handle_key_released(key);
        frame(game, engine);
    }

    #[test]
    fn startup_populates_scene() {
        let (game, engine) = started();
        assert!(game.is_attract_mode());
        assert_eq!(game.entities().len(), 2);
        assert_eq!(game.entities()[0].state().position, Vec3::new(2.0, 2.0, 0.0));
        assert_eq!(game.entities()[1].state().position, Vec3::new(-2.0, -2.0, 0.0));
        assert_eq!(game.sphere().state().position, Vec3::new(10.0, -5.0, 1.0));
        assert!(game.sphere().texture().is_some());
        assert_eq!(game.grid_vertices().len(), 242 * 36);
        // Three arrows and three labels, plus the crosshair.
        assert_eq!(engine.debug_render.world_count(), 6);
        assert_eq!(engine.debug_render.screen_count(), 1);
    }

    #[test]
    fn space_enters_play_and_escape_returns() {
        let (mut game, mut engine) = started();
        tap(&mut game, &mut engine, KeyCode::Space);
        assert!(!game.is_attract_mode());
        tap(&mut game, &mut engine, KeyCode::Escape);
        assert!(game.is_attract_mode());
    }

    #[test]
    fn escape_in_attract_fires_quit_once() {
        let (mut game, mut engine) = started();
        let quits = Rc::new(Cell::new(0));
        let counter = quits.clone();
        engine.events.subscribe(
            QUIT_EVENT,
            Box::new(move |_| {
                counter.set(counter.get() + 1);
                true
            }),
        );

        // Escape from play mode only returns to attract.
        tap(&mut game, &mut engine, KeyCode::Space);
        tap(&mut game, &mut engine, KeyCode::Escape);
        assert_eq!(quits.get(), 0);

        engine.input.handle_key_pressed(KeyCode::Escape);
        frame(&mut game, &mut engine);
        frame(&mut game, &mut engine);
        assert_eq!(quits.get(), 1);
    }

    #[test]
    fn idle_frames_animate_props() {
        let (mut game, mut engine) = started();
        let n = 64;
        for _ in 0..n {
            frame(&mut game, &mut engine);
        }
        let elapsed = (n as f64 * DT) as f32;

        let cube = game.entities()[0].state().orientation;
        assert!((cube.pitch_degrees - 30.0 * elapsed).abs() < 1e-3);
        assert!((cube.roll_degrees - 30.0 * elapsed).abs() < 1e-3);
        let sphere = game.sphere().state().orientation;
        assert!((sphere.yaw_degrees - 45.0 * elapsed).abs() < 1e-3);

        assert!((game.brightness_degrees() - 30.0 * elapsed).abs() < 1e-3);
        let expected = (sin_degrees(30.0 * elapsed).abs() * 255.0) as u8;
        let gray = game.entities()[1].state().color;
        assert!(gray.r.abs_diff(expected) <= 1);
        assert_eq!(gray, Rgba8::gray(gray.r));
    }

    #[test]
    fn pause_freezes_animation_and_step_advances_once() {
        let (mut game, mut engine) = started();
        tap(&mut game, &mut engine, KeyCode::P);
        assert!(game.clock().is_paused());
        let frozen = game.sphere().state().orientation.yaw_degrees;
        for _ in 0..5 {
            frame(&mut game, &mut engine);
        }
        assert_eq!(game.sphere().state().orientation.yaw_degrees, frozen);

        tap(&mut game, &mut engine, KeyCode::O);
        let stepped = game.sphere().state().orientation.yaw_degrees;
        assert!((stepped - frozen - 45.0 * DT as f32).abs() < 1e-4);
        assert!(game.clock().is_paused());
    }

    #[test]
    fn slow_motion_while_held() {
        let (mut game, mut engine) = started();
        engine.input.handle_key_pressed(KeyCode::T);
        frame(&mut game, &mut engine);
        assert_eq!(game.clock().time_scale(), 0.1);
        engine.input.handle_key_released(KeyCode::T);
        frame(&mut game, &mut engine);
        assert_eq!(game.clock().time_scale(), 1.0);
    }

    #[test]
    fn attract_renders_screen_camera_only() {
        let (mut game, mut engine) = started();
        frame(&mut game, &mut engine);
        let cams: Vec<_> = engine.renderer.cameras().collect();
        assert_eq!(cams.len(), 1);
        assert!(cams[0].perspective().is_none());
        assert!(engine.renderer.draw_call_sizes().is_empty());
    }

    #[test]
    fn play_renders_scene_then_debug_overlays() {
        let (mut game, mut engine) = started();
        tap(&mut game, &mut engine, KeyCode::Space);
        frame(&mut game, &mut engine);

        let commands = engine.renderer.commands();
        assert_eq!(commands[1], DrawCommand::ClearScreen(Rgba8::opaque(70, 70, 70)));
        let sizes = engine.renderer.draw_call_sizes();
        // Two cubes, the sphere, the grid, then debug meshes.
        assert_eq!(&sizes[..4], &[36, 36, 32 * 16 * 6, 242 * 36]);

        let cams: Vec<_> = engine.renderer.cameras().collect();
        assert_eq!(cams.len(), 3);
        let p = cams[0].perspective().unwrap();
        assert_eq!((p.aspect, p.fov_degrees, p.near, p.far), (2.0, 60.0, 0.1, 100.0));
        assert_eq!(cams[2].ortho_bounds(), Some(GameConfig::default().screen.bounds()));

        let texts: Vec<_> = engine.renderer.texts().map(|t| t.text.clone()).collect();
        assert!(texts.iter().any(|t| t.starts_with("Player position: -1.00 0.00 0.50")));
        assert!(texts.iter().any(|t| t.starts_with("Time: ")));
        assert!(texts.iter().any(|t| t == "+"));
        assert!(texts.iter().any(|t| t == "x - forward"));
    }

    #[test]
    fn status_text_lives_one_frame() {
        let (mut game, mut engine) = started();
        for _ in 0..10 {
            frame(&mut game, &mut engine);
        }
        // Only the crosshair survives between frames.
        assert_eq!(engine.debug_render.screen_count(), 1);
    }
}
