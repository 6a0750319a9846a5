use std::cell::Cell;
use std::rc::Rc;

use protogame_common::Rgba8;
use protogame_input::{Action, CursorMode, KeyCode};
use protogame_kernel::{EventArgs, SubscriptionId};
use protogame_render::Renderer;

use crate::config::GameConfig;
use crate::engine::Engine;
use crate::game::{Game, QUIT_EVENT};

const APP_CLEAR_COLOR: Rgba8 = Rgba8::opaque(150, 150, 150);

/// Top-level driver: owns the engine and the single game slot.
///
/// Platform layers feed input through the `handle_*` methods and call
/// [`App::run_frame`] until [`App::is_quitting`] turns true.
#[derive(Debug)]
pub struct App<R: Renderer> {
    engine: Engine<R>,
    game: Option<Game>,
    config: GameConfig,
    quitting: Rc<Cell<bool>>,
    quit_subscription: Option<SubscriptionId>,
}

impl<R: Renderer> App<R> {
    pub fn new(renderer: R, config: GameConfig) -> Self {
        Self {
            engine: Engine::new(renderer, &config),
            game: None,
            config,
            quitting: Rc::new(Cell::new(false)),
            quit_subscription: None,
        }
    }

    pub fn startup(&mut self) {
        self.engine.startup();

        let flag = self.quitting.clone();
        self.quit_subscription = Some(self.engine.events.subscribe(
            QUIT_EVENT,
            Box::new(move |_| {
                flag.set(true);
                true
            }),
        ));

        Game::print_controls(&mut self.engine.console);
        let mut game = Game::new(&self.config);
        game.startup(&mut self.engine);
        self.game = Some(game);
        tracing::info!(title = %self.config.window.title, "app started");
    }

    pub fn shutdown(&mut self) {
        if let Some(mut game) = self.game.take() {
            game.shutdown();
        }
        if let Some(id) = self.quit_subscription.take() {
            self.engine.events.unsubscribe(id);
        }
        self.engine.shutdown();
        tracing::info!("app shut down");
    }

    /// Tear down the current game and start a fresh one in its place.
    pub fn restart_game(&mut self) {
        if let Some(mut old) = self.game.take() {
            old.shutdown();
        }
        self.engine.debug_render.clear();
        let mut game = Game::new(&self.config);
        game.startup(&mut self.engine);
        self.game = Some(game);
        tracing::info!("game restarted");
    }

    /// One frame: begin, update, render, end.
    pub fn run_frame(&mut self, real_delta_seconds: f64) {
        self.engine.begin_frame(real_delta_seconds);
        self.update();
        self.render();
        self.engine.end_frame();
    }

    fn update(&mut self) {
        self.update_cursor_mode();

        let input = &self.engine.input;
        let bindings = &self.engine.bindings;
        let restart = input.was_action_just_pressed(bindings, Action::Restart);
        let toggle_console = input.was_action_just_pressed(bindings, Action::ToggleConsole);
        if restart {
            self.restart_game();
        }
        if toggle_console {
            self.engine.console.toggle_mode();
        }

        if let Some(game) = self.game.as_mut() {
            game.update(&mut self.engine);
        }
    }

    fn update_cursor_mode(&mut self) {
        let attract = self.game.as_ref().is_none_or(Game::is_attract_mode);
        let mode = if self.engine.console.is_open_full() || attract || !self.engine.window.focused {
            CursorMode::Pointer
        } else {
            CursorMode::Fps
        };
        self.engine.input.set_cursor_mode(mode);
    }

    fn render(&mut self) {
        self.engine.renderer.clear_screen(APP_CLEAR_COLOR);
        if let Some(game) = self.game.as_ref() {
            game.render(&mut self.engine);
        }
        let bounds = self.config.screen.bounds();
        self.engine.console.render(&mut self.engine.renderer, bounds);
    }

    /// Key press from the platform. While the console is open it takes
    /// every key except the one that closes it.
    pub fn handle_key_pressed(&mut self, key: KeyCode) {
        let toggle = self.engine.bindings.key(Action::ToggleConsole);
        if self.engine.console.is_open_full() && Some(key) != toggle {
            match key {
                KeyCode::Enter => {
                    self.engine.console.submit(&mut self.engine.events);
                }
                KeyCode::Backspace => self.engine.console.handle_backspace(),
                KeyCode::Escape => self.engine.console.toggle_mode(),
                _ => {}
            }
            return;
        }
        self.engine.input.handle_key_pressed(key);
    }

    pub fn handle_key_released(&mut self, key: KeyCode) {
        self.engine.input.handle_key_released(key);
    }

    /// Typed text, consumed only by an open console.
    pub fn handle_text(&mut self, text: &str) {
        if self.engine.console.is_open_full() {
            self.engine.console.handle_text(text);
        }
    }

    pub fn handle_focus_changed(&mut self, focused: bool) {
        self.engine.window.focused = focused;
        if !focused {
            self.engine.input.release_all();
        }
    }

    /// Window close and similar platform requests.
    pub fn request_quit(&mut self) {
        self.engine.events.fire(QUIT_EVENT, &EventArgs::new());
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting.get()
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<R> {
        &mut self.engine
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use protogame_render::{DrawCommand, RecordingRenderer};

    use super::*;
    use crate::engine::Subsystem;
    use crate::entity::Entity;

    const DT: f64 = 1.0 / 60.0;

    fn app() -> App<RecordingRenderer> {
        let mut app = App::new(RecordingRenderer::new(), GameConfig::default());
        app.startup();
        app
    }

    fn tap(app: &mut App<RecordingRenderer>, key: KeyCode) {
        app.handle_key_pressed(key);
        app.run_frame(DT);
        app.handle_key_released(key);
        app.run_frame(DT);
    }

    #[test]
    fn startup_runs_every_subsystem_then_game() {
        let app = app();
        assert_eq!(app.engine().running(), &Subsystem::STARTUP_ORDER);
        assert!(app.game().is_some());
        assert!(!app.is_quitting());
    }

    #[test]
    fn escape_in_attract_quits() {
        let mut app = app();
        tap(&mut app, KeyCode::Escape);
        assert!(app.is_quitting());
    }

    #[test]
    fn request_quit_sets_flag() {
        let mut app = app();
        app.request_quit();
        assert!(app.is_quitting());
    }

    #[test]
    fn cursor_mode_follows_mode_focus_and_console() {
        let mut app = app();
        app.run_frame(DT);
        assert_eq!(app.engine().input.cursor_mode(), CursorMode::Pointer);

        tap(&mut app, KeyCode::Space);
        app.run_frame(DT);
        assert_eq!(app.engine().input.cursor_mode(), CursorMode::Fps);

        app.handle_focus_changed(false);
        app.run_frame(DT);
        assert_eq!(app.engine().input.cursor_mode(), CursorMode::Pointer);

        app.handle_focus_changed(true);
        tap(&mut app, KeyCode::Tilde);
        app.run_frame(DT);
        assert!(app.engine().console.is_open_full());
        assert_eq!(app.engine().input.cursor_mode(), CursorMode::Pointer);
    }

    #[test]
    fn open_console_swallows_game_keys() {
        let mut app = app();
        tap(&mut app, KeyCode::Tilde);
        assert!(app.engine().console.is_open_full());

        // Space would start the game if it reached input.
        tap(&mut app, KeyCode::Space);
        assert!(app.game().unwrap().is_attract_mode());

        app.handle_text("quit");
        app.handle_key_pressed(KeyCode::Enter);
        assert!(app.is_quitting());
    }

    #[test]
    fn tilde_toggles_console_closed_again() {
        let mut app = app();
        tap(&mut app, KeyCode::Tilde);
        tap(&mut app, KeyCode::Tilde);
        assert!(!app.engine().console.is_open_full());
    }

    #[test]
    fn restart_matches_fresh_start() {
        let fresh = app();
        let mut restarted = app();

        tap(&mut restarted, KeyCode::Space);
        restarted.handle_key_pressed(KeyCode::W);
        for _ in 0..30 {
            restarted.run_frame(DT);
        }
        restarted.handle_key_released(KeyCode::W);
        restarted.restart_game();

        let a = fresh.game().unwrap();
        let b = restarted.game().unwrap();
        assert_eq!(a.is_attract_mode(), b.is_attract_mode());
        assert_eq!(a.player().position(), b.player().position());
        assert_eq!(a.player().orientation(), b.player().orientation());
        assert_eq!(a.player().camera(), b.player().camera());
        let states = |g: &Game| g.entities().iter().map(|e| *e.state()).collect::<Vec<_>>();
        assert_eq!(states(a), states(b));
        assert_eq!(a.sphere().state(), b.sphere().state());
        assert_eq!(a.clock().total_seconds(), b.clock().total_seconds());
        assert_eq!(a.brightness_degrees(), b.brightness_degrees());
        assert_eq!(a.grid_vertices(), b.grid_vertices());
        assert_eq!(
            fresh.engine().debug_render.world_count(),
            restarted.engine().debug_render.world_count()
        );
        assert_eq!(
            fresh.engine().debug_render.screen_count(),
            restarted.engine().debug_render.screen_count()
        );
    }

    #[test]
    fn restart_does_not_repeat_controls_banner() {
        let mut app = app();
        let welcome = |app: &App<RecordingRenderer>| {
            app.engine()
                .console
                .lines()
                .iter()
                .filter(|l| l.text == "Welcome to Protogame3D!")
                .count()
        };
        assert_eq!(welcome(&app), 1);
        tap(&mut app, KeyCode::F8);
        app.restart_game();
        assert_eq!(welcome(&app), 1);
    }

    #[test]
    fn f8_restarts_in_place() {
        let mut app = app();
        tap(&mut app, KeyCode::Space);
        assert!(!app.game().unwrap().is_attract_mode());
        tap(&mut app, KeyCode::F8);
        assert!(app.game().unwrap().is_attract_mode());
    }

    #[test]
    fn frame_clears_gray_before_game_render() {
        let mut app = app();
        app.run_frame(DT);
        assert_eq!(
            app.engine().renderer.commands()[0],
            DrawCommand::ClearScreen(Rgba8::opaque(150, 150, 150))
        );
    }

    #[test]
    fn open_console_renders_after_game() {
        let mut app = app();
        tap(&mut app, KeyCode::Tilde);
        app.run_frame(DT);
        let texts: Vec<_> = app.engine().renderer.texts().map(|t| t.text.clone()).collect();
        assert_eq!(texts[0], "> _");
        // Newest console line sits right above the prompt.
        assert!(texts[1].starts_with("-----"));
    }

    #[test]
    fn shutdown_stops_everything() {
        let mut app = app();
        app.shutdown();
        assert!(app.game().is_none());
        assert!(app.engine().running().is_empty());
    }
}
