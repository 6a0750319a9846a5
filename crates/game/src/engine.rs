use glam::UVec2;
use protogame_input::{InputSystem, KeyBindings};
use protogame_kernel::{Clock, EngineSubsystem, EventSystem};
use protogame_render::Renderer;
use protogame_tools::{DebugRenderSystem, DevConsole};

use crate::config::GameConfig;

/// Platform window facts the game reads each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    pub title: String,
    pub focused: bool,
    pub client_size: UVec2,
}

impl WindowState {
    pub fn new(title: impl Into<String>, client_size: UVec2) -> Self {
        Self {
            title: title.into(),
            focused: true,
            client_size,
        }
    }
}

impl EngineSubsystem for WindowState {
    fn name(&self) -> &'static str {
        "window"
    }

    fn startup(&mut self) {
        tracing::debug!(title = %self.title, size = ?self.client_size, "window state ready");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    EventSystem,
    Input,
    Window,
    Renderer,
    DevConsole,
    DebugRender,
}

impl Subsystem {
    /// Start-up order. Shutdown runs in reverse.
    pub const STARTUP_ORDER: [Subsystem; 6] = [
        Subsystem::EventSystem,
        Subsystem::Input,
        Subsystem::Window,
        Subsystem::Renderer,
        Subsystem::DevConsole,
        Subsystem::DebugRender,
    ];
}

/// Every engine service the game talks to, owned in one place.
///
/// Fields are public so callers can borrow disjoint subsystems at once,
/// e.g. the renderer mutably while reading the debug-render lists.
#[derive(Debug)]
pub struct Engine<R: Renderer> {
    pub events: EventSystem,
    pub input: InputSystem,
    pub bindings: KeyBindings,
    pub window: WindowState,
    pub renderer: R,
    pub console: DevConsole,
    pub debug_render: DebugRenderSystem,
    /// Real time, clamped per frame. The game clock derives from it.
    pub system_clock: Clock,
    running: Vec<Subsystem>,
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, config: &GameConfig) -> Self {
        let size = UVec2::new(config.screen.width as u32, config.screen.height as u32);
        Self {
            events: EventSystem::new(),
            input: InputSystem::new(),
            bindings: KeyBindings::default(),
            window: WindowState::new(config.window.title.clone(), size),
            renderer,
            console: DevConsole::default(),
            debug_render: DebugRenderSystem::new(),
            system_clock: Clock::with_max_delta(config.clock.max_delta_seconds),
            running: Vec::new(),
        }
    }

    fn subsystem_mut(&mut self, which: Subsystem) -> &mut dyn EngineSubsystem {
        match which {
            Subsystem::EventSystem => &mut self.events,
            Subsystem::Input => &mut self.input,
            Subsystem::Window => &mut self.window,
            Subsystem::Renderer => &mut self.renderer,
            Subsystem::DevConsole => &mut self.console,
            Subsystem::DebugRender => &mut self.debug_render,
        }
    }

    /// Subsystems currently running, in start-up order.
    pub fn running(&self) -> &[Subsystem] {
        &self.running
    }

    pub fn startup(&mut self) {
        for which in Subsystem::STARTUP_ORDER {
            if self.running.contains(&which) {
                continue;
            }
            let sub = self.subsystem_mut(which);
            sub.startup();
            tracing::info!(subsystem = sub.name(), "started");
            self.running.push(which);
        }
    }

    /// Shut down every running subsystem in reverse start-up order and
    /// return that order.
    pub fn shutdown(&mut self) -> Vec<Subsystem> {
        let mut order = Vec::with_capacity(self.running.len());
        while let Some(which) = self.running.pop() {
            let sub = self.subsystem_mut(which);
            sub.shutdown();
            tracing::info!(subsystem = sub.name(), "shut down");
            order.push(which);
        }
        order
    }

    /// Tick real time, then open the frame on every subsystem.
    pub fn begin_frame(&mut self, real_delta_seconds: f64) {
        self.system_clock.advance(real_delta_seconds);
        self.debug_render
            .advance_clock(self.system_clock.delta_seconds());
        for i in 0..self.running.len() {
            let which = self.running[i];
            self.subsystem_mut(which).begin_frame();
        }
    }

    pub fn end_frame(&mut self) {
        for i in 0..self.running.len() {
            let which = self.running[i];
            self.subsystem_mut(which).end_frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use protogame_render::RecordingRenderer;

    use super::*;

    fn engine() -> Engine<RecordingRenderer> {
        Engine::new(RecordingRenderer::new(), &GameConfig::default())
    }

    #[test]
    fn starts_in_fixed_order_and_stops_in_reverse() {
        let mut e = engine();
        e.startup();
        assert_eq!(e.running(), &Subsystem::STARTUP_ORDER);
        assert!(e.renderer.is_started());

        let order = e.shutdown();
        let mut expected = Subsystem::STARTUP_ORDER.to_vec();
        expected.reverse();
        assert_eq!(order, expected);
        assert!(e.running().is_empty());
        assert!(!e.renderer.is_started());
    }

    #[test]
    fn startup_is_idempotent() {
        let mut e = engine();
        e.startup();
        e.startup();
        assert_eq!(e.running().len(), 6);
    }

    #[test]
    fn begin_frame_clamps_real_time() {
        let mut e = engine();
        e.startup();
        e.begin_frame(2.0);
        assert_eq!(e.system_clock.delta_seconds(), 0.1);
        assert_eq!(e.debug_render.now(), 0.1);
        e.end_frame();
    }

    #[test]
    fn window_defaults_from_config() {
        let e = engine();
        assert_eq!(e.window.title, "Protogame3D");
        assert_eq!(e.window.client_size, UVec2::new(1600, 800));
        assert!(e.window.focused);
    }
}
