use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use glam::{UVec2, Vec2};
use protogame_game::{App, GameConfig};
use protogame_input::{CursorMode, KeyCode};
use protogame_render_wgpu::WgpuRenderer;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "protogame-desktop", about = "Protogame3D in a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn map_key(key: WinitKey) -> Option<KeyCode> {
    let code = match key {
        WinitKey::KeyA => KeyCode::A,
        WinitKey::KeyB => KeyCode::B,
        WinitKey::KeyC => KeyCode::C,
        WinitKey::KeyD => KeyCode::D,
        WinitKey::KeyE => KeyCode::E,
        WinitKey::KeyF => KeyCode::F,
        WinitKey::KeyG => KeyCode::G,
        WinitKey::KeyH => KeyCode::H,
        WinitKey::KeyI => KeyCode::I,
        WinitKey::KeyJ => KeyCode::J,
        WinitKey::KeyK => KeyCode::K,
        WinitKey::KeyL => KeyCode::L,
        WinitKey::KeyM => KeyCode::M,
        WinitKey::KeyN => KeyCode::N,
        WinitKey::KeyO => KeyCode::O,
        WinitKey::KeyP => KeyCode::P,
        WinitKey::KeyQ => KeyCode::Q,
        WinitKey::KeyR => KeyCode::R,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyT => KeyCode::T,
        WinitKey::KeyU => KeyCode::U,
        WinitKey::KeyV => KeyCode::V,
        WinitKey::KeyW => KeyCode::W,
        WinitKey::KeyX => KeyCode::X,
        WinitKey::KeyY => KeyCode::Y,
        WinitKey::KeyZ => KeyCode::Z,
        WinitKey::Digit0 => KeyCode::Digit0,
        WinitKey::Digit1 => KeyCode::Digit1,
        WinitKey::Digit2 => KeyCode::Digit2,
        WinitKey::Digit3 => KeyCode::Digit3,
        WinitKey::Digit4 => KeyCode::Digit4,
        WinitKey::Digit5 => KeyCode::Digit5,
        WinitKey::Digit6 => KeyCode::Digit6,
        WinitKey::Digit7 => KeyCode::Digit7,
        WinitKey::Digit8 => KeyCode::Digit8,
        WinitKey::Digit9 => KeyCode::Digit9,
        WinitKey::Space => KeyCode::Space,
        WinitKey::Escape => KeyCode::Escape,
        WinitKey::Enter | WinitKey::NumpadEnter => KeyCode::Enter,
        WinitKey::Backspace => KeyCode::Backspace,
        WinitKey::Tab => KeyCode::Tab,
        WinitKey::ShiftLeft | WinitKey::ShiftRight => KeyCode::Shift,
        WinitKey::ControlLeft | WinitKey::ControlRight => KeyCode::Control,
        WinitKey::Backquote => KeyCode::Tilde,
        WinitKey::ArrowUp => KeyCode::Up,
        WinitKey::ArrowDown => KeyCode::Down,
        WinitKey::ArrowLeft => KeyCode::Left,
        WinitKey::ArrowRight => KeyCode::Right,
        WinitKey::F1 => KeyCode::F1,
        WinitKey::F2 => KeyCode::F2,
        WinitKey::F3 => KeyCode::F3,
        WinitKey::F4 => KeyCode::F4,
        WinitKey::F5 => KeyCode::F5,
        WinitKey::F6 => KeyCode::F6,
        WinitKey::F7 => KeyCode::F7,
        WinitKey::F8 => KeyCode::F8,
        WinitKey::F9 => KeyCode::F9,
        WinitKey::F10 => KeyCode::F10,
        WinitKey::F11 => KeyCode::F11,
        WinitKey::F12 => KeyCode::F12,
        _ => return None,
    };
    Some(code)
}

fn map_mouse_button(button: MouseButton) -> Option<KeyCode> {
    match button {
        MouseButton::Left => Some(KeyCode::LeftMouse),
        MouseButton::Right => Some(KeyCode::RightMouse),
        _ => None,
    }
}

/// Window, GPU backend and game, created once the event loop resumes.
///
/// No gamepad backend is wired in; controllers stay disconnected and the
/// game falls back to keyboard and mouse.
struct DesktopApp {
    config: GameConfig,
    window: Option<Arc<Window>>,
    app: Option<App<WgpuRenderer>>,
    last_frame: Instant,
    applied_cursor: Option<CursorMode>,
}

impl DesktopApp {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            window: None,
            app: None,
            last_frame: Instant::now(),
            applied_cursor: None,
        }
    }

    /// Mirror the game's cursor mode onto the OS cursor when it changes.
    fn sync_cursor(&mut self) {
        let (Some(window), Some(app)) = (&self.window, &self.app) else {
            return;
        };
        let mode = app.engine().input.cursor_mode();
        if self.applied_cursor == Some(mode) {
            return;
        }
        match mode {
            CursorMode::Fps => {
                let grabbed = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(e) = grabbed {
                    tracing::warn!("cursor grab failed: {e}");
                }
                window.set_cursor_visible(false);
            }
            CursorMode::Pointer => {
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                    tracing::warn!("cursor release failed: {e}");
                }
                window.set_cursor_visible(true);
            }
        }
        tracing::debug!(?mode, "cursor mode applied");
        self.applied_cursor = Some(mode);
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut app) = self.app.take() {
            app.shutdown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let size = self.config.window_size();
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(f64::from(size.x), f64::from(size.y)));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let renderer = match WgpuRenderer::new(window.clone(), size.width, size.height) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut app = App::new(renderer, self.config.clone());
        app.engine_mut().window.client_size = UVec2::new(size.width, size.height);
        app.startup();

        self.window = Some(window);
        self.app = Some(app);
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = self.app.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                app.request_quit();
            }
            WindowEvent::Resized(new_size) => {
                app.engine_mut().renderer.resize(new_size.width, new_size.height);
                app.engine_mut().window.client_size = UVec2::new(new_size.width, new_size.height);
            }
            WindowEvent::Focused(focused) => {
                app.handle_focus_changed(focused);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        text,
                        repeat,
                        ..
                    },
                ..
            } => {
                let key = match physical_key {
                    PhysicalKey::Code(code) => map_key(code),
                    PhysicalKey::Unidentified(_) => None,
                };
                match state {
                    ElementState::Pressed => {
                        if let Some(key) = key.filter(|_| !repeat) {
                            app.handle_key_pressed(key);
                        }
                        if let Some(text) = text {
                            app.handle_text(&text);
                        }
                    }
                    ElementState::Released => {
                        if let Some(key) = key {
                            app.handle_key_released(key);
                        }
                    }
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(key) = map_mouse_button(button) {
                    match state {
                        ElementState::Pressed => app.handle_key_pressed(key),
                        ElementState::Released => app.handle_key_released(key),
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f64();
                self.last_frame = now;

                app.run_frame(dt);
                if app.is_quitting() {
                    tracing::info!("quit requested, closing window");
                    self.exit(event_loop);
                    return;
                }
                self.sync_cursor();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }

        if self.app.as_ref().is_some_and(App::is_quitting) {
            self.exit(event_loop);
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            if app.engine().input.cursor_mode() == CursorMode::Fps {
                app.engine_mut()
                    .input
                    .add_cursor_motion(Vec2::new(delta.0 as f32, delta.1 as f32));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = GameConfig::load_or_default(cli.config.as_deref())?;
    tracing::info!(title = %config.window.title, "protogame-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
