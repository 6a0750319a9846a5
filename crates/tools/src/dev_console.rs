use glam::{Vec2, Vec3};
use protogame_common::{Aabb2, Rgba8, Vertex};
use protogame_kernel::{EngineSubsystem, EventArgs, EventSystem};
use protogame_render::vertex_utils::add_verts_for_aabb2d;
use protogame_render::{BlendMode, Camera, DepthMode, RasterizerMode, Renderer, TextDraw};

/// Event that lists every registered command instead of firing.
pub const HELP_COMMAND: &str = "help";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DevConsoleMode {
    #[default]
    Hidden,
    OpenFull,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DevConsoleLine {
    pub color: Rgba8,
    pub text: String,
}

/// Scrolling text log with a one-line command prompt.
///
/// Submitted commands are parsed as `name key=value ...` and fired on the
/// event bus under `name`.
#[derive(Debug)]
pub struct DevConsole {
    lines: Vec<DevConsoleLine>,
    mode: DevConsoleMode,
    input: String,
    lines_on_screen: usize,
}

impl Default for DevConsole {
    fn default() -> Self {
        Self::new(40)
    }
}

impl DevConsole {
    pub const ERROR: Rgba8 = Rgba8::RED;
    pub const WARNING: Rgba8 = Rgba8::YELLOW;
    pub const INFO_MAJOR: Rgba8 = Rgba8::CYAN;
    pub const INFO_MINOR: Rgba8 = Rgba8::LIGHT_YELLOW;
    pub const INPUT_ECHO: Rgba8 = Rgba8::WHITE;

    pub fn new(lines_on_screen: usize) -> Self {
        Self {
            lines: Vec::new(),
            mode: DevConsoleMode::Hidden,
            input: String::new(),
            lines_on_screen: lines_on_screen.max(2),
        }
    }

    pub fn add_line(&mut self, color: Rgba8, text: impl Into<String>) {
        self.lines.push(DevConsoleLine {
            color,
            text: text.into(),
        });
    }

    pub fn lines(&self) -> &[DevConsoleLine] {
        &self.lines
    }

    pub fn mode(&self) -> DevConsoleMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DevConsoleMode) {
        if self.mode != mode {
            tracing::debug!(?mode, "console mode changed");
            self.mode = mode;
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(match self.mode {
            DevConsoleMode::Hidden => DevConsoleMode::OpenFull,
            DevConsoleMode::OpenFull => DevConsoleMode::Hidden,
        });
    }

    pub fn is_open_full(&self) -> bool {
        self.mode == DevConsoleMode::OpenFull
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Append typed text to the prompt. Control characters are dropped.
    pub fn handle_text(&mut self, text: &str) {
        self.input
            .extend(text.chars().filter(|c| !c.is_control() && *c != '`' && *c != '~'));
    }

    pub fn handle_backspace(&mut self) {
        self.input.pop();
    }

    /// Run and clear the current prompt.
    pub fn submit(&mut self, events: &mut EventSystem) -> bool {
        let line = std::mem::take(&mut self.input);
        if line.trim().is_empty() {
            return false;
        }
        self.add_line(Self::INPUT_ECHO, format!("> {line}"));
        self.execute(&line, events)
    }

    /// Fire `name key=value ...` as an event. Returns whether a subscriber
    /// consumed it.
    pub fn execute(&mut self, command_line: &str, events: &mut EventSystem) -> bool {
        let mut parts = command_line.split_whitespace();
        let Some(name) = parts.next() else {
            return false;
        };

        if name.eq_ignore_ascii_case(HELP_COMMAND) {
            self.add_line(Self::INFO_MAJOR, "Registered commands:");
            for event in events.registered_event_names() {
                self.add_line(Self::INFO_MINOR, format!("  {event}"));
            }
            return true;
        }

        let mut args = EventArgs::new();
        for part in parts {
            match part.split_once('=') {
                Some((key, value)) => args.set(key, value.trim_matches('"')),
                None => {
                    self.add_line(Self::WARNING, format!("Ignoring argument without '=': {part}"));
                }
            }
        }

        if !events.has_subscribers(name) {
            self.add_line(Self::ERROR, format!("Unknown command: {name}"));
            return false;
        }
        tracing::debug!(command = name, "console command");
        events.fire(name, &args)
    }

    /// Draw the log and prompt filling `bounds`. Hidden consoles draw
    /// nothing.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R, bounds: Aabb2) {
        if !self.is_open_full() {
            return;
        }

        let mut camera = Camera::new();
        camera.set_ortho_view(bounds.mins, bounds.maxs);
        renderer.begin_camera(&camera);

        renderer.set_blend_mode(BlendMode::Alpha);
        renderer.set_rasterizer_mode(RasterizerMode::SolidCullNone);
        renderer.set_depth_mode(DepthMode::Disabled);
        renderer.bind_texture(None);
        renderer.reset_model_constants();

        let mut verts: Vec<Vertex> = Vec::with_capacity(6);
        add_verts_for_aabb2d(
            &mut verts,
            bounds,
            Rgba8::new(0, 0, 0, 180),
            Aabb2::ZERO_TO_ONE,
        );
        renderer.draw_vertex_array(&verts);

        let line_height = bounds.dimensions().y / self.lines_on_screen as f32;
        let left = bounds.mins.x + line_height * 0.25;
        let prompt = format!("> {}_", self.input);
        renderer.draw_text(&TextDraw {
            text: prompt,
            position: Vec3::new(left, bounds.mins.y, 0.0),
            height: line_height,
            alignment: Vec2::ZERO,
            color: Self::INPUT_ECHO,
        });

        // Newest lines sit directly above the prompt.
        for (row, line) in self
            .lines
            .iter()
            .rev()
            .take(self.lines_on_screen - 1)
            .enumerate()
        {
            renderer.draw_text(&TextDraw {
                text: line.text.clone(),
                position: Vec3::new(left, bounds.mins.y + line_height * (row + 1) as f32, 0.0),
                height: line_height,
                alignment: Vec2::ZERO,
                color: line.color,
            });
        }

        renderer.end_camera(&camera);
    }
}

impl EngineSubsystem for DevConsole {
    fn name(&self) -> &'static str {
        "dev-console"
    }

    fn startup(&mut self) {
        self.add_line(Self::INFO_MINOR, "Dev console ready. Type 'help' for commands.");
    }

    fn shutdown(&mut self) {
        self.lines.clear();
        self.input.clear();
        self.mode = DevConsoleMode::Hidden;
    }
}
