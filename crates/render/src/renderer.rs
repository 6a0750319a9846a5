use std::collections::BTreeMap;
use std::fmt::Write as _;

use glam::{Mat4, Vec2, Vec3};
use protogame_common::{Rgba8, Vertex};
use protogame_kernel::EngineSubsystem;

use crate::Camera;

/// Opaque id of a texture in the renderer's cache. Borrowed, never owned,
/// by game objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    Opaque,
    Alpha,
    Additive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RasterizerMode {
    #[default]
    SolidCullBack,
    SolidCullNone,
    WireframeCullNone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DepthMode {
    Disabled,
    ReadOnlyAlways,
    ReadOnlyLessEqual,
    #[default]
    ReadWriteLessEqual,
}

/// A line of text anchored in the active camera's space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub text: String,
    /// Anchor point, in the coordinate space of the active camera.
    pub position: Vec3,
    /// Glyph cell height in the same units as `position`.
    pub height: f32,
    /// Pivot within the text block: (0,0) bottom-left, (1,1) top-right.
    pub alignment: Vec2,
    pub color: Rgba8,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// Draw calls are immediate-mode: state set through the `set_*` methods and
/// `bind_texture` applies to every following `draw_vertex_array` until
/// changed.
pub trait Renderer: EngineSubsystem {
    fn clear_screen(&mut self, color: Rgba8);

    fn begin_camera(&mut self, camera: &Camera);

    fn end_camera(&mut self, camera: &Camera);

    /// Look up a texture by path, registering it on first use.
    fn create_or_get_texture(&mut self, path: &str) -> TextureHandle;

    fn bind_texture(&mut self, texture: Option<TextureHandle>);

    fn set_blend_mode(&mut self, mode: BlendMode);

    fn set_rasterizer_mode(&mut self, mode: RasterizerMode);

    fn set_depth_mode(&mut self, mode: DepthMode);

    /// Per-object transform and tint applied to following draws.
    fn set_model_constants(&mut self, model_to_world: Mat4, tint: Rgba8);

    fn draw_vertex_array(&mut self, vertexes: &[Vertex]);

    fn draw_text(&mut self, text: &TextDraw);

    fn reset_model_constants(&mut self) {
        self.set_model_constants(Mat4::IDENTITY, Rgba8::WHITE);
    }
}

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearScreen(Rgba8),
    BeginCamera(Camera),
    EndCamera,
    BindTexture(Option<TextureHandle>),
    SetBlendMode(BlendMode),
    SetRasterizerMode(RasterizerMode),
    SetDepthMode(DepthMode),
    SetModelConstants { model_to_world: Mat4, tint: Rgba8 },
    DrawVertexArray(Vec<Vertex>),
    DrawText(TextDraw),
}

/// Renderer that records every call made during the current frame.
///
/// Used by tests and the headless CLI. Commands are cleared in
/// `begin_frame`, so after a frame they describe exactly that frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
    textures: BTreeMap<String, TextureHandle>,
    frames_rendered: u64,
    camera_depth: u32,
    started: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Vertex count of every `draw_vertex_array` call, in order.
    pub fn draw_call_sizes(&self) -> Vec<usize> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawVertexArray(v) => Some(v.len()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextDraw> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::DrawText(t) => Some(t),
            _ => None,
        })
    }

    pub fn cameras(&self) -> impl Iterator<Item = &Camera> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::BeginCamera(cam) => Some(cam),
            _ => None,
        })
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Human-readable digest of the recorded frame.
    pub fn summary(&self) -> String {
        let draws = self.draw_call_sizes();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({} commands) ===",
            self.frames_rendered,
            self.commands.len()
        );
        let _ = writeln!(
            out,
            "Draw calls: {} ({} vertices)",
            draws.len(),
            draws.iter().sum::<usize>()
        );
        for cam in self.cameras() {
            match cam.perspective() {
                Some(p) => {
                    let pos = cam.position();
                    let o = cam.orientation();
                    let _ = writeln!(
                        out,
                        "Camera: perspective fov={:.0} aspect={:.1} pos=({:.2}, {:.2}, {:.2}) ypr=({:.1}, {:.1}, {:.1})",
                        p.fov_degrees,
                        p.aspect,
                        pos.x,
                        pos.y,
                        pos.z,
                        o.yaw_degrees,
                        o.pitch_degrees,
                        o.roll_degrees
                    );
                }
                None => {
                    if let Some(b) = cam.ortho_bounds() {
                        let _ = writeln!(
                            out,
                            "Camera: ortho ({:.0}, {:.0})-({:.0}, {:.0})",
                            b.mins.x, b.mins.y, b.maxs.x, b.maxs.y
                        );
                    }
                }
            }
        }
        for text in self.texts() {
            let _ = writeln!(out, "  text: {}", text.text);
        }
        out
    }
}

impl EngineSubsystem for RecordingRenderer {
    fn name(&self) -> &'static str {
        "renderer"
    }

    fn startup(&mut self) {
        self.started = true;
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
        self.camera_depth = 0;
    }

    fn end_frame(&mut self) {
        if self.camera_depth != 0 {
            tracing::warn!(open = self.camera_depth, "frame ended inside a camera pass");
        }
        self.frames_rendered += 1;
    }

    fn shutdown(&mut self) {
        self.started = false;
        self.textures.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn clear_screen(&mut self, color: Rgba8) {
        self.commands.push(DrawCommand::ClearScreen(color));
    }

    fn begin_camera(&mut self, camera: &Camera) {
        self.camera_depth += 1;
        self.commands.push(DrawCommand::BeginCamera(*camera));
    }

    fn end_camera(&mut self, _camera: &Camera) {
        self.camera_depth = self.camera_depth.saturating_sub(1);
        self.commands.push(DrawCommand::EndCamera);
    }

    fn create_or_get_texture(&mut self, path: &str) -> TextureHandle {
        let next = TextureHandle(self.textures.len() as u32);
        *self.textures.entry(path.to_string()).or_insert(next)
    }

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        self.commands.push(DrawCommand::BindTexture(texture));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::SetBlendMode(mode));
    }

    fn set_rasterizer_mode(&mut self, mode: RasterizerMode) {
        self.commands.push(DrawCommand::SetRasterizerMode(mode));
    }

    fn set_depth_mode(&mut self, mode: DepthMode) {
        self.commands.push(DrawCommand::SetDepthMode(mode));
    }

    fn set_model_constants(&mut self, model_to_world: Mat4, tint: Rgba8) {
        self.commands
            .push(DrawCommand::SetModelConstants { model_to_world, tint });
    }

    fn draw_vertex_array(&mut self, vertexes: &[Vertex]) {
        self.commands
            .push(DrawCommand::DrawVertexArray(vertexes.to_vec()));
    }

    fn draw_text(&mut self, text: &TextDraw) {
        self.commands.push(DrawCommand::DrawText(text.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut r = RecordingRenderer::new();
        let cam = Camera::default();
        r.begin_frame();
        r.begin_camera(&cam);
        r.clear_screen(Rgba8::BLACK);
        r.draw_vertex_array(&[Vertex::new(Vec3::ZERO, Rgba8::WHITE, Vec2::ZERO); 3]);
        r.end_camera(&cam);
        r.end_frame();

        assert_eq!(r.commands().len(), 4);
        assert_eq!(r.commands()[1], DrawCommand::ClearScreen(Rgba8::BLACK));
        assert_eq!(r.draw_call_sizes(), vec![3]);
        assert_eq!(r.frames_rendered(), 1);
    }

    #[test]
    fn begin_frame_clears_previous_commands() {
        let mut r = RecordingRenderer::new();
        r.clear_screen(Rgba8::WHITE);
        r.begin_frame();
        assert!(r.commands().is_empty());
    }

    #[test]
    fn textures_are_cached_by_path() {
        let mut r = RecordingRenderer::new();
        let a = r.create_or_get_texture("Data/Images/TestUV.png");
        let b = r.create_or_get_texture("Data/Images/TestUV.png");
        let c = r.create_or_get_texture("Data/Images/Other.png");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(r.texture_count(), 2);
    }

    #[test]
    fn reset_model_constants_is_identity_white() {
        let mut r = RecordingRenderer::new();
        r.reset_model_constants();
        assert_eq!(
            r.commands()[0],
            DrawCommand::SetModelConstants {
                model_to_world: Mat4::IDENTITY,
                tint: Rgba8::WHITE
            }
        );
    }

    #[test]
    fn summary_mentions_cameras_and_text() {
        let mut r = RecordingRenderer::new();
        let mut cam = Camera::new();
        cam.set_perspective_view(2.0, 60.0, 0.1, 100.0);
        r.begin_camera(&cam);
        r.draw_text(&TextDraw {
            text: "hello".into(),
            position: Vec3::ZERO,
            height: 1.0,
            alignment: Vec2::ZERO,
            color: Rgba8::WHITE,
        });
        r.end_camera(&cam);
        let s = r.summary();
        assert!(s.contains("perspective fov=60"));
        assert!(s.contains("text: hello"));
    }

    #[test]
    fn lifecycle_flags() {
        let mut r = RecordingRenderer::new();
        r.startup();
        assert!(r.is_started());
        r.shutdown();
        assert!(!r.is_started());
    }
}
