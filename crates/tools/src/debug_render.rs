use glam::{Mat4, Vec2, Vec3};
use protogame_common::{Aabb2, Rgba8, Vertex};
use protogame_kernel::{Clock, EngineSubsystem};
use protogame_render::vertex_utils::{
    add_verts_for_arrow3d, add_verts_for_cylinder3d, add_verts_for_sphere3d,
};
use protogame_render::{BlendMode, Camera, DepthMode, RasterizerMode, Renderer, TextDraw};

/// Lifetime that never expires.
pub const FOREVER: f64 = -1.0;

const SLICES: u32 = 16;
const SPHERE_STACKS: u32 = 8;
const MESSAGE_HEIGHT: f32 = 15.0;

/// How a world primitive interacts with the depth buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebugRenderMode {
    /// Drawn on top of everything.
    Always,
    #[default]
    UseDepth,
    /// Depth-tested, plus a faded pass that shows through occluders.
    XRay,
}

#[derive(Debug, Clone, PartialEq)]
enum WorldShape {
    Mesh { verts: Vec<Vertex>, wireframe: bool },
    Text { text: String, transform: Mat4, height: f32, alignment: Vec2 },
    BillboardText { text: String, origin: Vec3, height: f32, alignment: Vec2 },
}

#[derive(Debug, Clone, PartialEq)]
enum ScreenShape {
    Text { text: String, position: Vec2, height: f32, alignment: Vec2 },
    Message { text: String },
}

/// Lifetime and color ramp shared by every primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Lifetime {
    duration: f64,
    born: f64,
    start_color: Rgba8,
    end_color: Rgba8,
}

impl Lifetime {
    fn color_at(&self, now: f64) -> Rgba8 {
        if self.duration <= 0.0 {
            return self.start_color;
        }
        let t = ((now - self.born) / self.duration).clamp(0.0, 1.0) as f32;
        self.start_color.lerp(self.end_color, t)
    }

    /// Zero-duration primitives live for the frame they were added in.
    fn is_expired(&self, now: f64) -> bool {
        if self.duration < 0.0 {
            false
        } else if self.duration == 0.0 {
            true
        } else {
            now - self.born >= self.duration
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct WorldEntry {
    shape: WorldShape,
    life: Lifetime,
    mode: DebugRenderMode,
}

#[derive(Debug, Clone, PartialEq)]
struct ScreenEntry {
    shape: ScreenShape,
    life: Lifetime,
}

/// Timed debug primitives drawn over the world and the screen.
///
/// Durations are in seconds of the debug clock: negative lives forever,
/// zero lives one frame. Colors blend from start to end over the lifetime.
#[derive(Debug, Default)]
pub struct DebugRenderSystem {
    world: Vec<WorldEntry>,
    screen: Vec<ScreenEntry>,
    clock: Clock,
    hidden: bool,
}

impl DebugRenderSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the debug clock by one frame of real time.
    pub fn advance_clock(&mut self, real_delta_seconds: f64) {
        self.clock.advance(real_delta_seconds);
    }

    pub fn now(&self) -> f64 {
        self.clock.total_seconds()
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    pub fn toggle_visible(&mut self) {
        self.hidden = !self.hidden;
        tracing::debug!(visible = !self.hidden, "debug render visibility");
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.screen.clear();
    }

    pub fn world_count(&self) -> usize {
        self.world.len()
    }

    pub fn screen_count(&self) -> usize {
        self.screen.len()
    }

    fn life(&self, duration: f64, start_color: Rgba8, end_color: Rgba8) -> Lifetime {
        Lifetime {
            duration,
            born: self.now(),
            start_color,
            end_color,
        }
    }

    fn push_mesh(
        &mut self,
        verts: Vec<Vertex>,
        wireframe: bool,
        life: Lifetime,
        mode: DebugRenderMode,
    ) {
        self.world.push(WorldEntry {
            shape: WorldShape::Mesh { verts, wireframe },
            life,
            mode,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_world_line(
        &mut self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
        mode: DebugRenderMode,
    ) {
        let mut verts = Vec::new();
        add_verts_for_cylinder3d(&mut verts, start, end, radius, Rgba8::WHITE, SLICES);
        let life = self.life(duration, start_color, end_color);
        self.push_mesh(verts, false, life, mode);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_world_arrow(
        &mut self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
        mode: DebugRenderMode,
    ) {
        let mut verts = Vec::new();
        add_verts_for_arrow3d(&mut verts, start, end, radius, Rgba8::WHITE, SLICES);
        let life = self.life(duration, start_color, end_color);
        self.push_mesh(verts, false, life, mode);
    }

    pub fn add_world_point(
        &mut self,
        position: Vec3,
        radius: f32,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
        mode: DebugRenderMode,
    ) {
        let mut verts = Vec::new();
        add_verts_for_sphere3d(
            &mut verts,
            position,
            radius,
            Rgba8::WHITE,
            Aabb2::ZERO_TO_ONE,
            SLICES,
            SPHERE_STACKS,
        );
        let life = self.life(duration, start_color, end_color);
        self.push_mesh(verts, false, life, mode);
    }

    pub fn add_world_wire_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
        mode: DebugRenderMode,
    ) {
        let mut verts = Vec::new();
        add_verts_for_sphere3d(
            &mut verts,
            center,
            radius,
            Rgba8::WHITE,
            Aabb2::ZERO_TO_ONE,
            SLICES,
            SPHERE_STACKS,
        );
        let life = self.life(duration, start_color, end_color);
        self.push_mesh(verts, true, life, mode);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_world_wire_cylinder(
        &mut self,
        base: Vec3,
        top: Vec3,
        radius: f32,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
        mode: DebugRenderMode,
    ) {
        let mut verts = Vec::new();
        add_verts_for_cylinder3d(&mut verts, base, top, radius, Rgba8::WHITE, SLICES);
        let life = self.life(duration, start_color, end_color);
        self.push_mesh(verts, true, life, mode);
    }

    /// Unit arrows along the transform's I (red), J (green) and K (blue).
    pub fn add_world_basis(&mut self, transform: Mat4, duration: f64, mode: DebugRenderMode) {
        let origin = transform.w_axis.truncate();
        let mut verts = Vec::new();
        for (axis, color) in [
            (transform.x_axis.truncate(), Rgba8::RED),
            (transform.y_axis.truncate(), Rgba8::GREEN),
            (transform.z_axis.truncate(), Rgba8::BLUE),
        ] {
            add_verts_for_arrow3d(&mut verts, origin, origin + axis, 0.05, color, SLICES);
        }
        let life = self.life(duration, Rgba8::WHITE, Rgba8::WHITE);
        self.push_mesh(verts, false, life, mode);
    }

    /// Text anchored at the transform's translation.
    #[allow(clippy::too_many_arguments)]
    pub fn add_world_text(
        &mut self,
        text: impl Into<String>,
        transform: Mat4,
        height: f32,
        alignment: Vec2,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
        mode: DebugRenderMode,
    ) {
        let life = self.life(duration, start_color, end_color);
        self.world.push(WorldEntry {
            shape: WorldShape::Text {
                text: text.into(),
                transform,
                height,
                alignment,
            },
            life,
            mode,
        });
    }

    /// Text that always faces the camera.
    #[allow(clippy::too_many_arguments)]
    pub fn add_world_billboard_text(
        &mut self,
        text: impl Into<String>,
        origin: Vec3,
        height: f32,
        alignment: Vec2,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
        mode: DebugRenderMode,
    ) {
        let life = self.life(duration, start_color, end_color);
        self.world.push(WorldEntry {
            shape: WorldShape::BillboardText {
                text: text.into(),
                origin,
                height,
                alignment,
            },
            life,
            mode,
        });
    }

    /// Text placed at `alignment` within `bounds`, pivoting on the same
    /// alignment.
    #[allow(clippy::too_many_arguments)]
    pub fn add_screen_text(
        &mut self,
        text: impl Into<String>,
        bounds: Aabb2,
        height: f32,
        alignment: Vec2,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
    ) {
        let life = self.life(duration, start_color, end_color);
        self.screen.push(ScreenEntry {
            shape: ScreenShape::Text {
                text: text.into(),
                position: bounds.point_at_uv(alignment),
                height,
                alignment,
            },
            life,
        });
    }

    /// Message stacked below the top-left corner of the screen.
    pub fn add_message(
        &mut self,
        text: impl Into<String>,
        duration: f64,
        start_color: Rgba8,
        end_color: Rgba8,
    ) {
        let life = self.life(duration, start_color, end_color);
        self.screen.push(ScreenEntry {
            shape: ScreenShape::Message { text: text.into() },
            life,
        });
    }

    pub fn render_world<R: Renderer + ?Sized>(&self, renderer: &mut R, camera: &Camera) {
        if self.hidden {
            return;
        }
        let now = self.now();
        renderer.begin_camera(camera);
        renderer.bind_texture(None);
        for entry in &self.world {
            let color = entry.life.color_at(now);
            match &entry.shape {
                WorldShape::Mesh { verts, wireframe } => {
                    let raster = if *wireframe {
                        RasterizerMode::WireframeCullNone
                    } else {
                        RasterizerMode::SolidCullBack
                    };
                    renderer.set_rasterizer_mode(raster);
                    if entry.mode == DebugRenderMode::XRay {
                        let faded = Rgba8::new(color.r, color.g, color.b, color.a / 3);
                        renderer.set_blend_mode(BlendMode::Alpha);
                        renderer.set_depth_mode(DepthMode::ReadOnlyAlways);
                        renderer.set_model_constants(Mat4::IDENTITY, faded);
                        renderer.draw_vertex_array(verts);
                    }
                    renderer.set_blend_mode(BlendMode::Opaque);
                    renderer.set_depth_mode(match entry.mode {
                        DebugRenderMode::Always => DepthMode::Disabled,
                        DebugRenderMode::UseDepth | DebugRenderMode::XRay => {
                            DepthMode::ReadWriteLessEqual
                        }
                    });
                    renderer.set_model_constants(Mat4::IDENTITY, color);
                    renderer.draw_vertex_array(verts);
                }
                WorldShape::Text {
                    text,
                    transform,
                    height,
                    alignment,
                } => renderer.draw_text(&TextDraw {
                    text: text.clone(),
                    position: transform.w_axis.truncate(),
                    height: *height,
                    alignment: *alignment,
                    color,
                }),
                WorldShape::BillboardText {
                    text,
                    origin,
                    height,
                    alignment,
                } => renderer.draw_text(&TextDraw {
                    text: text.clone(),
                    position: *origin,
                    height: *height,
                    alignment: *alignment,
                    color,
                }),
            }
        }
        renderer.reset_model_constants();
        renderer.end_camera(camera);
    }

    pub fn render_screen<R: Renderer + ?Sized>(&self, renderer: &mut R, camera: &Camera) {
        if self.hidden {
            return;
        }
        let now = self.now();
        let bounds = camera.ortho_bounds().unwrap_or(Aabb2::ZERO_TO_ONE);
        renderer.begin_camera(camera);
        let mut message_row = 0;
        for entry in &self.screen {
            let color = entry.life.color_at(now);
            let draw = match &entry.shape {
                ScreenShape::Text {
                    text,
                    position,
                    height,
                    alignment,
                } => TextDraw {
                    text: text.clone(),
                    position: position.extend(0.0),
                    height: *height,
                    alignment: *alignment,
                    color,
                },
                ScreenShape::Message { text } => {
                    message_row += 1;
                    // Rows start below the status line at the top edge.
                    let y = bounds.maxs.y - MESSAGE_HEIGHT * (message_row + 1) as f32;
                    TextDraw {
                        text: text.clone(),
                        position: Vec3::new(bounds.mins.x, y, 0.0),
                        height: MESSAGE_HEIGHT,
                        alignment: Vec2::new(0.0, 1.0),
                        color,
                    }
                }
            };
            renderer.draw_text(&draw);
        }
        renderer.end_camera(camera);
    }

    fn expire(&mut self) {
        let now = self.now();
        self.world.retain(|e| !e.life.is_expired(now));
        self.screen.retain(|e| !e.life.is_expired(now));
    }
}

impl EngineSubsystem for DebugRenderSystem {
    fn name(&self) -> &'static str {
        "debug-render"
    }

    fn end_frame(&mut self) {
        self.expire();
    }

    fn shutdown(&mut self) {
        self.clear();
    }
}
