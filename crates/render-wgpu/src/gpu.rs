use std::collections::{BTreeMap, HashMap};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use protogame_common::{Rgba8, Vertex};
use protogame_kernel::EngineSubsystem;
use protogame_render::{
    BlendMode, Camera, DepthMode, RasterizerMode, Renderer, TextDraw, TextureHandle,
};
use wgpu::util::DeviceExt;

use crate::overlay::project_label;
use crate::shaders;

/// Cameras a single frame may open. Uniform slots are preallocated.
const MAX_CAMERAS_PER_FRAME: u64 = 16;
/// Uniform slot stride; covers every adapter's offset alignment.
const UNIFORM_STRIDE: u64 = 256;
const INITIAL_VERTEX_CAPACITY: usize = 1 << 16;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const BLEND_MODES: [BlendMode; 3] = [BlendMode::Opaque, BlendMode::Alpha, BlendMode::Additive];
const DEPTH_MODES: [DepthMode; 4] = [
    DepthMode::Disabled,
    DepthMode::ReadOnlyAlways,
    DepthMode::ReadOnlyLessEqual,
    DepthMode::ReadWriteLessEqual,
];

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter")]
    NoAdapter,
    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no usable format")]
    NoSurfaceFormat,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 3],
    color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineKey {
    blend: BlendMode,
    depth: DepthMode,
}

/// A run of vertices drawn with one pipeline.
#[derive(Debug, Clone, Copy)]
struct DrawBatch {
    first_vertex: u32,
    vertex_count: u32,
    key: PipelineKey,
}

/// Everything drawn between one `begin_camera` and `end_camera`.
#[derive(Debug)]
struct CameraPass {
    camera: Camera,
    clear: Option<Rgba8>,
    batches: Vec<DrawBatch>,
    texts: Vec<TextDraw>,
}

impl CameraPass {
    fn new(camera: Camera, clear: Option<Rgba8>) -> Self {
        Self {
            camera,
            clear,
            batches: Vec::new(),
            texts: Vec::new(),
        }
    }
}

/// Prefer a non-sRGB format: vertex colors are already display-encoded.
pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    match mode {
        BlendMode::Opaque => wgpu::BlendState::REPLACE,
        BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
        BlendMode::Additive => {
            let add = wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            };
            wgpu::BlendState {
                color: add,
                alpha: add,
            }
        }
    }
}

fn depth_state(mode: DepthMode) -> wgpu::DepthStencilState {
    let (depth_write_enabled, depth_compare) = match mode {
        DepthMode::Disabled | DepthMode::ReadOnlyAlways => (false, wgpu::CompareFunction::Always),
        DepthMode::ReadOnlyLessEqual => (false, wgpu::CompareFunction::LessEqual),
        DepthMode::ReadWriteLessEqual => (true, wgpu::CompareFunction::LessEqual),
    };
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

fn to_wgpu_color(c: Rgba8) -> wgpu::Color {
    let [r, g, b, a] = c.to_f32_array();
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: f64::from(a),
    }
}

/// wgpu-backed [`Renderer`] drawing to a window surface.
///
/// Textures are registered by path and handed out as handles but not
/// sampled; every draw uses vertex color times tint. Cull mode is none and
/// wireframe draws as solid, since line polygon mode is an optional feature.
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    depth_texture: wgpu::TextureView,
    egui_ctx: egui::Context,
    egui_renderer: egui_wgpu::Renderer,

    textures: BTreeMap<String, TextureHandle>,
    bound_texture: Option<TextureHandle>,
    key: PipelineKey,
    rasterizer: RasterizerMode,
    model_to_world: Mat4,
    tint: Rgba8,

    frame_vertices: Vec<GpuVertex>,
    passes: Vec<CameraPass>,
    open_pass: Option<CameraPass>,
    pending_clear: Option<Rgba8>,
    frames_presented: u64,
}

impl WgpuRenderer {
    /// Create the device and configure `target` as the swap surface.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("protogame_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats).ok_or(GpuError::NoSurfaceFormat)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_uniforms"),
            size: UNIFORM_STRIDE * MAX_CAMERAS_PER_FRAME,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_size = wgpu::BufferSize::new(std::mem::size_of::<Uniforms>() as u64);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: uniform_size,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: uniform_size,
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vertex_array_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vertex_array_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::VERTEX_ARRAY_SHADER.into()),
        });

        let mut pipelines = HashMap::new();
        for blend in BLEND_MODES {
            for depth in DEPTH_MODES {
                let pipeline =
                    Self::create_pipeline(&device, &pipeline_layout, &shader, format, blend, depth);
                pipelines.insert(PipelineKey { blend, depth }, pipeline);
            }
        }

        let vertex_buffer = Self::create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);
        let depth_texture = Self::create_depth_texture(&device, config.width, config.height);
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?format,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            depth_texture,
            egui_ctx: egui::Context::default(),
            egui_renderer,
            textures: BTreeMap::new(),
            bound_texture: None,
            key: PipelineKey {
                blend: BlendMode::default(),
                depth: DepthMode::default(),
            },
            rasterizer: RasterizerMode::default(),
            model_to_world: Mat4::IDENTITY,
            tint: Rgba8::WHITE,
            frame_vertices: Vec::new(),
            passes: Vec::new(),
            open_pass: None,
            pending_clear: None,
            frames_presented: 0,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            Self::create_depth_texture(&self.device, self.config.width, self.config.height);
        tracing::debug!(width = self.config.width, height = self.config.height, "surface resized");
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn bound_texture(&self) -> Option<TextureHandle> {
        self.bound_texture
    }

    /// Last requested rasterizer mode. Every pipeline draws solid, cull none.
    pub fn rasterizer_mode(&self) -> RasterizerMode {
        self.rasterizer
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        blend: BlendMode,
        depth: DepthMode,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("vertex_array_pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GpuVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend_state(blend)),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(depth)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_vertices"),
            size: (capacity * std::mem::size_of::<GpuVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn ensure_vertex_capacity(&mut self, needed: usize) {
        if needed <= self.vertex_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        self.vertex_buffer = Self::create_vertex_buffer(&self.device, capacity);
        self.vertex_capacity = capacity;
        tracing::debug!(capacity, "vertex buffer grown");
    }

    /// Submit everything collected this frame and present it.
    fn present_frame(&mut self) {
        if let Some(open) = self.open_pass.take() {
            tracing::warn!("frame ended with a camera still open");
            self.passes.push(open);
        }
        let mut passes = std::mem::take(&mut self.passes);
        let vertices = std::mem::take(&mut self.frame_vertices);
        if passes.is_empty() {
            passes.push(CameraPass::new(
                Camera::default(),
                Some(self.pending_clear.take().unwrap_or(Rgba8::BLACK)),
            ));
        }
        if passes.len() as u64 > MAX_CAMERAS_PER_FRAME {
            tracing::warn!(
                cameras = passes.len(),
                max = MAX_CAMERAS_PER_FRAME,
                "too many cameras this frame, extra ones dropped"
            );
            passes.truncate(MAX_CAMERAS_PER_FRAME as usize);
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                tracing::debug!("surface reconfigured, frame skipped");
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ensure_vertex_capacity(vertices.len());
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        for (i, pass) in passes.iter().enumerate() {
            let uniforms = Uniforms {
                view_proj: pass.camera.view_projection().to_cols_array_2d(),
            };
            self.queue.write_buffer(
                &self.uniform_buffer,
                i as u64 * UNIFORM_STRIDE,
                bytemuck::bytes_of(&uniforms),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        for (i, pass) in passes.iter().enumerate() {
            // The first pass must clear: the swap texture starts undefined.
            let clear = pass
                .clear
                .or_else(|| (i == 0).then_some(Rgba8::BLACK));
            let (color_load, depth_load) = match clear {
                Some(c) => (wgpu::LoadOp::Clear(to_wgpu_color(c)), wgpu::LoadOp::Clear(1.0)),
                None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
            };
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("camera_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if pass.batches.is_empty() {
                continue;
            }
            let offset = (i as u64 * UNIFORM_STRIDE) as u32;
            rpass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            for batch in &pass.batches {
                let Some(pipeline) = self.pipelines.get(&batch.key) else {
                    continue;
                };
                rpass.set_pipeline(pipeline);
                rpass.draw(
                    batch.first_vertex..batch.first_vertex + batch.vertex_count,
                    0..1,
                );
            }
        }

        self.paint_text_overlay(&mut encoder, &view, &passes);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.frames_presented += 1;
    }

    fn paint_text_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        passes: &[CameraPass],
    ) {
        let viewport = Vec2::new(self.config.width as f32, self.config.height as f32);
        let labels: Vec<_> = passes
            .iter()
            .flat_map(|p| p.texts.iter().filter_map(|t| project_label(&p.camera, t, viewport)))
            .collect();
        if labels.is_empty() {
            return;
        }

        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(viewport.x, viewport.y),
            )),
            ..Default::default()
        };
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("text_overlay"),
            ));
            for label in &labels {
                painter.text(
                    label.position,
                    label.anchor,
                    &label.text,
                    egui::FontId::monospace(label.size),
                    label.color,
                );
            }
        });

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("text_overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

impl EngineSubsystem for WgpuRenderer {
    fn name(&self) -> &'static str {
        "renderer"
    }

    fn startup(&mut self) {
        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            "wgpu renderer ready"
        );
    }

    fn begin_frame(&mut self) {
        self.passes.clear();
        self.frame_vertices.clear();
        self.open_pass = None;
        self.pending_clear = None;
    }

    fn end_frame(&mut self) {
        self.present_frame();
    }

    fn shutdown(&mut self) {
        self.textures.clear();
        self.passes.clear();
        self.frame_vertices.clear();
        tracing::debug!(frames = self.frames_presented, "wgpu renderer shut down");
    }
}

impl Renderer for WgpuRenderer {
    fn clear_screen(&mut self, color: Rgba8) {
        match self.open_pass.as_mut() {
            Some(pass) if pass.batches.is_empty() => pass.clear = Some(color),
            Some(_) => {
                tracing::debug!("clear after draws in a camera, applied to the next camera");
                self.pending_clear = Some(color);
            }
            None => self.pending_clear = Some(color),
        }
    }

    fn begin_camera(&mut self, camera: &Camera) {
        if let Some(open) = self.open_pass.take() {
            tracing::warn!("begin_camera while another camera is open");
            self.passes.push(open);
        }
        self.open_pass = Some(CameraPass::new(*camera, self.pending_clear.take()));
    }

    fn end_camera(&mut self, _camera: &Camera) {
        match self.open_pass.take() {
            Some(pass) => self.passes.push(pass),
            None => tracing::warn!("end_camera without begin_camera"),
        }
    }

    fn create_or_get_texture(&mut self, path: &str) -> TextureHandle {
        if let Some(&handle) = self.textures.get(path) {
            return handle;
        }
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.insert(path.to_owned(), handle);
        tracing::debug!(path, id = handle.0, "texture registered");
        handle
    }

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        self.bound_texture = texture;
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.key.blend = mode;
    }

    fn set_rasterizer_mode(&mut self, mode: RasterizerMode) {
        self.rasterizer = mode;
    }

    fn set_depth_mode(&mut self, mode: DepthMode) {
        self.key.depth = mode;
    }

    fn set_model_constants(&mut self, model_to_world: Mat4, tint: Rgba8) {
        self.model_to_world = model_to_world;
        self.tint = tint;
    }

    fn draw_vertex_array(&mut self, vertexes: &[Vertex]) {
        if vertexes.is_empty() {
            return;
        }
        let Some(pass) = self.open_pass.as_mut() else {
            tracing::warn!(count = vertexes.len(), "draw outside a camera dropped");
            return;
        };

        let first_vertex = self.frame_vertices.len() as u32;
        let model = self.model_to_world;
        let tint = self.tint;
        self.frame_vertices.extend(vertexes.iter().map(|v| GpuVertex {
            position: model.transform_point3(v.position).to_array(),
            color: v.color.modulate(tint).to_f32_array(),
        }));
        let vertex_count = vertexes.len() as u32;

        match pass.batches.last_mut() {
            Some(last)
                if last.key == self.key && last.first_vertex + last.vertex_count == first_vertex =>
            {
                last.vertex_count += vertex_count;
            }
            _ => pass.batches.push(DrawBatch {
                first_vertex,
                vertex_count,
                key: self.key,
            }),
        }
    }

    fn draw_text(&mut self, text: &TextDraw) {
        match self.open_pass.as_mut() {
            Some(pass) => pass.texts.push(text.clone()),
            None => tracing::warn!(text = %text.text, "text outside a camera dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_non_srgb_formats() {
        let formats = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Bgra8Unorm,
        ];
        assert_eq!(
            pick_surface_format(&formats),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [wgpu::TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            pick_surface_format(&formats),
            Some(wgpu::TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(pick_surface_format(&[]), None);
    }

    #[test]
    fn depth_modes_map_to_compare_and_write() {
        let rw = depth_state(DepthMode::ReadWriteLessEqual);
        assert!(rw.depth_write_enabled);
        assert_eq!(rw.depth_compare, wgpu::CompareFunction::LessEqual);

        let ro = depth_state(DepthMode::ReadOnlyLessEqual);
        assert!(!ro.depth_write_enabled);

        for mode in [DepthMode::Disabled, DepthMode::ReadOnlyAlways] {
            let s = depth_state(mode);
            assert!(!s.depth_write_enabled);
            assert_eq!(s.depth_compare, wgpu::CompareFunction::Always);
        }
    }

    #[test]
    fn additive_blend_adds_source_over_destination() {
        let s = blend_state(BlendMode::Additive);
        assert_eq!(s.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(s.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend_state(BlendMode::Opaque), wgpu::BlendState::REPLACE);
    }

    #[test]
    fn clear_color_converts_to_unit_range() {
        let c = to_wgpu_color(Rgba8::opaque(255, 0, 51));
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }
}
