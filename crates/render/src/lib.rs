//! Rendering Adapter: renderer-agnostic draw interface.
//!
//! # Invariants
//! - Renderers never mutate game state; they only consume draw calls.
//! - Every draw happens between `begin_camera` and `end_camera`.
//!
//! The [`Renderer`] trait is the narrow surface the game talks to. The
//! [`RecordingRenderer`] captures calls for tests and headless runs; the GPU
//! backend lives in `protogame-render-wgpu`.

mod camera;
mod renderer;
pub mod vertex_utils;

pub use camera::{Camera, PerspectiveParams, Projection};
pub use renderer::{
    BlendMode, DepthMode, DrawCommand, RasterizerMode, RecordingRenderer, Renderer, TextDraw,
    TextureHandle,
};
