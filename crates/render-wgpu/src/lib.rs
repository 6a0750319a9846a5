//! wgpu render backend for protogame.
//!
//! Implements [`protogame_render::Renderer`] on a window surface. Draw calls
//! are collected per camera during the frame and submitted in `end_frame`,
//! one render pass per camera, followed by an egui pass for text.
//!
//! # Invariants
//! - Renderer never mutates game state.
//! - A lost or outdated surface skips the frame; it never panics.

mod gpu;
mod overlay;
mod shaders;

pub use gpu::{GpuError, WgpuRenderer, pick_surface_format};
pub use overlay::{ScreenLabel, label_anchor, project_label};
