//! Placement of text draws on the window for the egui overlay.

use egui::{Align, Align2, Color32, Pos2};
use glam::{Vec2, Vec4Swizzles};
use protogame_render::{Camera, TextDraw};

/// Text resolved to window pixels (y down), ready for `egui::Painter::text`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLabel {
    pub text: String,
    pub position: Pos2,
    pub anchor: Align2,
    pub size: f32,
    pub color: Color32,
}

/// Labels smaller than this many pixels are dropped.
const MIN_LABEL_PIXELS: f32 = 1.0;

/// Snap a continuous pivot to egui's nine anchors. The pivot's y runs
/// bottom-to-top, egui's runs top-to-bottom.
pub fn label_anchor(alignment: Vec2) -> Align2 {
    let snap = |t: f32| {
        if t < 1.0 / 3.0 {
            Align::Min
        } else if t > 2.0 / 3.0 {
            Align::Max
        } else {
            Align::Center
        }
    };
    let flip = |a: Align| match a {
        Align::Min => Align::Max,
        Align::Max => Align::Min,
        Align::Center => Align::Center,
    };
    Align2([snap(alignment.x), flip(snap(alignment.y))])
}

/// Project a text draw through `camera` onto a viewport of `viewport` pixels.
///
/// Returns `None` when the anchor is behind the camera, outside the depth
/// range, or the text would be under a pixel tall.
pub fn project_label(camera: &Camera, text: &TextDraw, viewport: Vec2) -> Option<ScreenLabel> {
    let clip = camera.view_projection() * text.position.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    if !(0.0..=1.0).contains(&ndc.z) {
        return None;
    }

    let pixels_per_unit = if let Some(bounds) = camera.ortho_bounds() {
        let height = bounds.dimensions().y;
        if height <= f32::EPSILON {
            return None;
        }
        viewport.y / height
    } else {
        let p = camera.perspective()?;
        let half_fov = (p.fov_degrees.to_radians() * 0.5).tan();
        viewport.y / (2.0 * clip.w * half_fov)
    };
    let size = text.height * pixels_per_unit;
    if size < MIN_LABEL_PIXELS {
        return None;
    }

    let x = (ndc.x * 0.5 + 0.5) * viewport.x;
    let y = (0.5 - ndc.y * 0.5) * viewport.y;
    let c = text.color;
    Some(ScreenLabel {
        text: text.text.clone(),
        position: Pos2::new(x, y),
        anchor: label_anchor(text.alignment),
        size,
        color: Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a),
    })
}
