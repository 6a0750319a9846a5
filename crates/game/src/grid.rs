//! Debug floor grid on the XY plane.
//!
//! 100 thin unit-spaced boxes in each direction, then thicker ticks every
//! five units along both axes with the origin tick highlighted.

use std::collections::BTreeMap;

use protogame_common::{Aabb3, Rgba8, Vertex};
use protogame_render::vertex_utils::add_verts_for_aabb3d;

pub const LINE_COUNT: usize = 100;
pub const TICK_SPACING: usize = 5;
/// Tick offset that lands on the world axis.
pub const ORIGIN_TICK: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBox {
    pub bounds: Aabb3,
    pub color: Rgba8,
}

/// Every grid box in draw order.
pub fn grid_boxes() -> Vec<GridBox> {
    let mut boxes = Vec::with_capacity(LINE_COUNT * 2 + 42);

    for i in 0..LINE_COUNT {
        let o = i as f32;
        boxes.push(GridBox {
            bounds: Aabb3::from_coords(-50.0, -50.01 + o, -0.005, 50.0, -49.99 + o, 0.005),
            color: Rgba8::DARK_GRAY,
        });
        boxes.push(GridBox {
            bounds: Aabb3::from_coords(-50.01 + o, -50.0, -0.005, -49.99 + o, 50.0, 0.005),
            color: Rgba8::DARK_GRAY,
        });
    }

    // Ticks running along Y, spaced along X.
    for x in (0..=LINE_COUNT).step_by(TICK_SPACING) {
        let o = x as f32;
        boxes.push(GridBox {
            bounds: Aabb3::from_coords(-50.05 + o, -50.0, -0.05, -49.95 + o, 50.0, 0.05),
            color: if x == ORIGIN_TICK {
                Rgba8::GREEN
            } else {
                Rgba8::SEAWEED
            },
        });
    }

    // Ticks running along X, spaced along Y.
    for y in (0..=LINE_COUNT).step_by(TICK_SPACING) {
        let o = y as f32;
        boxes.push(GridBox {
            bounds: Aabb3::from_coords(-50.0, -50.05 + o, -0.05, 50.0, -49.95 + o, 0.05),
            color: if y == ORIGIN_TICK {
                Rgba8::RED
            } else {
                Rgba8::DARK_RED
            },
        });
    }

    boxes
}

pub fn build_grid_vertices() -> Vec<Vertex> {
    let boxes = grid_boxes();
    let mut verts = Vec::with_capacity(boxes.len() * 36);
    for b in &boxes {
        add_verts_for_aabb3d(&mut verts, b.bounds, b.color);
    }
    verts
}

/// Box and vertex counts per color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridStats {
    pub boxes: usize,
    pub vertices: usize,
    pub boxes_by_color: BTreeMap<[u8; 4], usize>,
}

impl GridStats {
    pub fn collect() -> Self {
        let boxes = grid_boxes();
        let mut by_color = BTreeMap::new();
        for b in &boxes {
            let c = b.color;
            *by_color.entry([c.r, c.g, c.b, c.a]).or_insert(0) += 1;
        }
        Self {
            boxes: boxes.len(),
            vertices: boxes.len() * 36,
            boxes_by_color: by_color,
        }
    }
}

impl std::fmt::Display for GridStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid: {} boxes, {} vertices", self.boxes, self.vertices)?;
        for ([r, g, b, a], count) in &self.boxes_by_color {
            writeln!(f, "  rgba({r}, {g}, {b}, {a}): {count}")?;
        }
        Ok(())
    }
}
