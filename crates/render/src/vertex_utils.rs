//! Triangle-list builders. Every function appends to `verts`; quads emit
//! two triangles `(bl, br, tr)` and `(bl, tr, tl)`.

use glam::{Vec2, Vec3};
use protogame_common::{Aabb2, Aabb3, Rgba8, Vertex, vec3_from_polar_degrees};

pub fn add_verts_for_quad3d(
    verts: &mut Vec<Vertex>,
    bottom_left: Vec3,
    bottom_right: Vec3,
    top_right: Vec3,
    top_left: Vec3,
    color: Rgba8,
    uvs: Aabb2,
) {
    let uv_bl = uvs.mins;
    let uv_br = Vec2::new(uvs.maxs.x, uvs.mins.y);
    let uv_tr = uvs.maxs;
    let uv_tl = Vec2::new(uvs.mins.x, uvs.maxs.y);
    verts.extend_from_slice(&[
        Vertex::new(bottom_left, color, uv_bl),
        Vertex::new(bottom_right, color, uv_br),
        Vertex::new(top_right, color, uv_tr),
        Vertex::new(bottom_left, color, uv_bl),
        Vertex::new(top_right, color, uv_tr),
        Vertex::new(top_left, color, uv_tl),
    ]);
}

/// Screen-space rectangle at z = 0.
pub fn add_verts_for_aabb2d(verts: &mut Vec<Vertex>, bounds: Aabb2, color: Rgba8, uvs: Aabb2) {
    let Aabb2 { mins, maxs } = bounds;
    add_verts_for_quad3d(
        verts,
        mins.extend(0.0),
        Vec3::new(maxs.x, mins.y, 0.0),
        maxs.extend(0.0),
        Vec3::new(mins.x, maxs.y, 0.0),
        color,
        uvs,
    );
}

/// Six outward-facing quads, one color.
pub fn add_verts_for_aabb3d(verts: &mut Vec<Vertex>, bounds: Aabb3, color: Rgba8) {
    let Aabb3 { mins: n, maxs: x } = bounds;
    let uvs = Aabb2::ZERO_TO_ONE;
    // +X
    add_verts_for_quad3d(
        verts,
        Vec3::new(x.x, n.y, n.z),
        Vec3::new(x.x, x.y, n.z),
        Vec3::new(x.x, x.y, x.z),
        Vec3::new(x.x, n.y, x.z),
        color,
        uvs,
    );
    // -X
    add_verts_for_quad3d(
        verts,
        Vec3::new(n.x, x.y, n.z),
        Vec3::new(n.x, n.y, n.z),
        Vec3::new(n.x, n.y, x.z),
        Vec3::new(n.x, x.y, x.z),
        color,
        uvs,
    );
    // +Y
    add_verts_for_quad3d(
        verts,
        Vec3::new(x.x, x.y, n.z),
        Vec3::new(n.x, x.y, n.z),
        Vec3::new(n.x, x.y, x.z),
        Vec3::new(x.x, x.y, x.z),
        color,
        uvs,
    );
    // -Y
    add_verts_for_quad3d(
        verts,
        Vec3::new(n.x, n.y, n.z),
        Vec3::new(x.x, n.y, n.z),
        Vec3::new(x.x, n.y, x.z),
        Vec3::new(n.x, n.y, x.z),
        color,
        uvs,
    );
    // +Z
    add_verts_for_quad3d(
        verts,
        Vec3::new(x.x, x.y, x.z),
        Vec3::new(n.x, x.y, x.z),
        Vec3::new(n.x, n.y, x.z),
        Vec3::new(x.x, n.y, x.z),
        color,
        uvs,
    );
    // -Z
    add_verts_for_quad3d(
        verts,
        Vec3::new(x.x, n.y, n.z),
        Vec3::new(n.x, n.y, n.z),
        Vec3::new(n.x, x.y, n.z),
        Vec3::new(x.x, x.y, n.z),
        color,
        uvs,
    );
}

/// UV sphere. Longitude runs over `slices`, latitude over `stacks`; UV v
/// goes from the south pole (0) to the north pole (1).
pub fn add_verts_for_sphere3d(
    verts: &mut Vec<Vertex>,
    center: Vec3,
    radius: f32,
    color: Rgba8,
    uvs: Aabb2,
    slices: u32,
    stacks: u32,
) {
    let slices = slices.max(3);
    let stacks = stacks.max(2);
    let slice_degrees = 360.0 / slices as f32;
    let stack_degrees = 180.0 / stacks as f32;
    let uv_step = uvs.dimensions() / Vec2::new(slices as f32, stacks as f32);

    for stack in 0..stacks {
        // Latitude +90 is the south pole.
        let lat_bottom = 90.0 - stack as f32 * stack_degrees;
        let lat_top = lat_bottom - stack_degrees;
        for slice in 0..slices {
            let long_left = slice as f32 * slice_degrees;
            let long_right = long_left + slice_degrees;
            let uv_mins = uvs.mins + uv_step * Vec2::new(slice as f32, stack as f32);
            add_verts_for_quad3d(
                verts,
                center + vec3_from_polar_degrees(lat_bottom, long_left, radius),
                center + vec3_from_polar_degrees(lat_bottom, long_right, radius),
                center + vec3_from_polar_degrees(lat_top, long_right, radius),
                center + vec3_from_polar_degrees(lat_top, long_left, radius),
                color,
                Aabb2::new(uv_mins, uv_mins + uv_step),
            );
        }
    }
}

/// Offsets of `slices` evenly spaced points around the axis `start -> end`.
fn ring_around_axis(start: Vec3, end: Vec3, radius: f32, slices: u32) -> Option<Vec<Vec3>> {
    let axis = (end - start).try_normalize()?;
    let (i, j) = axis.any_orthonormal_pair();
    Some(
        (0..slices)
            .map(|s| {
                let angle = std::f32::consts::TAU * s as f32 / slices as f32;
                (i * angle.cos() + j * angle.sin()) * radius
            })
            .collect(),
    )
}

/// Closed cylinder between `start` and `end`. Degenerate axes add nothing.
pub fn add_verts_for_cylinder3d(
    verts: &mut Vec<Vertex>,
    start: Vec3,
    end: Vec3,
    radius: f32,
    color: Rgba8,
    slices: u32,
) {
    let slices = slices.max(3);
    let Some(ring) = ring_around_axis(start, end, radius, slices) else {
        return;
    };
    let uv = Vec2::ZERO;
    for s in 0..slices as usize {
        let a = ring[s];
        let b = ring[(s + 1) % ring.len()];
        add_verts_for_quad3d(
            verts,
            start + a,
            start + b,
            end + b,
            end + a,
            color,
            Aabb2::ZERO_TO_ONE,
        );
        verts.extend_from_slice(&[
            Vertex::new(start, color, uv),
            Vertex::new(start + b, color, uv),
            Vertex::new(start + a, color, uv),
            Vertex::new(end, color, uv),
            Vertex::new(end + a, color, uv),
            Vertex::new(end + b, color, uv),
        ]);
    }
}

/// Cone with its base disc at `start` and apex at `end`.
pub fn add_verts_for_cone3d(
    verts: &mut Vec<Vertex>,
    start: Vec3,
    end: Vec3,
    radius: f32,
    color: Rgba8,
    slices: u32,
) {
    let slices = slices.max(3);
    let Some(ring) = ring_around_axis(start, end, radius, slices) else {
        return;
    };
    let uv = Vec2::ZERO;
    for s in 0..slices as usize {
        let a = start + ring[s];
        let b = start + ring[(s + 1) % ring.len()];
        verts.extend_from_slice(&[
            Vertex::new(a, color, uv),
            Vertex::new(b, color, uv),
            Vertex::new(end, color, uv),
            Vertex::new(start, color, uv),
            Vertex::new(b, color, uv),
            Vertex::new(a, color, uv),
        ]);
    }
}

/// Cylinder shaft plus a cone head taking the last 30% of the length.
pub fn add_verts_for_arrow3d(
    verts: &mut Vec<Vertex>,
    start: Vec3,
    end: Vec3,
    radius: f32,
    color: Rgba8,
    slices: u32,
) {
    let head_start = start.lerp(end, 0.7);
    add_verts_for_cylinder3d(verts, start, head_start, radius, color, slices);
    add_verts_for_cone3d(verts, head_start, end, radius * 2.0, color, slices);
}

/// Bounds of a vertex list, or `None` when empty.
pub fn vertex_bounds(verts: &[Vertex]) -> Option<Aabb3> {
    let first = verts.first()?.position;
    Some(verts.iter().fold(Aabb3::new(first, first), |b, v| {
        Aabb3::new(b.mins.min(v.position), b.maxs.max(v.position))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb3d_emits_six_quads() {
        let mut verts = Vec::new();
        let bounds = Aabb3::from_coords(-1.0, -2.0, -3.0, 1.0, 2.0, 3.0);
        add_verts_for_aabb3d(&mut verts, bounds, Rgba8::RED);
        assert_eq!(verts.len(), 36);
        assert_eq!(vertex_bounds(&verts), Some(bounds));
        assert!(verts.iter().all(|v| v.color == Rgba8::RED));
    }

    #[test]
    fn aabb2d_lies_on_z_zero() {
        let mut verts = Vec::new();
        add_verts_for_aabb2d(
            &mut verts,
            Aabb2::from_coords(0.0, 0.0, 1600.0, 800.0),
            Rgba8::BLACK,
            Aabb2::ZERO_TO_ONE,
        );
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| v.position.z == 0.0));
    }

    #[test]
    fn sphere_vertices_sit_on_the_surface() {
        let mut verts = Vec::new();
        let center = Vec3::new(10.0, -5.0, 1.0);
        add_verts_for_sphere3d(&mut verts, center, 1.0, Rgba8::WHITE, Aabb2::ZERO_TO_ONE, 32, 16);
        assert_eq!(verts.len(), 32 * 16 * 6);
        for v in &verts {
            assert!(((v.position - center).length() - 1.0).abs() < 1e-4);
            assert!((0.0..=1.0 + 1e-5).contains(&v.uv.x));
            assert!((0.0..=1.0 + 1e-5).contains(&v.uv.y));
        }
    }

    #[test]
    fn cylinder_spans_its_axis() {
        let mut verts = Vec::new();
        add_verts_for_cylinder3d(&mut verts, Vec3::ZERO, Vec3::Z, 0.5, Rgba8::WHITE, 16);
        assert_eq!(verts.len(), 16 * 12);
        let b = vertex_bounds(&verts).unwrap();
        assert!((b.mins.z - 0.0).abs() < 1e-5 && (b.maxs.z - 1.0).abs() < 1e-5);
        assert!((b.maxs.x - 0.5).abs() < 0.05);
    }

    #[test]
    fn degenerate_cylinder_adds_nothing() {
        let mut verts = Vec::new();
        add_verts_for_cylinder3d(&mut verts, Vec3::ONE, Vec3::ONE, 0.5, Rgba8::WHITE, 16);
        add_verts_for_cone3d(&mut verts, Vec3::ONE, Vec3::ONE, 0.5, Rgba8::WHITE, 16);
        assert!(verts.is_empty());
    }

    #[test]
    fn arrow_reaches_its_tip() {
        let mut verts = Vec::new();
        add_verts_for_arrow3d(&mut verts, Vec3::ZERO, Vec3::X, 0.15, Rgba8::RED, 8);
        let b = vertex_bounds(&verts).unwrap();
        assert!((b.maxs.x - 1.0).abs() < 1e-5);
        assert!(b.mins.x.abs() < 1e-5);
    }
}
