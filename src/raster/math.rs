//! Geometric tests for scan conversion
//!
//! Vector and matrix types come from glam; this module adds the
//! triangle-area math the rasterizer is built on.

use glam::{Vec2, Vec3};

/// Normalizer magnitudes below this are treated as a zero-area triangle.
pub const AREA_EPSILON: f32 = 1e-4;

/// Signed area term: which side of edge (a, b) the point p falls on.
pub fn edge_sign(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

/// Barycentric coordinates of `p` in triangle `(a, b, c)`.
///
/// Returns `None` when the triangle's doubled signed area is below
/// [`AREA_EPSILON`] (collinear vertices), so callers never divide by a
/// near-zero normalizer. For any non-degenerate triangle the weights sum
/// to 1 for every point, inside or out.
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<Vec3> {
    let d = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if d.abs() < AREA_EPSILON {
        return None;
    }
    let u = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / d;
    let v = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / d;
    Some(Vec3::new(u, v, 1.0 - u - v))
}

/// Point-in-triangle via three which-side tests.
///
/// Winding-agnostic: inside means the three signs agree. Points exactly
/// on an edge (one or more tests equal to zero) count as inside, for
/// every triangle sharing that edge.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = edge_sign(p, a, b);
    let d2 = edge_sign(p, b, c);
    let d3 = edge_sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}
