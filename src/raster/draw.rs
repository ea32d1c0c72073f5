//! Scan conversion of lines and triangles into framebuffer writes
//!
//! Points are screen-space: x and y in pixels, z the depth (greater =
//! nearer the viewer, see the framebuffer contract). All functions go
//! through `FrameBuffer::test_and_write`, so depth policy lives in one
//! place.

use glam::Vec3;

use super::framebuffer::FrameBuffer;
use super::math::barycentric;
use super::types::{Color, Primitive};
use crate::error::RenderError;

/// Tolerance on the inside test, matching the barycentric epsilon so
/// pixels exactly on a shared edge land in both triangles.
const INSIDE_EPS: f32 = -1e-4;

/// Draw a depth-interpolated line, one color per pixel from `frag`.
///
/// Incremental walk along the dominant axis: swap x/y roles when the line
/// is steep, swap endpoints so the walk is monotonic, then step unit
/// increments interpolating the off-axis coordinate and depth by `t`.
pub fn draw_line_with<F>(fb: &mut FrameBuffer, a: Vec3, b: Vec3, mut frag: F)
where
    F: FnMut(Vec3) -> Color,
{
    let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
    let (mut x1, mut y1) = (b.x.round() as i32, b.y.round() as i32);
    let (mut z0, mut z1) = (a.z, b.z);

    let steep = (x1 - x0).abs() < (y1 - y0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
        std::mem::swap(&mut z0, &mut z1);
    }

    for x in x0..=x1 {
        // x0 == x1 for a single-point line; the inclusive loop still
        // visits it once, with t pinned to 0
        let t = if x1 == x0 {
            0.0
        } else {
            (x - x0) as f32 / (x1 - x0) as f32
        };
        let y = (y0 as f32 * (1.0 - t) + y1 as f32 * t).round() as i32;
        let z = z0 * (1.0 - t) + z1 * t;
        let (px, py) = if steep { (y, x) } else { (x, y) };
        let color = frag(Vec3::new(px as f32, py as f32, z));
        fb.test_and_write(px, py, z, color);
    }
}

/// Draw a line in a single color.
pub fn draw_line(fb: &mut FrameBuffer, a: Vec3, b: Vec3, color: Color) {
    draw_line_with(fb, a, b, |_| color);
}

/// Draw a filled triangle, one color per pixel from `frag`.
///
/// `frag` receives the screen-space position (with interpolated depth)
/// and the barycentric weights of the pixel, for attribute interpolation.
///
/// Scans the axis-aligned bounding box clamped to the buffer; a triangle
/// entirely outside scans nothing, and collinear vertices draw nothing
/// (the barycentric normalizer is degenerate).
pub fn draw_triangle_with<F>(fb: &mut FrameBuffer, pts: [Vec3; 3], mut frag: F)
where
    F: FnMut(Vec3, Vec3) -> Color,
{
    let [a, b, c] = pts;

    let min_x = (a.x.min(b.x).min(c.x).floor().max(0.0)) as i32;
    let min_y = (a.y.min(b.y).min(c.y).floor().max(0.0)) as i32;
    let max_x = (a.x.max(b.x).max(c.x).ceil()).min(fb.width() as f32 - 1.0) as i32;
    let max_y = (a.y.max(b.y).max(c.y).ceil()).min(fb.height() as f32 - 1.0) as i32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = glam::Vec2::new(x as f32, y as f32);
            let Some(bc) = barycentric(p, a.truncate(), b.truncate(), c.truncate()) else {
                return; // degenerate triangle, nothing to scan
            };
            if bc.x >= INSIDE_EPS && bc.y >= INSIDE_EPS && bc.z >= INSIDE_EPS {
                let z = bc.x * a.z + bc.y * b.z + bc.z * c.z;
                let pos = Vec3::new(x as f32, y as f32, z);
                let color = frag(pos, bc);
                fb.test_and_write(x, y, z, color);
            }
        }
    }
}

/// Draw a filled triangle in a single color.
pub fn draw_triangle(fb: &mut FrameBuffer, a: Vec3, b: Vec3, c: Vec3, color: Color) {
    draw_triangle_with(fb, [a, b, c], |_, _| color);
}

/// Draw an indexed triangle list; every consecutive index triple is one
/// triangle.
pub fn draw_triangles(
    fb: &mut FrameBuffer,
    vertices: &[Vec3],
    indices: &[u32],
    color: Color,
) -> Result<(), RenderError> {
    if indices.len() % 3 != 0 {
        return Err(RenderError::MalformedIndices { len: indices.len(), stride: 3 });
    }
    for tri in indices.chunks_exact(3) {
        for &i in tri {
            if i as usize >= vertices.len() {
                return Err(RenderError::IndexOutOfRange {
                    index: i as usize,
                    vertex_count: vertices.len(),
                });
            }
        }
        draw_triangle(
            fb,
            vertices[tri[0] as usize],
            vertices[tri[1] as usize],
            vertices[tri[2] as usize],
            color,
        );
    }
    Ok(())
}

/// Draw a convex polygon as a triangle fan from vertex 0.
pub fn draw_polygon(fb: &mut FrameBuffer, vertices: &[Vec3], color: Color) -> Result<(), RenderError> {
    if vertices.len() < 3 {
        return Err(RenderError::DegeneratePolygon(vertices.len()));
    }
    for i in 1..vertices.len() - 1 {
        draw_triangle(fb, vertices[0], vertices[i], vertices[i + 1], color);
    }
    Ok(())
}

/// Draw a triangle strip: each vertex after the first two forms a
/// triangle with the previous two.
pub fn draw_triangle_strip(fb: &mut FrameBuffer, vertices: &[Vec3], color: Color) {
    for i in 2..vertices.len() {
        draw_triangle(fb, vertices[i - 2], vertices[i - 1], vertices[i], color);
    }
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let mix = |x: u8, y: u8| (x as f32 * (1.0 - t) + y as f32 * t).round() as u8;
    Color::with_alpha(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

fn blend3(colors: [Color; 3], bc: glam::Vec3) -> Color {
    let mix = |f: fn(Color) -> u8| {
        (f(colors[0]) as f32 * bc.x + f(colors[1]) as f32 * bc.y + f(colors[2]) as f32 * bc.z)
            .clamp(0.0, 255.0)
            .round() as u8
    };
    Color::with_alpha(mix(|c| c.r), mix(|c| c.g), mix(|c| c.b), mix(|c| c.a))
}

/// Draw a heterogeneous primitive list.
///
/// Per-vertex colors interpolate linearly along lines and barycentrically
/// across triangles; primitives without colors use `fallback`.
pub fn draw_primitives(fb: &mut FrameBuffer, primitives: &[Primitive], fallback: Color) {
    for prim in primitives {
        match *prim {
            Primitive::Line { points: [a, b], colors } => match colors {
                None => draw_line(fb, a, b, fallback),
                Some([c0, c1]) => {
                    let ab = (b - a).truncate();
                    let len_sq = ab.length_squared().max(1e-6);
                    draw_line_with(fb, a, b, |pos| {
                        let t = ((pos.truncate() - a.truncate()).dot(ab) / len_sq).clamp(0.0, 1.0);
                        lerp_color(c0, c1, t)
                    });
                }
            },
            Primitive::Triangle { points, colors } => match colors {
                None => draw_triangle(fb, points[0], points[1], points[2], fallback),
                Some(cols) => draw_triangle_with(fb, points, |_, bc| blend3(cols, bc)),
            },
        }
    }
}

/// Axis-aligned rectangle fast path at constant depth.
///
/// Cheaper than two `draw_triangle` calls since no barycentric math is
/// needed per pixel.
pub fn draw_rect(fb: &mut FrameBuffer, min: glam::Vec2, max: glam::Vec2, z: f32, color: Color) {
    let x0 = min.x.round().max(0.0) as i32;
    let y0 = min.y.round().max(0.0) as i32;
    let x1 = (max.x.round()).min(fb.width() as f32 - 1.0) as i32;
    let y1 = (max.y.round()).min(fb.height() as f32 - 1.0) as i32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            fb.test_and_write(x, y, z, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::framebuffer::FAR_DEPTH;

    fn buffer(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer::new(w, h, FAR_DEPTH).unwrap()
    }

    #[test]
    fn test_horizontal_line() {
        let mut fb = buffer(20, 20);
        draw_line(&mut fb, Vec3::new(0.0, 0.0, 1.0), Vec3::new(10.0, 0.0, 1.0), Color::WHITE);
        for x in 0..=10 {
            assert_eq!(fb.read(x, 0), Color::WHITE, "pixel ({x}, 0)");
        }
        for x in 11..20 {
            assert_eq!(fb.read(x, 0), Color::BLACK);
        }
        for y in 1..20 {
            for x in 0..20 {
                assert_eq!(fb.read(x, y), Color::BLACK);
            }
        }
    }

    #[test]
    fn test_degenerate_line_writes_one_pixel() {
        for p in [Vec3::new(5.0, 7.0, 1.0), Vec3::new(7.0, 5.0, 1.0)] {
            let mut fb = buffer(20, 20);
            draw_line(&mut fb, p, p, Color::WHITE);
            let painted: usize = (0..20)
                .flat_map(|y| (0..20).map(move |x| (x, y)))
                .filter(|&(x, y)| fb.read(x, y) == Color::WHITE)
                .count();
            assert_eq!(painted, 1);
            assert_eq!(fb.read(p.x as i32, p.y as i32), Color::WHITE);
        }
    }

    #[test]
    fn test_steep_line_covers_endpoints() {
        let mut fb = buffer(20, 20);
        draw_line(&mut fb, Vec3::new(3.0, 1.0, 1.0), Vec3::new(5.0, 15.0, 1.0), Color::WHITE);
        assert_eq!(fb.read(3, 1), Color::WHITE);
        assert_eq!(fb.read(5, 15), Color::WHITE);
    }

    #[test]
    fn test_line_endpoint_order_irrelevant() {
        let a = Vec3::new(2.0, 3.0, 1.0);
        let b = Vec3::new(17.0, 11.0, 1.0);
        let mut fwd = buffer(20, 20);
        let mut rev = buffer(20, 20);
        draw_line(&mut fwd, a, b, Color::WHITE);
        draw_line(&mut rev, b, a, Color::WHITE);
        assert_eq!(fwd.pixels(), rev.pixels());
    }

    #[test]
    fn test_triangle_interior_scenario() {
        let mut fb = buffer(100, 100);
        draw_triangle(
            &mut fb,
            Vec3::new(10.0, 10.0, 1.0),
            Vec3::new(90.0, 10.0, 1.0),
            Vec3::new(50.0, 90.0, 1.0),
            Color::RED,
        );
        assert_eq!(fb.read(50, 50), Color::RED);
        assert_eq!(fb.read(1, 1), Color::BLACK);
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let mut fb = buffer(20, 20);
        draw_triangle(
            &mut fb,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(5.0, 5.0, 0.0),
            Vec3::new(9.0, 9.0, 0.0),
            Color::RED,
        );
        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_offscreen_triangle_draws_nothing() {
        let mut fb = buffer(20, 20);
        draw_triangle(
            &mut fb,
            Vec3::new(-30.0, -30.0, 0.0),
            Vec3::new(-10.0, -30.0, 0.0),
            Vec3::new(-20.0, -10.0, 0.0),
            Color::RED,
        );
        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_depth_test_order_independent() {
        let near = [
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(19.0, 0.0, 10.0),
            Vec3::new(10.0, 19.0, 10.0),
        ];
        let far = [
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(19.0, 0.0, 5.0),
            Vec3::new(10.0, 19.0, 5.0),
        ];

        let mut near_first = buffer(20, 20);
        draw_triangle(&mut near_first, near[0], near[1], near[2], Color::RED);
        draw_triangle(&mut near_first, far[0], far[1], far[2], Color::BLUE);

        let mut far_first = buffer(20, 20);
        draw_triangle(&mut far_first, far[0], far[1], far[2], Color::BLUE);
        draw_triangle(&mut far_first, near[0], near[1], near[2], Color::RED);

        assert_eq!(near_first.pixels(), far_first.pixels());
        assert_eq!(near_first.read(10, 10), Color::RED);
    }

    #[test]
    fn test_draw_triangles_rejects_malformed_indices() {
        let mut fb = buffer(10, 10);
        let verts = [Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0)];
        assert!(matches!(
            draw_triangles(&mut fb, &verts, &[0, 1], Color::RED),
            Err(RenderError::MalformedIndices { len: 2, .. })
        ));
        assert!(matches!(
            draw_triangles(&mut fb, &verts, &[0, 1, 3], Color::RED),
            Err(RenderError::IndexOutOfRange { index: 3, .. })
        ));
        assert!(draw_triangles(&mut fb, &verts, &[0, 1, 2], Color::RED).is_ok());
    }

    #[test]
    fn test_polygon_fan_fills_square() {
        let mut fb = buffer(20, 20);
        let quad = [
            Vec3::new(2.0, 2.0, 1.0),
            Vec3::new(12.0, 2.0, 1.0),
            Vec3::new(12.0, 12.0, 1.0),
            Vec3::new(2.0, 12.0, 1.0),
        ];
        draw_polygon(&mut fb, &quad, Color::GREEN).unwrap();
        assert_eq!(fb.read(7, 7), Color::GREEN);
        assert_eq!(fb.read(2, 2), Color::GREEN);
        assert_eq!(fb.read(15, 15), Color::BLACK);
        assert!(matches!(
            draw_polygon(&mut fb, &quad[..2], Color::GREEN),
            Err(RenderError::DegeneratePolygon(2))
        ));
    }

    #[test]
    fn test_strip_expansion() {
        // Two triangles sharing an edge, as a 4-vertex strip
        let mut strip = buffer(20, 20);
        let verts = [
            Vec3::new(2.0, 2.0, 1.0),
            Vec3::new(12.0, 2.0, 1.0),
            Vec3::new(2.0, 12.0, 1.0),
            Vec3::new(12.0, 12.0, 1.0),
        ];
        draw_triangle_strip(&mut strip, &verts, Color::RED);

        let mut pair = buffer(20, 20);
        draw_triangle(&mut pair, verts[0], verts[1], verts[2], Color::RED);
        draw_triangle(&mut pair, verts[1], verts[2], verts[3], Color::RED);

        assert_eq!(strip.pixels(), pair.pixels());
    }

    #[test]
    fn test_shared_diagonal_has_no_gap() {
        // Quad split along the diagonal; every interior pixel must be
        // covered by at least one of the two triangles
        let mut fb = buffer(20, 20);
        let (a, b, c, d) = (
            Vec3::new(2.0, 2.0, 1.0),
            Vec3::new(12.0, 2.0, 1.0),
            Vec3::new(12.0, 12.0, 1.0),
            Vec3::new(2.0, 12.0, 1.0),
        );
        draw_triangle(&mut fb, a, b, c, Color::RED);
        draw_triangle(&mut fb, a, c, d, Color::BLUE);
        for y in 2..=12 {
            for x in 2..=12 {
                assert_ne!(fb.read(x, y), Color::BLACK, "gap at ({x}, {y})");
            }
        }
        // The diagonal itself is owned by both; equal depths keep the
        // first writer
        assert_eq!(fb.read(7, 7), Color::RED);
    }

    #[test]
    fn test_mixed_primitive_list() {
        let mut fb = buffer(20, 20);
        let prims = [
            Primitive::Line {
                points: [Vec3::new(0.0, 0.0, 1.0), Vec3::new(10.0, 0.0, 1.0)],
                colors: Some([Color::BLACK, Color::WHITE]),
            },
            Primitive::Triangle {
                points: [
                    Vec3::new(2.0, 5.0, 1.0),
                    Vec3::new(16.0, 5.0, 1.0),
                    Vec3::new(9.0, 18.0, 1.0),
                ],
                colors: None,
            },
        ];
        draw_primitives(&mut fb, &prims, Color::RED);

        // Gradient along the line: endpoints keep their colors
        assert_eq!(fb.read(0, 0), Color::BLACK);
        assert_eq!(fb.read(10, 0), Color::WHITE);
        let mid = fb.read(5, 0);
        assert!(mid.r > 0 && mid.r < 255);
        // Uncolored triangle falls back to the flat color
        assert_eq!(fb.read(9, 9), Color::RED);
    }

    #[test]
    fn test_vertex_colored_triangle_matches_corners() {
        let mut fb = buffer(20, 20);
        let prims = [Primitive::Triangle {
            points: [
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(18.0, 0.0, 1.0),
                Vec3::new(0.0, 18.0, 1.0),
            ],
            colors: Some([Color::RED, Color::GREEN, Color::BLUE]),
        }];
        draw_primitives(&mut fb, &prims, Color::BLACK);
        assert_eq!(fb.read(0, 0), Color::RED);
        assert_eq!(fb.read(18, 0), Color::GREEN);
        assert_eq!(fb.read(0, 18), Color::BLUE);
    }

    #[test]
    fn test_rect_fast_path() {
        let mut fb = buffer(20, 20);
        draw_rect(&mut fb, glam::Vec2::new(3.0, 4.0), glam::Vec2::new(6.0, 8.0), 1.0, Color::GREEN);
        assert_eq!(fb.read(3, 4), Color::GREEN);
        assert_eq!(fb.read(6, 8), Color::GREEN);
        assert_eq!(fb.read(7, 8), Color::BLACK);
        assert_eq!(fb.read(2, 4), Color::BLACK);
    }
}
