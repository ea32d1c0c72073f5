//! Mesh rendering
//!
//! The fixed-function path: batch camera transform, backface culling,
//! directional dot-product shading, triangle scan via `draw`. The
//! parallel variant partitions the face list across worker threads, each
//! owning a private framebuffer, and reduces with the layer compositor.

use glam::Vec3;
use std::ops::Range;
use tracing::{debug, info};

use super::camera::Camera;
use super::compositor;
use super::draw;
use super::framebuffer::{FrameBuffer, FAR_DEPTH};
use super::types::Color;
use crate::error::RenderError;
use crate::mesh::Mesh;

/// Shading mode for the fixed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ShadingMode {
    /// Raw base color, no lighting
    None,
    /// One intensity per face
    Flat,
    /// Per-vertex intensity, interpolated across the face
    Gouraud,
}

/// Renderer settings for the fixed path
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub shading: ShadingMode,
    pub backface_cull: bool,
    /// Directional light, pointing from the surface toward the light
    pub light_dir: Vec3,
    /// Ambient intensity floor (0.0-1.0)
    pub ambient: f32,
    pub base_color: Color,
    pub background: Color,
    /// Draw triangle edges as lines instead of filling
    pub wireframe: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Gouraud,
            backface_cull: true,
            light_dir: Vec3::new(1.0, 1.0, 1.0).normalize(),
            ambient: 0.3,
            base_color: Color::WHITE,
            background: Color::BLACK,
            wireframe: false,
        }
    }
}

/// Shading intensity for a normal under the directional light.
fn shade_intensity(normal: Vec3, light_dir: Vec3, ambient: f32) -> f32 {
    let diffuse = normal.dot(light_dir).max(0.0);
    (ambient + (1.0 - ambient) * diffuse).clamp(0.0, 1.0)
}

/// Render every face of the mesh into the framebuffer.
pub fn render_mesh(
    fb: &mut FrameBuffer,
    mesh: &Mesh,
    camera: &Camera,
    settings: &RenderSettings,
) -> Result<(), RenderError> {
    mesh.validate()?;
    render_face_range(fb, mesh, camera, settings, 0..mesh.face_count())
}

/// Per-vertex camera products, computed once per frame and shared by
/// every face range of that frame.
struct TransformedVertices {
    /// Screen-space position, or `None` where the w guard clipped it.
    screen: Vec<Option<Vec3>>,
    /// Camera-space position, for the culling normal.
    cam_space: Vec<Vec3>,
}

fn transform_vertices(mesh: &Mesh, camera: &Camera) -> TransformedVertices {
    TransformedVertices {
        screen: mesh
            .vertices
            .iter()
            .map(|v| camera.transform(v.pos))
            .collect(),
        cam_space: mesh
            .vertices
            .iter()
            .map(|v| (camera.view * v.pos.extend(1.0)).truncate())
            .collect(),
    }
}

/// Render a contiguous face range. Used directly by the parallel path so
/// workers share one validated mesh without copying it.
pub fn render_face_range(
    fb: &mut FrameBuffer,
    mesh: &Mesh,
    camera: &Camera,
    settings: &RenderSettings,
    faces: Range<usize>,
) -> Result<(), RenderError> {
    let transformed = transform_vertices(mesh, camera);
    shade_face_range(fb, mesh, &transformed, settings, faces);
    Ok(())
}

fn shade_face_range(
    fb: &mut FrameBuffer,
    mesh: &Mesh,
    transformed: &TransformedVertices,
    settings: &RenderSettings,
    faces: Range<usize>,
) {
    let TransformedVertices { screen, cam_space } = transformed;

    let mut culled = 0usize;
    for face in faces.clone() {
        let [i0, i1, i2] = mesh.face(face);

        let (Some(a), Some(b), Some(c)) = (screen[i0], screen[i1], screen[i2]) else {
            continue; // clipped vertex
        };

        // Face normal in camera space, before projection; the camera
        // looks down -z, so faces pointing away have negative z
        let edge1 = cam_space[i1] - cam_space[i0];
        let edge2 = cam_space[i2] - cam_space[i0];
        let normal = edge1.cross(edge2).normalize_or_zero();
        if settings.backface_cull && normal.z <= 0.0 {
            culled += 1;
            continue;
        }

        if settings.wireframe {
            draw::draw_line(fb, a, b, settings.base_color);
            draw::draw_line(fb, b, c, settings.base_color);
            draw::draw_line(fb, c, a, settings.base_color);
            continue;
        }

        match settings.shading {
            ShadingMode::None => {
                draw::draw_triangle(fb, a, b, c, settings.base_color);
            }
            ShadingMode::Flat => {
                // One light term for the whole face, from the world-space
                // face normal
                let wn = (mesh.vertices[i1].pos - mesh.vertices[i0].pos)
                    .cross(mesh.vertices[i2].pos - mesh.vertices[i0].pos)
                    .normalize_or_zero();
                let shade = shade_intensity(wn, settings.light_dir, settings.ambient);
                let color = settings.base_color.shade(shade);
                draw::draw_triangle(fb, a, b, c, color);
            }
            ShadingMode::Gouraud => {
                let s0 = shade_intensity(mesh.vertices[i0].normal, settings.light_dir, settings.ambient);
                let s1 = shade_intensity(mesh.vertices[i1].normal, settings.light_dir, settings.ambient);
                let s2 = shade_intensity(mesh.vertices[i2].normal, settings.light_dir, settings.ambient);
                let base = settings.base_color;
                draw::draw_triangle_with(fb, [a, b, c], |_, bc| {
                    base.shade(bc.x * s0 + bc.y * s1 + bc.z * s2)
                });
            }
        }
    }
    debug!(faces = faces.len(), culled, "face range rendered");
}

/// Render the mesh with `workers` threads and merge the layers.
///
/// Partition-map-reduce: the face list splits into contiguous ranges, one
/// per worker; every worker renders its range into a private framebuffer
/// over the full frame extent, and the compositor reduces the layers with
/// the max-depth rule. No state is shared during the parallel phase, and
/// the result is pixel-identical to a sequential [`render_mesh`].
pub fn render_parallel(
    mesh: &Mesh,
    camera: &Camera,
    settings: &RenderSettings,
    width: usize,
    height: usize,
    workers: usize,
) -> Result<FrameBuffer, RenderError> {
    if workers == 0 {
        return Err(RenderError::NoWorkers);
    }
    mesh.validate()?;
    // Constructor errors surface before any thread spawns
    FrameBuffer::new(width, height, FAR_DEPTH)?;

    let face_count = mesh.face_count();
    let chunk = face_count.div_ceil(workers.min(face_count.max(1)));
    info!(workers, face_count, chunk, "parallel render");

    // Vertex transforms are range-independent; do them once, up front,
    // instead of once per worker
    let transformed = transform_vertices(mesh, camera);
    let transformed = &transformed;

    let layers: Vec<Result<FrameBuffer, RenderError>> = std::thread::scope(|scope| {
        let mut handles = Vec::new();
        let mut start = 0usize;
        while start < face_count {
            let end = (start + chunk).min(face_count);
            let range = start..end;
            handles.push(scope.spawn(move || {
                let mut fb = FrameBuffer::new(width, height, FAR_DEPTH)?;
                shade_face_range(&mut fb, mesh, transformed, settings, range);
                Ok(fb)
            }));
            start = end;
        }
        handles
            .into_iter()
            .map(|h| h.join().expect("render worker panicked"))
            .collect()
    });

    let mut buffers = Vec::with_capacity(layers.len());
    for layer in layers {
        buffers.push(layer?);
    }
    if buffers.is_empty() {
        // Empty mesh still produces a cleared frame
        let mut fb = FrameBuffer::new(width, height, FAR_DEPTH)?;
        fb.clear(settings.background);
        return Ok(fb);
    }
    let mut merged = compositor::merge(&buffers)?;
    // Workers leave untouched pixels at the far sentinel; the background
    // goes on once, after the reduction
    for idx in 0..width * height {
        if merged.depths()[idx] == FAR_DEPTH {
            merged.write_unchecked(idx, FAR_DEPTH, settings.background);
        }
    }
    Ok(merged)
}
