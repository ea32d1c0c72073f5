//! Programmable vertex/fragment stages
//!
//! The indirection layer that replaces the fixed camera + solid-color
//! path: callers supply a per-vertex transform and a per-pixel color
//! function as trait impls, keeping the scan loops monomorphic. Drawing
//! with either stage unbound is a reported error, never a silent default
//! render.

use glam::Vec3;
use tracing::debug;

use super::camera::Camera;
use super::draw;
use super::framebuffer::FrameBuffer;
use super::types::Color;
use crate::error::RenderError;

/// Per-vertex stage: world position to screen position.
///
/// `None` marks the vertex as clipped (e.g. a vanishing homogeneous w);
/// primitives referencing a clipped vertex are skipped.
pub trait VertexShader {
    fn transform_vertex(&self, pos: Vec3) -> Option<Vec3>;
}

/// Per-pixel stage: screen position (depth interpolated) plus the
/// interpolated normal when the caller supplied one.
pub trait FragmentShader {
    fn shade_fragment(&self, pos: Vec3, normal: Option<Vec3>) -> Color;
}

/// Adapts a [`Camera`] into the vertex stage.
pub struct CameraShader(pub Camera);

impl VertexShader for CameraShader {
    fn transform_vertex(&self, pos: Vec3) -> Option<Vec3> {
        self.0.transform(pos)
    }
}

/// The trivial fragment stage: one color everywhere.
pub struct SolidColor(pub Color);

impl FragmentShader for SolidColor {
    fn shade_fragment(&self, _pos: Vec3, _normal: Option<Vec3>) -> Color {
        self.0
    }
}

/// Holds at most one shader per stage.
pub struct Pipeline<V, F> {
    vertex: Option<V>,
    fragment: Option<F>,
}

impl<V: VertexShader, F: FragmentShader> Pipeline<V, F> {
    pub fn new() -> Self {
        Self { vertex: None, fragment: None }
    }

    pub fn bind_vertex_shader(&mut self, shader: V) {
        self.vertex = Some(shader);
    }

    pub fn bind_fragment_shader(&mut self, shader: F) {
        self.fragment = Some(shader);
    }

    fn stages(&self) -> Result<(&V, &F), RenderError> {
        let vertex = self.vertex.as_ref().ok_or(RenderError::MissingVertexShader)?;
        let fragment = self.fragment.as_ref().ok_or(RenderError::MissingFragmentShader)?;
        Ok((vertex, fragment))
    }

    /// Run the vertex stage over every vertex exactly once.
    fn transform_all(vertex: &V, vertices: &[Vec3]) -> Vec<Option<Vec3>> {
        vertices.iter().map(|&p| vertex.transform_vertex(p)).collect()
    }

    fn check_indices(indices: &[u32], stride: usize, vertex_count: usize) -> Result<(), RenderError> {
        if indices.len() % stride != 0 {
            return Err(RenderError::MalformedIndices { len: indices.len(), stride });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(RenderError::IndexOutOfRange {
                index: bad as usize,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Draw indexed line segments; every index pair is one line.
    pub fn draw_lines(
        &self,
        vertices: &[Vec3],
        indices: &[u32],
        fb: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        let (vertex, fragment) = self.stages()?;
        Self::check_indices(indices, 2, vertices.len())?;

        let screen = Self::transform_all(vertex, vertices);
        for pair in indices.chunks_exact(2) {
            let (Some(a), Some(b)) = (screen[pair[0] as usize], screen[pair[1] as usize]) else {
                continue;
            };
            draw::draw_line_with(fb, a, b, |pos| fragment.shade_fragment(pos, None));
        }
        Ok(())
    }

    /// Draw an indexed triangle list through both stages.
    ///
    /// `normals`, when given, must parallel `vertices`; the fragment stage
    /// then receives the barycentric-interpolated normal per pixel.
    pub fn draw_triangles(
        &self,
        vertices: &[Vec3],
        normals: Option<&[Vec3]>,
        indices: &[u32],
        fb: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        let (vertex, fragment) = self.stages()?;
        Self::check_indices(indices, 3, vertices.len())?;
        if let Some(normals) = normals {
            if normals.len() != vertices.len() {
                return Err(RenderError::NormalCountMismatch {
                    normals: normals.len(),
                    vertices: vertices.len(),
                });
            }
        }

        let screen = Self::transform_all(vertex, vertices);
        debug!(
            vertices = vertices.len(),
            triangles = indices.len() / 3,
            "pipeline triangle pass"
        );
        for tri in indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(a), Some(b), Some(c)) = (screen[i0], screen[i1], screen[i2]) else {
                continue;
            };
            let tri_normals = normals.map(|n| [n[i0], n[i1], n[i2]]);
            draw::draw_triangle_with(fb, [a, b, c], |pos, bc| {
                let normal = tri_normals
                    .map(|[n0, n1, n2]| (n0 * bc.x + n1 * bc.y + n2 * bc.z).normalize_or_zero());
                fragment.shade_fragment(pos, normal)
            });
        }
        Ok(())
    }

    /// Draw a triangle strip through both stages.
    pub fn draw_triangle_strip(
        &self,
        vertices: &[Vec3],
        fb: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        let (vertex, fragment) = self.stages()?;

        let screen = Self::transform_all(vertex, vertices);
        for i in 2..screen.len() {
            let (Some(a), Some(b), Some(c)) = (screen[i - 2], screen[i - 1], screen[i]) else {
                continue;
            };
            draw::draw_triangle_with(fb, [a, b, c], |pos, _| fragment.shade_fragment(pos, None));
        }
        Ok(())
    }
}

impl<V: VertexShader, F: FragmentShader> Default for Pipeline<V, F> {
    fn default() -> Self {
        Self::new()
    }
}
