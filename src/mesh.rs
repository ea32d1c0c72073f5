//! Mesh input seam
//!
//! The renderer only needs positions, normals, and a triangle index
//! list; OBJ parsing itself is tobj's job. Loading validates the index
//! list up front so the draw loops never see a malformed mesh.

use glam::{Vec2, Vec3};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::RenderError;
use crate::raster::types::Vertex;

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Index-list sanity: length a multiple of 3, every index in range.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.indices.len() % 3 != 0 {
            return Err(RenderError::MalformedIndices {
                len: self.indices.len(),
                stride: 3,
            });
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            return Err(RenderError::IndexOutOfRange {
                index: bad as usize,
                vertex_count: self.vertices.len(),
            });
        }
        Ok(())
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The three vertex indices of face `i`.
    pub fn face(&self, i: usize) -> [usize; 3] {
        [
            self.indices[i * 3] as usize,
            self.indices[i * 3 + 1] as usize,
            self.indices[i * 3 + 2] as usize,
        ]
    }

    /// Load an OBJ file, triangulated, one index stream.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )
        .map_err(|source| RenderError::MeshLoad {
            path: path.display().to_string(),
            source,
        })?;

        let mut mesh = Mesh::default();
        for model in models {
            let m = model.mesh;
            let base = mesh.vertices.len() as u32;
            let count = m.positions.len() / 3;
            for i in 0..count {
                let pos = Vec3::new(
                    m.positions[i * 3],
                    m.positions[i * 3 + 1],
                    m.positions[i * 3 + 2],
                );
                let normal = if m.normals.len() >= (i + 1) * 3 {
                    Vec3::new(m.normals[i * 3], m.normals[i * 3 + 1], m.normals[i * 3 + 2])
                } else {
                    pos.normalize_or_zero()
                };
                let uv = if m.texcoords.len() >= (i + 1) * 2 {
                    Vec2::new(m.texcoords[i * 2], 1.0 - m.texcoords[i * 2 + 1])
                } else {
                    Vec2::ZERO
                };
                mesh.vertices.push(Vertex::new(pos, normal, uv));
            }
            mesh.indices.extend(m.indices.iter().map(|&i| base + i));
        }

        mesh.validate()?;
        info!(
            path = %path.display(),
            vertices = mesh.vertices.len(),
            faces = mesh.face_count(),
            "mesh loaded"
        );
        Ok(mesh)
    }

    /// Collapse identical vertices, rewriting the index list.
    ///
    /// Vertices compare component-wise over their raw bits, which is what
    /// makes `Vertex` usable as a map key.
    pub fn dedup_vertices(&mut self) {
        let mut remap: HashMap<Vertex, u32> = HashMap::with_capacity(self.vertices.len());
        let mut unique: Vec<Vertex> = Vec::with_capacity(self.vertices.len());

        let old = std::mem::take(&mut self.vertices);
        let new_indices: Vec<u32> = self
            .indices
            .iter()
            .map(|&i| {
                let v = old[i as usize];
                *remap.entry(v).or_insert_with(|| {
                    unique.push(v);
                    (unique.len() - 1) as u32
                })
            })
            .collect();

        self.vertices = unique;
        self.indices = new_indices;
    }
}
