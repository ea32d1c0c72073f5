//! Error types for the rendering pipeline
//!
//! Configuration errors (bad dimensions, malformed index lists, unbound
//! shaders, merge mismatches) surface as `RenderError`; out-of-bounds
//! pixel writes and numerical degeneracies are tolerated in the hot
//! loops and never reach this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("framebuffer dimensions must be at least 1x1, got {width}x{height}")]
    ZeroDimensions { width: usize, height: usize },

    #[error("index list length {len} is not a multiple of {stride}")]
    MalformedIndices { len: usize, stride: usize },

    #[error("vertex index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },

    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),

    #[error("cannot merge an empty layer list")]
    EmptyMerge,

    #[error("layer {index} is {got_width}x{got_height}, expected {want_width}x{want_height}")]
    LayerSizeMismatch {
        index: usize,
        got_width: usize,
        got_height: usize,
        want_width: usize,
        want_height: usize,
    },

    #[error("normal list has {normals} entries for {vertices} vertices")]
    NormalCountMismatch { normals: usize, vertices: usize },

    #[error("no vertex shader bound")]
    MissingVertexShader,

    #[error("no fragment shader bound")]
    MissingFragmentShader,

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("failed to load mesh {path}: {source}")]
    MeshLoad {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to read scene config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to write image {path}: {source}")]
    ImageWrite {
        path: String,
        #[source]
        source: image::ImageError,
    },
}
