//! scanline: a CPU-only 3D software rasterizer
//!
//! Turns a triangle mesh plus a camera transform into a 2D image with
//! per-pixel depth resolution, no GPU involved. The core is the
//! rasterization and depth-compositing pipeline: model space -> camera
//! space -> screen space, bounding-box triangle scan with barycentric
//! interpolation, a depth-buffered write rule, and a max-depth layer
//! merge for parallel tile rendering.
//!
//! Depth convention, once and for all: depth increases toward the
//! viewer, strictly greater wins the depth test, and buffers clear to a
//! far sentinel of 0. See [`raster::framebuffer`] for the full contract.

pub mod config;
pub mod error;
pub mod mesh;
pub mod output;
pub mod raster;

pub use error::RenderError;
pub use mesh::Mesh;
pub use raster::{Camera, Color, FrameBuffer, Vertex};
