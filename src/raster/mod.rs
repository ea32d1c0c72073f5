//! Software rasterization core
//!
//! The pipeline, leaf to root: geometric tests (`math`), value types
//! (`types`), the depth-tested pixel grid (`framebuffer`), scan
//! conversion (`draw`), the world-to-screen transform (`camera`), the
//! programmable stage indirection (`pipeline`), layer merging
//! (`compositor`), and the mesh renderers (`render`).

pub mod camera;
pub mod compositor;
pub mod draw;
pub mod framebuffer;
pub mod math;
pub mod pipeline;
pub mod render;
pub mod types;

pub use camera::{Camera, DEPTH_SCALE};
pub use compositor::merge;
pub use framebuffer::{FrameBuffer, FAR_DEPTH};
pub use math::{barycentric, point_in_triangle};
pub use pipeline::{CameraShader, FragmentShader, Pipeline, SolidColor, VertexShader};
pub use render::{render_mesh, render_parallel, RenderSettings, ShadingMode};
pub use types::{Color, Primitive, Vertex};
