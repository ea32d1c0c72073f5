//! Framebuffer for software rendering
//!
//! Owns the color grid and the parallel depth grid, and enforces the
//! depth-test/depth-write contract per pixel.
//!
//! Depth convention: depth increases toward the viewer. A candidate
//! fragment wins when its depth is strictly greater than the stored
//! depth, so on an exact tie the first writer keeps the pixel — the same
//! tie rule the layer compositor uses, which is what makes a partitioned
//! render reduce to the sequential one. Buffers clear to a
//! "far" sentinel (default [`FAR_DEPTH`]); the camera's viewport matrix
//! maps the near plane to [`crate::raster::camera::DEPTH_SCALE`] and the
//! far plane to 0, consistent with this rule.
//!
//! Row order: row 0 is the top scanline. The image output seam consumes
//! rows in that same order, without a vertical flip.

use super::types::Color;
use crate::error::RenderError;

/// Default "far" depth sentinel buffers clear to.
pub const FAR_DEPTH: f32 = 0.0;

pub struct FrameBuffer {
    pixels: Vec<Color>,
    depths: Vec<f32>,
    width: usize,
    height: usize,
    far_depth: f32,
    /// When false, every in-bounds write passes regardless of stored depth.
    pub depth_test: bool,
    /// When false, passing writes leave the stored depth untouched.
    pub depth_write: bool,
}

impl FrameBuffer {
    /// Allocate both grids, pixels at opaque black, depths at `far_depth`.
    ///
    /// Zero-area dimensions are a configuration error.
    pub fn new(width: usize, height: usize, far_depth: f32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::ZeroDimensions { width, height });
        }
        Ok(Self {
            pixels: vec![Color::BLACK; width * height],
            depths: vec![far_depth; width * height],
            width,
            height,
            far_depth,
            depth_test: true,
            depth_write: true,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn far_depth(&self) -> f32 {
        self.far_depth
    }

    /// Reset every pixel to `color` and every depth to the far sentinel.
    pub fn clear(&mut self, color: Color) {
        self.clear_color(color);
        self.clear_depth(self.far_depth);
    }

    pub fn clear_color(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn clear_depth(&mut self, depth: f32) {
        self.depths.fill(depth);
    }

    /// Replace both grids with a fresh buffer of the new dimensions.
    ///
    /// The two grids always describe the same logical pixel grid, so they
    /// resize in lockstep.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::ZeroDimensions { width, height });
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::BLACK; width * height];
        self.depths = vec![self.far_depth; width * height];
        Ok(())
    }

    /// Depth-tested pixel write. Returns whether the color was written.
    ///
    /// Out of bounds is a silent no-op returning false: scan loops probe a
    /// clamped bounding box that can still graze out-of-range coordinates
    /// after integer rounding. The stored depth only updates when
    /// `depth_write` is on, whether or not the test gate was enabled.
    pub fn test_and_write(&mut self, x: i32, y: i32, depth: f32, color: Color) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        let idx = y as usize * self.width + x as usize;
        if self.depth_test {
            if depth > self.depths[idx] {
                self.pixels[idx] = color;
                if self.depth_write {
                    self.depths[idx] = depth;
                }
                return true;
            }
            false
        } else {
            self.pixels[idx] = color;
            if self.depth_write {
                self.depths[idx] = depth;
            }
            true
        }
    }

    /// Bounds-checked read; out of bounds yields the default color.
    pub fn read(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Color::default();
        }
        self.pixels[y as usize * self.width + x as usize]
    }

    /// Bounds-checked depth read; out of bounds yields the far sentinel.
    pub fn depth_at(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return self.far_depth;
        }
        self.depths[y as usize * self.width + x as usize]
    }

    /// Row-major pixels, row 0 on top.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Row-major depths, parallel to [`Self::pixels`].
    pub fn depths(&self) -> &[f32] {
        &self.depths
    }

    pub(crate) fn write_unchecked(&mut self, idx: usize, depth: f32, color: Color) {
        self.pixels[idx] = color;
        self.depths[idx] = depth;
    }
}
