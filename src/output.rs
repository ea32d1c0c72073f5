//! Image output seam
//!
//! Hands the framebuffer's rows to the image codec in buffer order: row 0
//! is the top scanline on both sides, so no vertical flip happens here.

use image::{GrayImage, RgbaImage};
use std::path::Path;
use tracing::info;

use crate::error::RenderError;
use crate::raster::camera::DEPTH_SCALE;
use crate::raster::framebuffer::FrameBuffer;

/// Copy the color grid into an RGBA image.
pub fn to_image(fb: &FrameBuffer) -> RgbaImage {
    let mut img = RgbaImage::new(fb.width() as u32, fb.height() as u32);
    for (idx, pixel) in fb.pixels().iter().enumerate() {
        let x = (idx % fb.width()) as u32;
        let y = (idx / fb.width()) as u32;
        img.put_pixel(x, y, image::Rgba(pixel.to_bytes()));
    }
    img
}

/// Grayscale rendering of the depth grid, white = near.
///
/// Pairs with the `depth_write`-off debug passes: inspect occlusion
/// without touching the buffer.
pub fn depth_to_image(fb: &FrameBuffer) -> GrayImage {
    let mut img = GrayImage::new(fb.width() as u32, fb.height() as u32);
    for (idx, &depth) in fb.depths().iter().enumerate() {
        let x = (idx % fb.width()) as u32;
        let y = (idx / fb.width()) as u32;
        let v = (depth / DEPTH_SCALE * 255.0).clamp(0.0, 255.0) as u8;
        img.put_pixel(x, y, image::Luma([v]));
    }
    img
}

/// Encode and save the frame; the format comes from the file extension.
pub fn save<P: AsRef<Path>>(fb: &FrameBuffer, path: P) -> Result<(), RenderError> {
    let path = path.as_ref();
    to_image(fb).save(path).map_err(|source| RenderError::ImageWrite {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), width = fb.width(), height = fb.height(), "image written");
    Ok(())
}
