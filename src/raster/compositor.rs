//! Depth-aware merging of independently rendered layers
//!
//! Each worker in a parallel render owns a private framebuffer over the
//! full frame extent; this reduction combines them into the image a
//! single-threaded depth-tested render would have produced.

use tracing::debug;

use super::framebuffer::FrameBuffer;
use crate::error::RenderError;

/// Merge layers per pixel: the strictly greater depth wins, ties keep the
/// earlier layer's color and depth.
///
/// The rule is commutative and associative up to that tie-break, so the
/// result does not depend on worker completion order. Errors on an empty
/// list or mismatched layer dimensions.
pub fn merge(layers: &[FrameBuffer]) -> Result<FrameBuffer, RenderError> {
    let first = layers.first().ok_or(RenderError::EmptyMerge)?;
    let (width, height) = (first.width(), first.height());

    for (index, layer) in layers.iter().enumerate() {
        if layer.width() != width || layer.height() != height {
            return Err(RenderError::LayerSizeMismatch {
                index,
                got_width: layer.width(),
                got_height: layer.height(),
                want_width: width,
                want_height: height,
            });
        }
    }
    debug!(layers = layers.len(), width, height, "merging layers");

    let mut result = FrameBuffer::new(width, height, first.far_depth())?;
    for layer in layers {
        let pixels = layer.pixels();
        let depths = layer.depths();
        for idx in 0..width * height {
            if depths[idx] > result.depths()[idx] {
                result.write_unchecked(idx, depths[idx], pixels[idx]);
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::framebuffer::FAR_DEPTH;
    use crate::raster::types::Color;

    fn layer(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer::new(w, h, FAR_DEPTH).unwrap()
    }

    #[test]
    fn test_empty_merge_is_error() {
        assert!(matches!(merge(&[]), Err(RenderError::EmptyMerge)));
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let a = layer(4, 4);
        let b = layer(4, 5);
        assert!(matches!(
            merge(&[a, b]),
            Err(RenderError::LayerSizeMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_disjoint_regions_commute() {
        let mut a = layer(4, 4);
        a.test_and_write(0, 0, 3.0, Color::RED);
        let mut b = layer(4, 4);
        b.test_and_write(3, 3, 7.0, Color::BLUE);

        let ab = merge(&[a, b]).unwrap();
        assert_eq!(ab.read(0, 0), Color::RED);
        assert_eq!(ab.depth_at(0, 0), 3.0);
        assert_eq!(ab.read(3, 3), Color::BLUE);
        assert_eq!(ab.depth_at(3, 3), 7.0);

        let mut a2 = layer(4, 4);
        a2.test_and_write(0, 0, 3.0, Color::RED);
        let mut b2 = layer(4, 4);
        b2.test_and_write(3, 3, 7.0, Color::BLUE);
        let ba = merge(&[b2, a2]).unwrap();
        assert_eq!(ba.pixels(), ab.pixels());
        assert_eq!(ba.depths(), ab.depths());
    }

    #[test]
    fn test_overlap_takes_greater_depth_per_pixel() {
        let mut a = layer(2, 1);
        a.test_and_write(0, 0, 9.0, Color::RED);
        a.test_and_write(1, 0, 2.0, Color::RED);
        let mut b = layer(2, 1);
        b.test_and_write(0, 0, 4.0, Color::BLUE);
        b.test_and_write(1, 0, 6.0, Color::BLUE);

        let out = merge(&[a, b]).unwrap();
        assert_eq!(out.read(0, 0), Color::RED);
        assert_eq!(out.read(1, 0), Color::BLUE);
    }

    #[test]
    fn test_tie_keeps_first_layer() {
        let mut a = layer(1, 1);
        a.test_and_write(0, 0, 5.0, Color::RED);
        let mut b = layer(1, 1);
        b.test_and_write(0, 0, 5.0, Color::BLUE);

        let out = merge(&[a, b]).unwrap();
        assert_eq!(out.read(0, 0), Color::RED);
    }

    #[test]
    fn test_unpainted_pixels_stay_background() {
        let a = layer(2, 2);
        let b = layer(2, 2);
        let out = merge(&[a, b]).unwrap();
        assert!(out.pixels().iter().all(|&c| c == Color::BLACK));
        assert!(out.depths().iter().all(|&d| d == FAR_DEPTH));
    }
}
