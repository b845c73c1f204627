//! Letterbox geometry shared by preprocessing, decoding and target encoding.

use crate::error::{KpdaCoreError, Result};
use crate::types::ImageSize;

/// How an original image maps onto the square network canvas.
///
/// The image is scaled so its larger side equals `canvas`, then placed at the
/// top-left corner; the remainder is zero padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePlan {
    /// Original image size.
    pub original: ImageSize,
    /// Size after scaling, before padding.
    pub resized: ImageSize,
    /// Scale factor applied to the original image.
    pub scale: f32,
    /// Side of the square canvas.
    pub canvas: u32,
}

impl ResizePlan {
    /// Fit `original` into a `canvas x canvas` square.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for an empty image or a zero canvas.
    pub fn fit(original: ImageSize, canvas: u32) -> Result<Self> {
        if original.is_empty() {
            return Err(KpdaCoreError::InvalidParameter { name: "image size" });
        }
        if canvas == 0 {
            return Err(KpdaCoreError::InvalidParameter { name: "canvas" });
        }

        let scale = canvas as f32 / original.max_side() as f32;
        let scaled = |side: u32| {
            if side == original.max_side() {
                canvas
            } else {
                ((side as f32 * scale) as u32).clamp(1, canvas)
            }
        };
        let resized_w = scaled(original.width);
        let resized_h = scaled(original.height);

        Ok(Self {
            original,
            resized: ImageSize::new(resized_w, resized_h),
            scale,
            canvas,
        })
    }

    /// Heatmap side length for a given stride.
    #[inline]
    pub fn heatmap_side(&self, stride: u32) -> usize {
        (self.canvas / stride.max(1)) as usize
    }

    /// Number of heatmap columns covered by real image content.
    ///
    /// Flip alignment mirrors only this many columns.
    #[inline]
    pub fn valid_heatmap_width(&self, stride: u32) -> usize {
        (self.resized.width / stride.max(1)) as usize
    }
}
