//! Heatmap peak decoding.
//!
//! One keypoint is produced per channel. The peak cell is located, optionally
//! refined by a quarter-cell shift towards the stronger neighbour, and mapped
//! back to original-image pixels through the stride and resize scale.

use alloc::vec::Vec;

use crate::error::{KpdaCoreError, Result};
use crate::heatmap::Heatmaps;
use crate::resize::ResizePlan;
use crate::types::{DecodeMethod, ImageSize, Keypoint, Point2, Visibility};

/// Sub-cell shift applied by [`DecodeMethod::MaxOffset`].
pub const PEAK_OFFSET: f32 = 0.25;

/// Everything needed to map heatmap cells back to image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeParams {
    /// Scale applied to the original image before the network saw it.
    pub scale: f32,
    /// Heatmap stride in canvas pixels.
    pub stride: u32,
    /// Original image size; decoded points are clamped into it.
    pub image: ImageSize,
    /// Peak localisation rule.
    pub method: DecodeMethod,
}

impl DecodeParams {
    /// Build decode parameters from a resize plan.
    pub fn from_plan(plan: &ResizePlan, stride: u32, method: DecodeMethod) -> Self {
        Self {
            scale: plan.scale,
            stride,
            image: plan.original,
            method,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.scale > 0.0) || !self.scale.is_finite() {
            return Err(KpdaCoreError::InvalidParameter { name: "scale" });
        }
        if self.stride == 0 {
            return Err(KpdaCoreError::InvalidParameter { name: "stride" });
        }
        if self.image.is_empty() {
            return Err(KpdaCoreError::InvalidParameter { name: "image size" });
        }
        Ok(())
    }
}

/// Index and value of the largest cell.
///
/// Ties resolve to the first occurrence. NaN cells are skipped; `None` is
/// returned if every cell is NaN or the slice is empty.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

#[inline]
fn neighbour_shift(before: f32, after: f32) -> f32 {
    if after > before {
        PEAK_OFFSET
    } else if after < before {
        -PEAK_OFFSET
    } else {
        0.0
    }
}

/// Peak position of one row-major channel in heatmap cell units.
///
/// Returns `None` when the channel carries no positive evidence.
pub fn locate_peak(
    plane: &[f32],
    height: usize,
    width: usize,
    method: DecodeMethod,
) -> Option<Point2> {
    let (idx, value) = argmax(plane)?;
    if value <= 0.0 {
        return None;
    }

    let row = idx / width;
    let col = idx % width;
    let mut x = col as f32;
    let mut y = row as f32;

    if method == DecodeMethod::MaxOffset {
        if col > 0 && col + 1 < width {
            x += neighbour_shift(plane[idx - 1], plane[idx + 1]);
        }
        if row > 0 && row + 1 < height {
            y += neighbour_shift(plane[idx - width], plane[idx + width]);
        }
    }

    Some(Point2::new(x, y))
}

/// Map a heatmap-cell position to original-image pixels, clamped into bounds.
#[inline]
pub fn cell_to_pixel(cell: Point2, params: &DecodeParams) -> Point2 {
    let factor = params.stride as f32 / params.scale;
    let max_x = (params.image.width - 1) as f32;
    let max_y = (params.image.height - 1) as f32;
    Point2::new(
        ((cell.x + 0.5) * factor).clamp(0.0, max_x),
        ((cell.y + 0.5) * factor).clamp(0.0, max_y),
    )
}

/// Decode one keypoint per channel.
///
/// Channels without positive evidence decode to the image centre flagged
/// [`Visibility::Absent`]; all others are flagged [`Visibility::Visible`].
///
/// # Errors
/// - `EmptyHeatmap` if any heatmap dimension is zero
/// - `InvalidParameter` for a non-positive scale, zero stride or empty image
pub fn decode_heatmaps(heatmaps: &Heatmaps, params: &DecodeParams) -> Result<Vec<Keypoint>> {
    if heatmaps.is_empty() {
        return Err(KpdaCoreError::EmptyHeatmap);
    }
    params.validate()?;

    let (channels, height, width) = heatmaps.shape();
    let fallback = params.image.center();
    let mut keypoints = Vec::with_capacity(channels);

    for c in 0..channels {
        let plane = heatmaps.channel(c)?;
        let kp = match locate_peak(plane, height, width, params.method) {
            Some(cell) => {
                let p = cell_to_pixel(cell, params);
                Keypoint::new(p.x, p.y, Visibility::Visible)
            }
            None => Keypoint::new(fallback.x, fallback.y, Visibility::Absent),
        };
        keypoints.push(kp);
    }

    Ok(keypoints)
}
