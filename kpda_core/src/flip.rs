//! Horizontal flip alignment for test-time ensembling and augmentation.

use alloc::vec::Vec;

use crate::conjugate::ConjugatePermutation;
use crate::error::{KpdaCoreError, Result};
use crate::heatmap::Heatmaps;
use crate::types::Keypoint;

/// Bring heatmaps predicted on a mirrored image back into the original frame.
///
/// Each row is reversed over the first `valid_width` columns (the columns that
/// hold image content rather than padding) and channel `perm.source(c)` is
/// routed into slot `c`. Columns at or beyond `valid_width` are zero.
///
/// # Errors
/// - `LengthMismatch` if the permutation does not cover every channel
/// - `InvalidParameter` if `valid_width` exceeds the heatmap width
pub fn unflip_heatmaps(
    flipped: &Heatmaps,
    perm: &ConjugatePermutation,
    valid_width: usize,
) -> Result<Heatmaps> {
    let (channels, height, width) = flipped.shape();
    if perm.len() != channels {
        return Err(KpdaCoreError::LengthMismatch {
            expected: channels,
            got: perm.len(),
        });
    }
    if valid_width > width {
        return Err(KpdaCoreError::InvalidParameter {
            name: "valid_width",
        });
    }

    let mut out = Heatmaps::zeros(channels, height, width);
    for c in 0..channels {
        let src = perm.source(c);
        for row in 0..height {
            for col in 0..valid_width {
                out.set(c, row, col, flipped.get(src, row, valid_width - 1 - col));
            }
        }
    }
    Ok(out)
}

/// Sum original and aligned mirrored heatmaps.
pub fn fuse_heatmaps(original: &Heatmaps, aligned: &Heatmaps) -> Result<Heatmaps> {
    original.add(aligned)
}

/// Mirror keypoints across the vertical axis of an image `width` pixels wide.
///
/// Positions become `width - 1 - x` and slots are swapped through `perm`, so a
/// left landmark stays labelled left after the image is mirrored.
pub fn flip_keypoints(
    keypoints: &[Keypoint],
    width: u32,
    perm: &ConjugatePermutation,
) -> Result<Vec<Keypoint>> {
    let last = width.saturating_sub(1) as f32;
    let mirrored: Vec<Keypoint> = keypoints
        .iter()
        .map(|kp| Keypoint::new(last - kp.x, kp.y, kp.visibility))
        .collect();
    perm.apply(&mirrored)
}
