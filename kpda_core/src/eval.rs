//! Normalized keypoint error.

use crate::error::{KpdaCoreError, Result};
use crate::types::{Keypoint, Visibility};

/// Mean error over ground-truth-visible keypoints divided by the distance
/// between the two `reference` ground-truth keypoints.
///
/// Returns `Ok(None)` when no keypoint is visible or the reference distance is
/// zero.
///
/// # Errors
/// - `LengthMismatch` if the slices differ in length
/// - `ChannelOutOfRange` if a reference index is out of range
pub fn normalized_error(
    predicted: &[Keypoint],
    truth: &[Keypoint],
    reference: (usize, usize),
) -> Result<Option<f32>> {
    if predicted.len() != truth.len() {
        return Err(KpdaCoreError::LengthMismatch {
            expected: truth.len(),
            got: predicted.len(),
        });
    }
    for idx in [reference.0, reference.1] {
        if idx >= truth.len() {
            return Err(KpdaCoreError::ChannelOutOfRange {
                index: idx,
                channels: truth.len(),
            });
        }
    }

    let norm = truth[reference.0]
        .position()
        .distance(truth[reference.1].position());
    if !(norm > 0.0) {
        return Ok(None);
    }

    let mut sum = 0.0f32;
    let mut count = 0usize;
    for (p, t) in predicted.iter().zip(truth) {
        if t.visibility == Visibility::Visible {
            sum += p.position().distance(t.position());
            count += 1;
        }
    }

    if count == 0 {
        return Ok(None);
    }
    Ok(Some(sum / count as f32 / norm))
}

/// Running mean of per-image normalized errors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ErrorAccumulator {
    sum: f64,
    count: usize,
    skipped: usize,
}

impl ErrorAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one image; `None` counts as skipped.
    pub fn push(&mut self, error: Option<f32>) {
        match error {
            Some(e) => {
                self.sum += e as f64;
                self.count += 1;
            }
            None => self.skipped += 1,
        }
    }

    /// Number of images with a defined error.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of images whose error was undefined.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Mean error, if any image contributed.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}
