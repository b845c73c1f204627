//! Gaussian heatmap targets for training.

use alloc::vec::Vec;

use crate::error::{KpdaCoreError, Result};
use crate::heatmap::Heatmaps;
use crate::types::{Keypoint, Point2};

/// Cells further than this many sigmas from the centre stay zero.
const TRUNCATE_SIGMAS: f32 = 3.0;

/// Ground-truth heatmaps and per-channel loss weights for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTargets {
    /// One Gaussian channel per keypoint.
    pub heatmaps: Heatmaps,
    /// 1.0 for visible or occluded keypoints, 0.0 for absent ones.
    pub weights: Vec<f32>,
}

/// Renders keypoints into Gaussian heatmaps on a square grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetEncoder {
    stride: u32,
    sigma: f32,
    side: usize,
}

impl TargetEncoder {
    /// Create an encoder for a `side x side` heatmap grid.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for a zero stride, zero side or
    /// non-positive sigma.
    pub fn new(stride: u32, sigma: f32, side: usize) -> Result<Self> {
        if stride == 0 {
            return Err(KpdaCoreError::InvalidParameter { name: "stride" });
        }
        if !(sigma > 0.0) {
            return Err(KpdaCoreError::InvalidParameter { name: "sigma" });
        }
        if side == 0 {
            return Err(KpdaCoreError::InvalidParameter { name: "heatmap side" });
        }
        Ok(Self {
            stride,
            sigma,
            side,
        })
    }

    /// Heatmap-cell centre for a pixel position under the given resize scale.
    #[inline]
    pub fn cell_centre(&self, x: f32, y: f32, scale: f32) -> Point2 {
        let s = self.stride as f32;
        Point2::new(x * scale / s - 0.5, y * scale / s - 0.5)
    }

    /// Render `keypoints` (original-image pixels) into target heatmaps.
    pub fn encode(&self, keypoints: &[Keypoint], scale: f32) -> Result<EncodedTargets> {
        if !(scale > 0.0) {
            return Err(KpdaCoreError::InvalidParameter { name: "scale" });
        }

        let mut heatmaps = Heatmaps::zeros(keypoints.len(), self.side, self.side);
        let mut weights = Vec::with_capacity(keypoints.len());
        let denom = 2.0 * self.sigma * self.sigma;
        let radius = TRUNCATE_SIGMAS * self.sigma;
        let last = (self.side - 1) as f32;

        for (c, kp) in keypoints.iter().enumerate() {
            if !kp.visibility.is_present() {
                weights.push(0.0);
                continue;
            }
            weights.push(1.0);

            let centre = self.cell_centre(kp.x, kp.y, scale);
            let x0 = libm::floorf(centre.x - radius).clamp(0.0, last) as usize;
            let x1 = libm::ceilf(centre.x + radius).clamp(0.0, last) as usize;
            let y0 = libm::floorf(centre.y - radius).clamp(0.0, last) as usize;
            let y1 = libm::ceilf(centre.y + radius).clamp(0.0, last) as usize;

            let plane = heatmaps.channel_mut(c)?;
            for row in y0..=y1 {
                let dy = row as f32 - centre.y;
                for col in x0..=x1 {
                    let dx = col as f32 - centre.x;
                    let d2 = dx * dx + dy * dy;
                    if d2 <= radius * radius {
                        plane[row * self.side + col] = libm::expf(-d2 / denom);
                    }
                }
            }
        }

        Ok(EncodedTargets { heatmaps, weights })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_heatmaps, DecodeParams};
    use crate::types::{DecodeMethod, ImageSize, Visibility};
    use alloc::vec;

    #[test]
    fn test_peak_at_cell_centre() {
        let enc = TargetEncoder::new(4, 1.0, 8).unwrap();
        // (10, 6) at stride 4 lands on cell (col 2, row 1)
        let targets = enc.encode(&[Keypoint::visible(10.0, 6.0)], 1.0).unwrap();
        assert_eq!(targets.weights, vec![1.0]);
        assert!((targets.heatmaps.get(0, 1, 2) - 1.0).abs() < 1e-6);
        assert!((targets.heatmaps.get(0, 1, 3) - libm::expf(-0.5)).abs() < 1e-6);
        assert_eq!(targets.heatmaps.get(0, 7, 7), 0.0);
    }

    #[test]
    fn test_absent_keypoint_is_zero_weighted() {
        let enc = TargetEncoder::new(4, 1.0, 8).unwrap();
        let kps = [
            Keypoint::new(10.0, 6.0, Visibility::Absent),
            Keypoint::new(10.0, 6.0, Visibility::Occluded),
        ];
        let targets = enc.encode(&kps, 1.0).unwrap();
        assert_eq!(targets.weights, vec![0.0, 1.0]);
        assert!(targets.heatmaps.channel(0).unwrap().iter().all(|&v| v == 0.0));
        assert!(targets.heatmaps.get(1, 1, 2) > 0.99);
    }

    #[test]
    fn test_encode_then_decode_recovers_position() {
        let enc = TargetEncoder::new(4, 1.5, 32).unwrap();
        let kp = Keypoint::visible(58.0, 90.0);
        let targets = enc.encode(&[kp], 1.0).unwrap();

        let params = DecodeParams {
            scale: 1.0,
            stride: 4,
            image: ImageSize::new(128, 128),
            method: DecodeMethod::MaxOffset,
        };
        let decoded = decode_heatmaps(&targets.heatmaps, &params).unwrap();
        assert!(decoded[0].position().distance(kp.position()) <= 4.0);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(TargetEncoder::new(0, 1.0, 8).is_err());
        assert!(TargetEncoder::new(4, 0.0, 8).is_err());
        assert!(TargetEncoder::new(4, 1.0, 0).is_err());
        let enc = TargetEncoder::new(4, 1.0, 8).unwrap();
        assert!(enc.encode(&[], 0.0).is_err());
    }
}
