//! Loss seam for two-stage heatmap training.

mod visibility;

pub use visibility::VisibilityMseLoss;

use burn::prelude::*;
use burn::tensor::ElementConversion;

use crate::nn::HeatmapPair;

/// The three loss terms reported per batch.
#[derive(Debug, Clone)]
pub struct LossOutput<B: Backend> {
    /// Value that is back-propagated.
    pub total: Tensor<B, 1>,
    /// First-stage term.
    pub global: Tensor<B, 1>,
    /// Second-stage term.
    pub refine: Tensor<B, 1>,
}

impl<B: Backend> LossOutput<B> {
    /// Scalar values `[total, global, refine]`.
    pub fn values(&self) -> [f64; 3] {
        [
            self.total.clone().into_scalar().elem::<f64>(),
            self.global.clone().into_scalar().elem::<f64>(),
            self.refine.clone().into_scalar().elem::<f64>(),
        ]
    }
}

/// A loss over target heatmaps `[batch, K, H', W']`, predictions and
/// per-keypoint visibility weights `[batch, K]`.
pub trait KeypointLoss {
    /// Compute the loss terms.
    fn compute<B: Backend>(
        &self,
        targets: &Tensor<B, 4>,
        predicted: &HeatmapPair<B>,
        visibility: &Tensor<B, 2>,
    ) -> LossOutput<B>;
}
