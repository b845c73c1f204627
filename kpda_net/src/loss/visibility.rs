//! Visibility-masked heatmap regression.

use burn::prelude::*;

use super::{KeypointLoss, LossOutput};
use crate::nn::HeatmapPair;

/// Mean squared heatmap error over keypoints whose visibility weight is set.
///
/// Each channel contributes its spatial MSE times its weight; the sum is
/// divided by the number of weighted channels (at least one). The total is
/// the sum of the global and refine terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityMseLoss;

impl VisibilityMseLoss {
    /// Create a new loss.
    pub fn new() -> Self {
        Self
    }

    fn stage<B: Backend>(
        targets: &Tensor<B, 4>,
        predicted: &Tensor<B, 4>,
        visibility: &Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        let [batch, channels, _, _] = predicted.dims();
        let diff = predicted.clone() - targets.clone();
        let per_channel: Tensor<B, 2> = (diff.clone() * diff)
            .mean_dim(3)
            .mean_dim(2)
            .reshape([batch, channels]);

        let weighted = (per_channel * visibility.clone()).sum();
        let count = visibility.clone().sum().clamp_min(1.0);
        weighted / count
    }
}

impl KeypointLoss for VisibilityMseLoss {
    fn compute<B: Backend>(
        &self,
        targets: &Tensor<B, 4>,
        predicted: &HeatmapPair<B>,
        visibility: &Tensor<B, 2>,
    ) -> LossOutput<B> {
        let global = Self::stage(targets, &predicted.global, visibility);
        let refine = Self::stage(targets, &predicted.refine, visibility);
        LossOutput {
            total: global.clone() + refine.clone(),
            global,
            refine,
        }
    }
}
