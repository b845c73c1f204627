//! Keypoint network seam and the bundled baseline network.

mod baseline;

pub use baseline::BaselineNet;

use burn::prelude::*;

/// Heatmaps from the two stages of a cascade network, each `[batch, K, H', W']`.
#[derive(Debug, Clone)]
pub struct HeatmapPair<B: Backend> {
    /// Coarse first-stage prediction.
    pub global: Tensor<B, 4>,
    /// Refined second-stage prediction; inference decodes this one.
    pub refine: Tensor<B, 4>,
}

/// A network mapping a padded image batch `[batch, 3, S, S]` to heatmaps.
pub trait KeypointNetwork<B: Backend>: Module<B> {
    /// Forward pass.
    fn forward(&self, images: Tensor<B, 4>) -> HeatmapPair<B>;
}
