//! Data loading, preprocessing and visualization.

mod manifest;
mod preprocess;
mod render;

pub use manifest::{Manifest, ManifestDataset, ManifestSample};
pub use preprocess::{
    image_size, load_rgb, mirror, preprocess, to_image_tensor, PreparedImage,
};
pub use render::{keypoint_colour, render_keypoints, save_rendering};

use burn::prelude::*;

use crate::error::Result;

/// A batch of training data.
#[derive(Debug, Clone)]
pub struct KeypointBatch<B: Backend> {
    /// Normalized padded images: [batch, 3, S, S]
    pub images: Tensor<B, 4>,
    /// Target heatmaps: [batch, K, H', W']
    pub heatmaps: Tensor<B, 4>,
    /// Per-keypoint loss weights: [batch, K]
    pub visibility: Tensor<B, 2>,
}

impl<B: Backend> KeypointBatch<B> {
    /// Create a new batch.
    pub fn new(images: Tensor<B, 4>, heatmaps: Tensor<B, 4>, visibility: Tensor<B, 2>) -> Self {
        Self {
            images,
            heatmaps,
            visibility,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.images.dims()[0]
    }

    /// Whether the batch has no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the device of this batch.
    pub fn device(&self) -> B::Device {
        self.images.device()
    }
}

/// Indexed source of mini-batches for one data split.
pub trait BatchSource {
    /// Number of batches per epoch.
    fn num_batches(&self) -> usize;

    /// Called before each epoch, e.g. to reshuffle.
    fn on_epoch_start(&mut self, _epoch: usize) {}

    /// Materialize batch `index` on `device`.
    fn batch<B: Backend>(&self, index: usize, device: &B::Device) -> Result<KeypointBatch<B>>;
}
