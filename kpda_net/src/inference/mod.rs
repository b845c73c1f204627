//! Keypoint prediction with optional flip-fusion.
//!
//! The model runs on the letterboxed image and, when `flip_test` is set, on
//! its mirror in the same batch. The mirrored heatmaps are aligned back
//! (row reversal over the valid width plus the conjugate channel swap),
//! summed with the original ones and decoded.

use burn::prelude::*;
use image::RgbImage;
use kpda_core::{
    decode_heatmaps, fuse_heatmaps, unflip_heatmaps, ConjugatePermutation, DecodeParams, Heatmaps,
    Keypoint, ResizePlan,
};

use crate::config::KpdaConfig;
use crate::data::{mirror, preprocess, to_image_tensor};
use crate::error::{KpdaNetError, Result};
use crate::nn::KeypointNetwork;

/// Copy sample `index` of a `[batch, K, H, W]` tensor into host heatmaps.
pub fn tensor_to_heatmaps<B: Backend>(tensor: &Tensor<B, 4>, index: usize) -> Result<Heatmaps> {
    let [batch, channels, height, width] = tensor.dims();
    if index >= batch {
        return Err(KpdaNetError::BatchOutOfRange { index, len: batch });
    }
    let data = tensor
        .clone()
        .slice([index..index + 1])
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| KpdaNetError::TensorData(format!("{e:?}")))?;
    Ok(Heatmaps::from_vec(channels, height, width, data)?)
}

/// Keypoint predictor for one clothing category.
#[derive(Debug)]
pub struct Predictor<B: Backend, M> {
    model: M,
    config: KpdaConfig,
    permutation: ConjugatePermutation,
    device: B::Device,
}

impl<B: Backend, M: KeypointNetwork<B>> Predictor<B, M> {
    /// Create a predictor around a trained model.
    pub fn new(model: M, config: KpdaConfig, device: B::Device) -> Result<Self> {
        config
            .validate()
            .map_err(|message| KpdaNetError::InvalidConfig { message })?;
        let permutation = config.clothes.conjugate_permutation()?;
        Ok(Self {
            model,
            config,
            permutation,
            device,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &KpdaConfig {
        &self.config
    }

    /// Rectified (and, with `flip_test`, fused) heatmaps for `image`, with the
    /// resize plan needed to decode them.
    pub fn heatmaps(&self, image: &RgbImage) -> Result<(Heatmaps, ResizePlan)> {
        let original = preprocess(image, &self.config)?;
        let plan = original.plan;
        let canvas = self.config.img_max_size as usize;

        if !self.config.flip_test {
            let input = to_image_tensor::<B>(&[&original], canvas, &self.device)?;
            let refine = self.model.forward(input).refine;
            let mut heatmaps = tensor_to_heatmaps(&refine, 0)?;
            heatmaps.rectify();
            return Ok((heatmaps, plan));
        }

        let mirrored = preprocess(&mirror(image), &self.config)?;
        let input = to_image_tensor::<B>(&[&original, &mirrored], canvas, &self.device)?;
        let refine = self.model.forward(input).refine;

        let mut heatmaps = tensor_to_heatmaps(&refine, 0)?;
        heatmaps.rectify();
        let mut flipped = tensor_to_heatmaps(&refine, 1)?;
        flipped.rectify();

        let aligned = unflip_heatmaps(
            &flipped,
            &self.permutation,
            plan.valid_heatmap_width(self.config.hm_stride),
        )?;
        Ok((fuse_heatmaps(&heatmaps, &aligned)?, plan))
    }

    /// Predict one keypoint per channel in original-image pixels.
    pub fn predict(&self, image: &RgbImage) -> Result<Vec<Keypoint>> {
        let (heatmaps, plan) = self.heatmaps(image)?;
        if heatmaps.channels() != self.config.num_keypoints() {
            return Err(KpdaNetError::ShapeMismatch {
                expected: vec![self.config.num_keypoints()],
                got: vec![heatmaps.channels()],
            });
        }
        let params = DecodeParams::from_plan(&plan, self.config.hm_stride, self.config.decode_method);
        Ok(decode_heatmaps(&heatmaps, &params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_tensor_to_heatmaps_picks_sample() {
        let device = Default::default();
        let data: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let tensor = Tensor::<TestBackend, 4>::from_data(TensorData::new(data, [2, 2, 2, 2]), &device);

        let hm = tensor_to_heatmaps(&tensor, 1).unwrap();
        assert_eq!(hm.shape(), (2, 2, 2));
        assert_eq!(hm.get(0, 0, 0), 8.0);
        assert_eq!(hm.get(1, 1, 1), 15.0);

        assert!(tensor_to_heatmaps(&tensor, 2).is_err());
    }
}
