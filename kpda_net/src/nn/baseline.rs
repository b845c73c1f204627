//! Shallow strided-convolution stand-in for a cascade pyramid network.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{PaddingConfig2d, Relu};
use burn::prelude::*;

use super::{HeatmapPair, KeypointNetwork};
use crate::config::BaselineNetConfig;

fn conv3x3<B: Backend>(c_in: usize, c_out: usize, stride: usize, device: &B::Device) -> Conv2d<B> {
    Conv2dConfig::new([c_in, c_out], [3, 3])
        .with_stride([stride, stride])
        .with_padding(PaddingConfig2d::Explicit(1, 1))
        .init(device)
}

fn conv1x1<B: Backend>(c_in: usize, c_out: usize, device: &B::Device) -> Conv2d<B> {
    Conv2dConfig::new([c_in, c_out], [1, 1]).init(device)
}

/// Two-stage heatmap network.
///
/// A stride-2 stem and a stride-2 down-sampling layer reach stride 4; a 1x1
/// head predicts the global heatmaps, and a refine block that sees both the
/// features and the global heatmaps predicts the refined ones.
#[derive(Module, Debug)]
pub struct BaselineNet<B: Backend> {
    stem: Conv2d<B>,
    down: Conv2d<B>,
    global_head: Conv2d<B>,
    refine: Conv2d<B>,
    refine_head: Conv2d<B>,
    activation: Relu,
}

impl<B: Backend> BaselineNet<B> {
    /// Create a new network predicting `num_keypoints` heatmaps.
    pub fn new(config: &BaselineNetConfig, num_keypoints: usize, device: &B::Device) -> Self {
        let c = config.channels;
        Self {
            stem: conv3x3(3, c, 2, device),
            down: conv3x3(c, c, 2, device),
            global_head: conv1x1(c, num_keypoints, device),
            refine: conv3x3(c + num_keypoints, c, 1, device),
            refine_head: conv1x1(c, num_keypoints, device),
            activation: Relu::new(),
        }
    }
}

impl<B: Backend> KeypointNetwork<B> for BaselineNet<B> {
    fn forward(&self, images: Tensor<B, 4>) -> HeatmapPair<B> {
        let x = self.activation.forward(self.stem.forward(images));
        let features = self.activation.forward(self.down.forward(x));

        let global = self.global_head.forward(features.clone());

        let joined = Tensor::cat(vec![features, global.clone()], 1);
        let refined = self.activation.forward(self.refine.forward(joined));
        let refine = self.refine_head.forward(refined);

        HeatmapPair { global, refine }
    }
}
