//! Predictor tests with a network whose heatmaps follow image brightness.

use burn::backend::NdArray;
use burn::module::Param;
use burn::nn::pool::{AvgPool2d, AvgPool2dConfig};
use burn::prelude::*;
use image::{Rgb, RgbImage};

use kpda_net::{
    ClothingType, HeatmapPair, KeypointNetwork, KpdaConfig, Predictor, Visibility,
};

type TestBackend = NdArray;

/// Every channel is the stride-4 mean of the red input channel.
#[derive(Module, Debug)]
struct BrightnessNet<B: Backend> {
    pool: AvgPool2d,
    gain: Param<Tensor<B, 1>>,
    channels: usize,
}

impl<B: Backend> BrightnessNet<B> {
    fn new(channels: usize, device: &B::Device) -> Self {
        Self {
            pool: AvgPool2dConfig::new([4, 4]).with_strides([4, 4]).init(),
            gain: Param::from_tensor(Tensor::ones([1], device)),
            channels,
        }
    }
}

impl<B: Backend> KeypointNetwork<B> for BrightnessNet<B> {
    fn forward(&self, images: Tensor<B, 4>) -> HeatmapPair<B> {
        let [n, _, h, w] = images.dims();
        let red = images.slice([0..n, 0..1, 0..h, 0..w]);
        let heat = self.pool.forward(red) * self.gain.val().reshape([1, 1, 1, 1]);
        let heat = Tensor::cat(vec![heat; self.channels], 1);
        HeatmapPair {
            global: heat.clone(),
            refine: heat,
        }
    }
}

fn config(flip_test: bool) -> KpdaConfig {
    KpdaConfig::new(ClothingType::Skirt)
        .with_img_max_size(32)
        .with_mu([0.5, 0.5, 0.5])
        .with_sigma([0.5, 0.5, 0.5])
        .with_flip_test(flip_test)
}

fn image_with_spot(width: u32, height: u32, x0: u32, y0: u32, size: u32) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            image.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    image
}

fn predictor(flip_test: bool) -> Predictor<TestBackend, BrightnessNet<TestBackend>> {
    let device = Default::default();
    let net = BrightnessNet::new(4, &device);
    Predictor::new(net, config(flip_test), device).unwrap()
}

#[test]
fn test_square_image_peak() {
    let image = image_with_spot(32, 32, 8, 16, 4);

    for flip_test in [false, true] {
        let keypoints = predictor(flip_test).predict(&image).unwrap();
        assert_eq!(keypoints.len(), 4);
        for kp in &keypoints {
            assert_eq!(kp.visibility, Visibility::Visible);
            assert!((kp.x - 10.0).abs() < 1e-4, "x = {}", kp.x);
            assert!((kp.y - 18.0).abs() < 1e-4, "y = {}", kp.y);
        }
    }
}

#[test]
fn test_flip_fusion_doubles_aligned_peak() {
    let image = image_with_spot(32, 32, 8, 16, 4);

    let (single, _) = predictor(false).heatmaps(&image).unwrap();
    let (fused, plan) = predictor(true).heatmaps(&image).unwrap();
    assert_eq!(plan.scale, 1.0);

    let peak = single.get(0, 4, 2);
    assert!(peak > 0.9);
    assert!((fused.get(0, 4, 2) - 2.0 * peak).abs() < 1e-4);
    assert_eq!(fused.get(0, 4, 5), 0.0);
}

#[test]
fn test_landscape_image_uses_valid_width() {
    // 64x32 is halved to 32x16; the mirrored heatmap is reversed over all 8
    // columns but only the top 4 rows hold image content.
    let image = image_with_spot(64, 32, 16, 8, 8);
    let keypoints = predictor(true).predict(&image).unwrap();

    for kp in keypoints {
        assert_eq!(kp.visibility, Visibility::Visible);
        assert!((kp.x - 20.0).abs() <= 2.5, "x = {}", kp.x);
        assert!((kp.y - 12.0).abs() <= 2.5, "y = {}", kp.y);
    }
}

#[test]
fn test_dark_image_falls_back_to_centre() {
    let image = RgbImage::new(40, 20);
    let keypoints = predictor(true).predict(&image).unwrap();

    for kp in keypoints {
        assert_eq!(kp.visibility, Visibility::Absent);
        assert_eq!((kp.x, kp.y), (20.0, 10.0));
    }
}

#[test]
fn test_keypoints_stay_in_bounds() {
    let image = image_with_spot(30, 50, 26, 46, 4);
    let keypoints = predictor(true).predict(&image).unwrap();
    for kp in keypoints {
        assert!(kp.x >= 0.0 && kp.x <= 29.0);
        assert!(kp.y >= 0.0 && kp.y <= 49.0);
    }
}
