//! Image loading and letterbox normalization.

use std::path::Path;

use burn::prelude::*;
use image::imageops::{self, FilterType};
use image::RgbImage;
use kpda_core::{ImageSize, ResizePlan};

use crate::config::KpdaConfig;
use crate::error::{KpdaNetError, Result};

/// A network-ready image and the plan that produced it.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Channel-first normalized pixels, `3 * canvas * canvas` values.
    pub data: Vec<f32>,
    /// Letterbox geometry.
    pub plan: ResizePlan,
}

/// Read an image file as RGB.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|source| KpdaNetError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Size of an image.
pub fn image_size(image: &RgbImage) -> ImageSize {
    ImageSize::new(image.width(), image.height())
}

/// Horizontally mirrored copy.
pub fn mirror(image: &RgbImage) -> RgbImage {
    imageops::flip_horizontal(image)
}

/// Resize so the larger side fills the canvas, place top-left on a zero
/// canvas and normalize per channel. Padding stays exactly zero.
pub fn preprocess(image: &RgbImage, config: &KpdaConfig) -> Result<PreparedImage> {
    let plan = config.resize_plan(image_size(image))?;
    let resized = imageops::resize(
        image,
        plan.resized.width,
        plan.resized.height,
        FilterType::CatmullRom,
    );

    let side = plan.canvas as usize;
    let plane = side * side;
    let mut data = vec![0.0f32; 3 * plane];
    for (x, y, pixel) in resized.enumerate_pixels() {
        let offset = y as usize * side + x as usize;
        for c in 0..3 {
            let v = pixel.0[c] as f32 / 255.0;
            data[c * plane + offset] = (v - config.mu[c]) / config.sigma[c];
        }
    }

    Ok(PreparedImage { data, plan })
}

/// Stack prepared images into a `[batch, 3, S, S]` tensor.
pub fn to_image_tensor<B: Backend>(
    images: &[&PreparedImage],
    canvas: usize,
    device: &B::Device,
) -> Result<Tensor<B, 4>> {
    let expected = 3 * canvas * canvas;
    let mut data = Vec::with_capacity(images.len() * expected);
    for image in images {
        if image.data.len() != expected {
            return Err(KpdaNetError::ShapeMismatch {
                expected: vec![3, canvas, canvas],
                got: vec![image.data.len()],
            });
        }
        data.extend_from_slice(&image.data);
    }
    Ok(Tensor::from_data(
        TensorData::new(data, [images.len(), 3, canvas, canvas]),
        device,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClothingType;
    use image::Rgb;

    fn config() -> KpdaConfig {
        KpdaConfig::new(ClothingType::Skirt)
            .with_img_max_size(16)
            .with_mu([0.5, 0.5, 0.5])
            .with_sigma([0.5, 0.5, 0.5])
    }

    #[test]
    fn test_padding_is_zero() {
        let image = RgbImage::from_pixel(8, 4, Rgb([255, 0, 255]));
        let prepared = preprocess(&image, &config()).unwrap();

        assert_eq!(prepared.plan.resized, ImageSize::new(16, 8));
        assert_eq!(prepared.data.len(), 3 * 16 * 16);

        // Row 0 is image, row 8 onward is padding.
        assert!((prepared.data[0] - 1.0).abs() < 1e-2);
        assert!((prepared.data[256] + 1.0).abs() < 1e-2);
        assert!(prepared.data[8 * 16..16 * 16].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mirror() {
        let mut image = RgbImage::new(3, 1);
        image.put_pixel(0, 0, Rgb([1, 2, 3]));
        let flipped = mirror(&image);
        assert_eq!(flipped.get_pixel(2, 0), &Rgb([1, 2, 3]));
        assert_eq!(image_size(&flipped), ImageSize::new(3, 1));
    }

    #[test]
    fn test_tensor_stacking() {
        let image = RgbImage::new(16, 16);
        let prepared = preprocess(&image, &config()).unwrap();
        let device = Default::default();
        let tensor =
            to_image_tensor::<burn::backend::NdArray>(&[&prepared, &prepared], 16, &device).unwrap();
        assert_eq!(tensor.dims(), [2, 3, 16, 16]);

        assert!(to_image_tensor::<burn::backend::NdArray>(&[&prepared], 8, &device).is_err());
    }
}
