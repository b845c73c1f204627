//! Image, heatmap and decoding configuration.

use burn::config::Config;
use kpda_core::{DecodeMethod, ImageSize, ResizePlan, TargetEncoder};

use super::ClothingType;

/// Per-category settings shared by training and inference.
#[derive(Config, Debug)]
pub struct KpdaConfig {
    /// Garment category the model is trained for.
    pub clothes: ClothingType,

    /// Side of the square network input canvas in pixels.
    #[config(default = 512)]
    pub img_max_size: u32,

    /// Heatmap stride in canvas pixels.
    #[config(default = 4)]
    pub hm_stride: u32,

    /// Gaussian sigma of training targets in heatmap cells.
    #[config(default = 1.0)]
    pub hm_sigma: f32,

    /// Per-channel RGB mean for normalization.
    #[config(default = "[0.485, 0.456, 0.406]")]
    pub mu: [f32; 3],

    /// Per-channel RGB standard deviation for normalization.
    #[config(default = "[0.229, 0.224, 0.225]")]
    pub sigma: [f32; 3],

    /// Peak localisation rule.
    #[config(default = "DecodeMethod::MaxOffset")]
    pub decode_method: DecodeMethod,

    /// Whether inference fuses predictions on the mirrored image.
    #[config(default = true)]
    pub flip_test: bool,
}

impl KpdaConfig {
    /// Heatmap side length.
    pub fn heatmap_size(&self) -> usize {
        (self.img_max_size / self.hm_stride.max(1)) as usize
    }

    /// Number of heatmap channels.
    pub fn num_keypoints(&self) -> usize {
        self.clothes.num_keypoints()
    }

    /// Letterbox plan for an image of the given size.
    pub fn resize_plan(&self, original: ImageSize) -> kpda_core::Result<ResizePlan> {
        ResizePlan::fit(original, self.img_max_size)
    }

    /// Gaussian target encoder for this heatmap geometry.
    pub fn target_encoder(&self) -> kpda_core::Result<TargetEncoder> {
        TargetEncoder::new(self.hm_stride, self.hm_sigma, self.heatmap_size())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.hm_stride == 0 {
            return Err("hm_stride must be positive".to_string());
        }
        if self.img_max_size == 0 || self.img_max_size % self.hm_stride != 0 {
            return Err("img_max_size must be a positive multiple of hm_stride".to_string());
        }
        if !(self.hm_sigma > 0.0) {
            return Err("hm_sigma must be positive".to_string());
        }
        if self.sigma.iter().any(|s| !(*s > 0.0)) {
            return Err("sigma entries must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KpdaConfig::new(ClothingType::Blouse);
        assert_eq!(config.img_max_size, 512);
        assert_eq!(config.hm_stride, 4);
        assert_eq!(config.heatmap_size(), 128);
        assert_eq!(config.num_keypoints(), 13);
        assert_eq!(config.decode_method, DecodeMethod::MaxOffset);
        assert!(config.flip_test);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let config = KpdaConfig::new(ClothingType::Skirt).with_img_max_size(510);
        assert!(config.validate().is_err());

        let config = KpdaConfig::new(ClothingType::Skirt).with_hm_stride(0);
        assert!(config.validate().is_err());

        let config = KpdaConfig::new(ClothingType::Skirt).with_hm_sigma(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = KpdaConfig::new(ClothingType::Trousers)
            .with_img_max_size(256)
            .with_decode_method(DecodeMethod::Max);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"trousers\""));
        assert!(json.contains("\"max\""));

        let parsed: KpdaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.clothes, ClothingType::Trousers);
        assert_eq!(parsed.img_max_size, 256);
        assert_eq!(parsed.decode_method, DecodeMethod::Max);
    }
}
