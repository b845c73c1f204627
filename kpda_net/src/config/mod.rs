//! Configuration types for kpda_net.
//!
//! Burn-style configuration structs for images and heatmaps, the network and
//! the training loop, plus the clothing category table.

mod clothing;
mod kpda;
mod network;
mod training;

use burn::config::Config;

pub use clothing::{ClothingType, ParseClothingTypeError};
pub use kpda::KpdaConfig;
pub use network::BaselineNetConfig;
pub use training::TrainingConfig;

use crate::error::KpdaNetError;

/// Everything a training or inference run needs, loadable from one JSON file.
#[derive(Config, Debug)]
pub struct ExperimentConfig {
    /// Image, heatmap and decoding settings.
    pub kpda: KpdaConfig,

    /// Network settings.
    #[config(default = "BaselineNetConfig::new()")]
    pub network: BaselineNetConfig,

    /// Training loop settings.
    #[config(default = "TrainingConfig::new()")]
    pub training: TrainingConfig,
}

impl ExperimentConfig {
    /// Validate every section, and check they agree on the heatmap stride.
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |message: String| KpdaNetError::InvalidConfig { message };
        self.kpda.validate().map_err(invalid)?;
        self.network.validate().map_err(invalid)?;
        self.training.validate().map_err(invalid)?;
        if self.network.stride != self.kpda.hm_stride {
            return Err(invalid(format!(
                "network stride {} differs from hm_stride {}",
                self.network.stride, self.kpda.hm_stride
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_experiment_is_valid() {
        let config = ExperimentConfig::new(KpdaConfig::new(ClothingType::Dress));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stride_disagreement() {
        let config = ExperimentConfig::new(KpdaConfig::new(ClothingType::Dress).with_hm_stride(8));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stride"));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("experiment.json");

        let config = ExperimentConfig::new(KpdaConfig::new(ClothingType::Skirt).with_img_max_size(256))
            .with_training(TrainingConfig::new().with_epochs(7));
        config.save(&path).unwrap();

        let loaded = ExperimentConfig::load(&path).unwrap();
        assert_eq!(loaded.kpda.clothes, ClothingType::Skirt);
        assert_eq!(loaded.kpda.img_max_size, 256);
        assert_eq!(loaded.training.epochs, 7);
        assert_eq!(loaded.network.channels, 32);
    }
}
