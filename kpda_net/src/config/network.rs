//! Neural network configuration types.

use burn::config::Config;

/// Configuration for the baseline two-stage heatmap network.
#[derive(Config, Debug)]
pub struct BaselineNetConfig {
    /// Feature channels in every hidden convolution.
    #[config(default = 32)]
    pub channels: usize,

    /// Output stride; the stem and one down-sampling layer give 4.
    #[config(default = 4)]
    pub stride: u32,
}

impl Default for BaselineNetConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BaselineNetConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.channels == 0 {
            return Err("channels must be positive".to_string());
        }
        if self.stride != 4 {
            return Err("the baseline network only produces stride-4 heatmaps".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_config() {
        let config = BaselineNetConfig::default();
        assert_eq!(config.channels, 32);
        assert!(config.validate().is_ok());
        assert!(config.with_stride(8).validate().is_err());
    }
}
