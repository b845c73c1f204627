//! Training configuration types.

use burn::config::Config;

use crate::training::OptimizerConfig;

/// Configuration for the supervised training loop.
#[derive(Config, Debug)]
pub struct TrainingConfig {
    /// Last epoch to run (epochs are numbered from 1).
    #[config(default = 100)]
    pub epochs: usize,

    /// Samples per mini-batch.
    #[config(default = 8)]
    pub batch_size: usize,

    /// Learning rate for a fresh run.
    #[config(default = 1e-3)]
    pub base_lr: f64,

    /// Non-improving epochs before the learning rate is reduced.
    #[config(default = 3)]
    pub patience: usize,

    /// Multiplier applied on each reduction.
    #[config(default = 0.1)]
    pub factor: f64,

    /// Learning-rate floor as a fraction of the rate a run starts from.
    #[config(default = 0.01)]
    pub min_lr_ratio: f64,

    /// Save a checkpoint every this many epochs regardless of improvement.
    #[config(default = 10)]
    pub checkpoint_interval: usize,

    /// Probability of mirroring a training sample.
    #[config(default = 0.5)]
    pub flip_probability: f64,

    /// Seed for shuffling and augmentation.
    #[config(default = 42)]
    pub seed: u64,

    /// SGD settings.
    #[config(default = "OptimizerConfig::new()")]
    pub optimizer: OptimizerConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingConfig {
    /// Learning-rate floor for a run starting at `start_lr`.
    ///
    /// A fresh run starts at `base_lr`; a resumed run starts at the rate
    /// stored in its checkpoint.
    pub fn min_lr(&self, start_lr: f64) -> f64 {
        self.min_lr_ratio * start_lr
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.epochs == 0 {
            return Err("epochs must be positive".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be positive".to_string());
        }
        if !(self.base_lr > 0.0) {
            return Err("base_lr must be positive".to_string());
        }
        if self.patience == 0 {
            return Err("patience must be positive".to_string());
        }
        if !(self.factor > 0.0 && self.factor < 1.0) {
            return Err("factor must be in (0, 1)".to_string());
        }
        if !(self.min_lr_ratio > 0.0 && self.min_lr_ratio <= 1.0) {
            return Err("min_lr_ratio must be in (0, 1]".to_string());
        }
        if self.checkpoint_interval == 0 {
            return Err("checkpoint_interval must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.flip_probability) {
            return Err("flip_probability must be in [0, 1]".to_string());
        }
        self.optimizer.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_training_config() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.patience, 3);
        assert_eq!(config.checkpoint_interval, 10);
        assert!((config.min_lr(config.base_lr) - 1e-5).abs() < 1e-12);
        assert!((config.min_lr(1e-5) - 1e-7).abs() < 1e-18);
        assert!((config.optimizer.momentum - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainingConfig::default()
            .with_base_lr(1e-4)
            .with_epochs(5);

        assert_eq!(config.base_lr, 1e-4);
        assert_eq!(config.epochs, 5);
        assert!((config.min_lr(config.base_lr) - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn test_validate_rejects() {
        assert!(TrainingConfig::default().with_factor(1.0).validate().is_err());
        assert!(TrainingConfig::default().with_patience(0).validate().is_err());
        assert!(TrainingConfig::default()
            .with_flip_probability(1.5)
            .validate()
            .is_err());
    }
}
