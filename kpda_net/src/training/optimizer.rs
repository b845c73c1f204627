//! Optimizer configuration for keypoint training.
//!
//! Training uses Burn's SGD with classical momentum and L2 weight decay; the
//! learning rate is supplied per step by the plateau scheduler.

use burn::config::Config;
use burn::optim::decay::WeightDecayConfig;
use burn::optim::momentum::MomentumConfig;
use burn::optim::SgdConfig;

/// Configuration for the SGD optimizer.
#[derive(Config, Debug)]
pub struct OptimizerConfig {
    /// Momentum factor.
    #[config(default = 0.9)]
    pub momentum: f64,

    /// Dampening for momentum.
    #[config(default = 0.0)]
    pub dampening: f64,

    /// Weight decay (L2 regularization).
    #[config(default = 1e-4)]
    pub weight_decay: f32,

    /// Whether to use Nesterov momentum.
    #[config(default = false)]
    pub nesterov: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizerConfig {
    /// Burn SGD configuration with these settings.
    pub fn sgd(&self) -> SgdConfig {
        let momentum = (self.momentum > 0.0).then(|| {
            MomentumConfig::new()
                .with_momentum(self.momentum)
                .with_dampening(self.dampening)
                .with_nesterov(self.nesterov)
        });
        let weight_decay = (self.weight_decay > 0.0).then(|| WeightDecayConfig::new(self.weight_decay));

        SgdConfig::new()
            .with_momentum(momentum)
            .with_weight_decay(weight_decay)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.momentum) {
            return Err("momentum must be in [0, 1)".to_string());
        }
        if !(0.0..=1.0).contains(&self.dampening) {
            return Err("dampening must be in [0, 1]".to_string());
        }
        if !(self.weight_decay >= 0.0) {
            return Err("weight_decay must be non-negative".to_string());
        }
        if self.nesterov && (self.momentum == 0.0 || self.dampening != 0.0) {
            return Err("nesterov requires momentum and zero dampening".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::nn::{Initializer, Linear, LinearConfig};
    use burn::optim::{GradientsParams, Optimizer};
    use burn::tensor::Tensor;

    type TestBackend = Autodiff<NdArray>;

    /// Weight of a one-parameter model, starting at 1.0 with gradient 1.0,
    /// after `steps` updates at learning rate 0.1.
    fn weight_after(config: &OptimizerConfig, steps: usize) -> f32 {
        let device = Default::default();
        let mut model: Linear<TestBackend> = LinearConfig::new(1, 1)
            .with_bias(false)
            .with_initializer(Initializer::Ones)
            .init(&device);
        let mut optim = config.sgd().init::<TestBackend, Linear<TestBackend>>();

        for _ in 0..steps {
            let loss = model
                .forward(Tensor::<TestBackend, 2>::ones([1, 1], &device))
                .sum();
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(0.1, model, grads);
        }
        model.weight.val().into_data().to_vec::<f32>().unwrap()[0]
    }

    #[test]
    fn test_default_sgd() {
        let config = OptimizerConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.momentum - 0.9).abs() < 1e-12);
        assert_eq!(config.dampening, 0.0);
        assert!(!config.nesterov);
        assert!((config.weight_decay - 1e-4).abs() < 1e-9);

        // Velocity 1.0 then 0.9 * 1.0 + 1.0: 1.0 - 0.1 - 0.19.
        let w = weight_after(&config, 2);
        assert!((w - 0.71).abs() < 1e-3, "w = {w}");
    }

    #[test]
    fn test_zero_momentum_disables_it() {
        let config = OptimizerConfig::new()
            .with_momentum(0.0)
            .with_weight_decay(0.0);
        assert!(config.validate().is_ok());

        let w = weight_after(&config, 2);
        assert!((w - 0.8).abs() < 1e-6, "w = {w}");
    }

    #[test]
    fn test_weight_decay_adds_l2_gradient() {
        let config = OptimizerConfig::new()
            .with_momentum(0.0)
            .with_weight_decay(0.1);

        // Gradient 1.0 + 0.1 * 1.0.
        let w = weight_after(&config, 1);
        assert!((w - 0.89).abs() < 1e-6, "w = {w}");
    }

    #[test]
    fn test_nesterov_validation() {
        let config = OptimizerConfig::new().with_nesterov(true).with_dampening(0.5);
        assert!(config.validate().is_err());
        assert!(OptimizerConfig::new().with_nesterov(true).validate().is_ok());
    }
}
