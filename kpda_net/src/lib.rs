//! # kpda_net
//!
//! Burn training and inference for clothing keypoint detection.
//!
//! This crate wires the heatmap math of kpda_core and the checkpoint format of
//! kpda_io into a trainable network and two command-line drivers.
//!
//! ## Features
//!
//! - **Configuration**: `KpdaConfig`, `TrainingConfig` and `BaselineNetConfig`,
//!   bundled as a JSON-loadable `ExperimentConfig`
//! - **Seams**: `KeypointNetwork`, `KeypointLoss` and `BatchSource` traits
//! - **Inference**: `Predictor` with flip-fusion and peak decoding
//! - **Training**: `Trainer` with SGD, a plateau learning-rate schedule,
//!   checkpointing and resume
//!
//! ## Quick Start
//!
//! ```ignore
//! use kpda_net::prelude::*;
//! use burn::backend::{Autodiff, NdArray};
//!
//! type MyBackend = Autodiff<NdArray>;
//!
//! let kpda = KpdaConfig::new(ClothingType::Blouse);
//! let training = TrainingConfig::new();
//! let device = Default::default();
//!
//! let model = BaselineNet::<MyBackend>::new(&BaselineNetConfig::new(), kpda.num_keypoints(), &device);
//! let mut train = ManifestDataset::train(Manifest::load(train_path)?, &kpda, &training)?;
//! let mut valid = ManifestDataset::validation(Manifest::load(val_path)?, &kpda, &training)?;
//!
//! let trainer = Trainer::with_default_loss(training, kpda.clothes, "checkpoints");
//! let report = trainer.fit(model, &mut train, &mut valid, None, &device)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! kpda_core (pure math)
//!     │
//!     ├──────────────────┐
//!     ▼                  ▼
//! kpda_io            kpda_net
//! (checkpoints)      (training, inference)
//!     │                  │
//!     └──────────────────┘
//!        .ckpt files / train log
//! ```
//!
//! ## Feature Flags
//!
//! - `wgpu`: GPU backend for the binaries (`--gpu` selects the adapter)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod data;
pub mod error;
pub mod inference;
pub mod loss;
pub mod nn;
pub mod training;

// Re-export key types for convenience
pub use config::{BaselineNetConfig, ClothingType, ExperimentConfig, KpdaConfig, TrainingConfig};
pub use error::{KpdaNetError, Result};
pub use inference::Predictor;
pub use nn::{BaselineNet, HeatmapPair, KeypointNetwork};
pub use training::{Trainer, TrainingReport};

pub use kpda_core::{DecodeMethod, ImageSize, Keypoint, Visibility};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{
        BaselineNetConfig, ClothingType, ExperimentConfig, KpdaConfig, TrainingConfig,
    };
    pub use crate::data::{
        load_rgb, preprocess, BatchSource, KeypointBatch, Manifest, ManifestDataset,
        ManifestSample,
    };
    pub use crate::error::{KpdaNetError, Result};
    pub use crate::inference::Predictor;
    pub use crate::loss::{KeypointLoss, LossOutput, VisibilityMseLoss};
    pub use crate::nn::{BaselineNet, HeatmapPair, KeypointNetwork};
    pub use crate::training::{
        load_training_checkpoint, save_training_checkpoint, EpochController, EpochDecision,
        OptimizerConfig, PlateauScheduler, ResumeState, Trainer, TrainingReport,
    };

    pub use kpda_core::{DecodeMethod, ImageSize, Keypoint, Visibility};
}
