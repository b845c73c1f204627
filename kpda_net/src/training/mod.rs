//! Training infrastructure for keypoint heatmap networks.
//!
//! This module provides:
//! - `Trainer`: the epoch loop with SGD, validation and logging
//! - `PlateauScheduler` and `EpochController`: learning-rate reduction,
//!   checkpoint policy and early stop
//! - Checkpoint save/load for training resumption
//! - Optimizer configuration and loss accumulation

mod checkpoint;
mod controller;
mod metrics;
mod optimizer;
mod scheduler;
mod trainer;

pub use checkpoint::{
    load_training_checkpoint, model_from_bytes, model_to_bytes, save_training_checkpoint,
    ResumeState,
};
pub use controller::{EpochController, EpochDecision};
pub use metrics::LossAccumulator;
pub use optimizer::OptimizerConfig;
pub use scheduler::PlateauScheduler;
pub use trainer::{Trainer, TrainingReport};
