//! Supervised keypoint trainer.

use std::path::{Path, PathBuf};

use burn::module::AutodiffModule;
use burn::optim::{GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use kpda_io::{EpochLogEntry, KpdaIoError, PhaseSummary, TrainLog};

use crate::config::{ClothingType, TrainingConfig};
use crate::data::BatchSource;
use crate::error::{KpdaNetError, Result};
use crate::loss::{KeypointLoss, VisibilityMseLoss};
use crate::nn::KeypointNetwork;

use super::checkpoint::{save_training_checkpoint, ResumeState};
use super::controller::EpochController;
use super::metrics::LossAccumulator;

/// Result of a [`Trainer::fit`] run.
#[derive(Debug)]
pub struct TrainingReport<M> {
    /// Model after the last completed epoch.
    pub model: M,
    /// Last completed epoch, or the resumed epoch if none ran.
    pub last_epoch: usize,
    /// Best validation loss.
    pub best_loss: f64,
    /// Whether the plateau scheduler ended the run.
    pub early_stopped: bool,
    /// Checkpoints written, in order.
    pub checkpoints: Vec<PathBuf>,
}

/// Runs epochs of SGD with a plateau schedule, logging and checkpointing
/// into a save directory.
#[derive(Debug, Clone)]
pub struct Trainer<L = VisibilityMseLoss> {
    config: TrainingConfig,
    clothes: ClothingType,
    save_dir: PathBuf,
    loss: L,
}

impl Trainer<VisibilityMseLoss> {
    /// Trainer with the default visibility-masked loss.
    pub fn with_default_loss(
        config: TrainingConfig,
        clothes: ClothingType,
        save_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::new(config, clothes, save_dir, VisibilityMseLoss::new())
    }
}

impl<L: KeypointLoss> Trainer<L> {
    /// Create a new trainer.
    pub fn new(
        config: TrainingConfig,
        clothes: ClothingType,
        save_dir: impl Into<PathBuf>,
        loss: L,
    ) -> Self {
        Self {
            config,
            clothes,
            save_dir: save_dir.into(),
            loss,
        }
    }

    /// Get the training configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Directory receiving checkpoints and the training log.
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Path of the training log.
    pub fn log_path(&self) -> PathBuf {
        self.save_dir
            .join(kpda_io::train_log_file_name(self.clothes.as_str()))
    }

    /// Train `model` until the epoch budget runs out or the scheduler stops.
    ///
    /// With `resume`, training continues at the epoch after the checkpoint
    /// with its learning rate and best loss, and the log is appended to.
    /// `model` must already carry the checkpoint weights.
    pub fn fit<B, M, T, V>(
        &self,
        model: M,
        train: &mut T,
        valid: &mut V,
        resume: Option<ResumeState>,
        device: &B::Device,
    ) -> Result<TrainingReport<M>>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B> + KeypointNetwork<B>,
        M::InnerModule: KeypointNetwork<B::InnerBackend>,
        T: BatchSource,
        V: BatchSource,
    {
        self.config
            .validate()
            .map_err(|message| KpdaNetError::InvalidConfig { message })?;
        if valid.num_batches() == 0 {
            return Err(KpdaNetError::EmptyDataSource {
                split: "validation",
            });
        }
        if train.num_batches() == 0 {
            log::warn!("Training data source is empty; only validation will run");
        }

        let (start_epoch, lr, best_loss) = match resume {
            Some(state) => (
                state.next_epoch(),
                state.lr_or(self.config.base_lr),
                state.best_loss,
            ),
            None => (1, self.config.base_lr, f64::INFINITY),
        };
        if let Some(state) = resume {
            log::info!(
                "Resuming {} training at epoch {} (lr {:.7})",
                self.clothes,
                state.next_epoch(),
                lr
            );
        }

        std::fs::create_dir_all(&self.save_dir).map_err(KpdaIoError::from)?;
        let mut train_log = TrainLog::open(self.log_path(), resume.is_some())?;
        let mut controller = EpochController::new(&self.config, lr, best_loss);
        let mut optim = self.config.optimizer.sgd().init::<B, M>();

        let mut model = model;
        let mut last_epoch = start_epoch - 1;
        let mut early_stopped = false;
        let mut checkpoints = Vec::new();

        for epoch in start_epoch..=self.config.epochs {
            let lr = controller.lr();

            train.on_epoch_start(epoch);
            let mut train_losses = LossAccumulator::new();
            for index in 0..train.num_batches() {
                let batch = train.batch::<B>(index, device)?;
                let output = model.forward(batch.images);
                let losses = self
                    .loss
                    .compute(&batch.heatmaps, &output, &batch.visibility);
                let values = losses.values();
                log::debug!(
                    "epoch {} batch {}: loss {:.4} ({:.4} + {:.4})",
                    epoch,
                    index,
                    values[0],
                    values[1],
                    values[2]
                );

                let grads = losses.total.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optim.step(lr, model, grads);
                train_losses.push(values);
            }
            let train_summary = train_losses.summary();

            let validation_summary = self.validate::<B, M, V>(&model, valid, epoch, device)?;

            train_log.write_entry(&EpochLogEntry {
                epoch,
                lr,
                train: train_summary,
                validation: validation_summary,
            })?;

            let decision = controller.end_epoch(epoch, validation_summary.loss);
            last_epoch = epoch;

            if decision.save_checkpoint {
                let path = save_training_checkpoint::<B, M>(
                    &model,
                    &self.save_dir,
                    self.clothes,
                    epoch,
                    decision.next_lr,
                    decision.best_loss,
                )?;
                checkpoints.push(path);
            }

            if decision.stop() {
                log::info!("Training is early-stopped");
                early_stopped = true;
                break;
            }
        }

        Ok(TrainingReport {
            model,
            last_epoch,
            best_loss: controller.best_loss(),
            early_stopped,
            checkpoints,
        })
    }

    fn validate<B, M, V>(
        &self,
        model: &M,
        valid: &mut V,
        epoch: usize,
        device: &B::Device,
    ) -> Result<PhaseSummary>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        M::InnerModule: KeypointNetwork<B::InnerBackend>,
        V: BatchSource,
    {
        let model = model.valid();
        valid.on_epoch_start(epoch);

        let mut losses = LossAccumulator::new();
        for index in 0..valid.num_batches() {
            let batch = valid.batch::<B::InnerBackend>(index, device)?;
            let output = model.forward(batch.images);
            let values = self
                .loss
                .compute(&batch.heatmaps, &output, &batch.visibility)
                .values();
            losses.push(values);
        }
        Ok(losses.summary())
    }
}
