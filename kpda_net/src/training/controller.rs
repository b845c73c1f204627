//! Per-epoch decisions: next learning rate, checkpointing and early stop.

use super::scheduler::PlateauScheduler;
use crate::config::TrainingConfig;

/// Outcome of feeding one validation loss to the [`EpochController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochDecision {
    /// Rate for the next epoch; `None` means training stops.
    pub next_lr: Option<f64>,
    /// Whether the loss beat the previous best.
    pub improved: bool,
    /// Whether a checkpoint should be written for this epoch.
    pub save_checkpoint: bool,
    /// Best validation loss after this epoch.
    pub best_loss: f64,
}

impl EpochDecision {
    /// Whether the scheduler signalled a stop.
    pub fn stop(&self) -> bool {
        self.next_lr.is_none()
    }
}

/// Drives the plateau scheduler and the checkpoint policy.
#[derive(Debug, Clone)]
pub struct EpochController {
    scheduler: PlateauScheduler,
    checkpoint_interval: usize,
}

impl EpochController {
    /// Controller for a run starting at `lr` with the given best loss.
    ///
    /// The learning-rate floor is `min_lr_ratio * lr`.
    pub fn new(config: &TrainingConfig, lr: f64, best_loss: f64) -> Self {
        Self {
            scheduler: PlateauScheduler::new(
                lr,
                config.min_lr(lr),
                config.factor,
                config.patience,
                best_loss,
            ),
            checkpoint_interval: config.checkpoint_interval.max(1),
        }
    }

    /// Current learning rate.
    pub fn lr(&self) -> f64 {
        self.scheduler.lr()
    }

    /// Best validation loss so far.
    pub fn best_loss(&self) -> f64 {
        self.scheduler.best()
    }

    /// Record the validation loss of `epoch`.
    pub fn end_epoch(&mut self, epoch: usize, val_loss: f64) -> EpochDecision {
        let improved = val_loss < self.scheduler.best();
        let next_lr = self.scheduler.step(val_loss);
        let save_checkpoint =
            improved || epoch % self.checkpoint_interval == 0 || next_lr.is_none();

        EpochDecision {
            next_lr,
            improved,
            save_checkpoint,
            best_loss: self.scheduler.best(),
        }
    }
}
