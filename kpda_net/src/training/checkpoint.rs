//! Checkpoint save/load for training resumption and inference.
//!
//! Model weights go through Burn's binary bytes recorder at full precision
//! and are stored as the opaque blob of a [`kpda_io::CheckpointRecord`].

use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::prelude::*;
use burn::record::{BinBytesRecorder, FullPrecisionSettings, Recorder};
use kpda_io::{CheckpointRecord, KpdaIoError};

use crate::config::ClothingType;
use crate::error::{KpdaNetError, Result};

type WeightRecorder = BinBytesRecorder<FullPrecisionSettings>;

/// Training progress restored from a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumeState {
    /// Epoch the checkpoint was taken after.
    pub epoch: usize,
    /// Stored learning rate, absent after an early stop.
    pub lr: Option<f64>,
    /// Best validation loss so far.
    pub best_loss: f64,
}

impl ResumeState {
    /// First epoch to run after resuming.
    pub fn next_epoch(&self) -> usize {
        self.epoch + 1
    }

    /// Learning rate to resume with.
    pub fn lr_or(&self, base_lr: f64) -> f64 {
        self.lr.unwrap_or(base_lr)
    }
}

/// Serialize module weights.
pub fn model_to_bytes<B: Backend, M: Module<B>>(model: M) -> Result<Vec<u8>> {
    let recorder = WeightRecorder::default();
    <WeightRecorder as Recorder<B>>::record(&recorder, model.into_record(), ())
        .map_err(|e| KpdaNetError::Recorder(e.to_string()))
}

/// Load serialized weights into `model`.
pub fn model_from_bytes<B: Backend, M: Module<B>>(
    model: M,
    bytes: Vec<u8>,
    device: &B::Device,
) -> Result<M> {
    let recorder = WeightRecorder::default();
    let record: M::Record = <WeightRecorder as Recorder<B>>::load(&recorder, bytes, device)
        .map_err(|e| KpdaNetError::Recorder(e.to_string()))?;
    Ok(model.load_record(record))
}

/// Save a checkpoint for `clothes` after `epoch` into `dir`.
///
/// Returns the path written.
pub fn save_training_checkpoint<B: Backend, M: Module<B>>(
    model: &M,
    dir: &Path,
    clothes: ClothingType,
    epoch: usize,
    lr: Option<f64>,
    best_loss: f64,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(KpdaIoError::from)?;

    let weights = model_to_bytes::<B, M>(model.clone())?;
    let record = CheckpointRecord::new(epoch, lr, best_loss, clothes.as_str(), weights);
    let path = kpda_io::checkpoint_path(dir, clothes.as_str(), epoch);
    kpda_io::save_to_file(&record, &path)?;

    log::info!(
        "Saved checkpoint to {:?} (epoch {}, best loss {:.4})",
        path,
        epoch,
        best_loss
    );
    Ok(path)
}

/// Load a checkpoint into `model`, checking it belongs to `clothes`.
pub fn load_training_checkpoint<B: Backend, M: Module<B>>(
    model: M,
    path: &Path,
    clothes: ClothingType,
    device: &B::Device,
) -> Result<(M, ResumeState)> {
    let record = kpda_io::load_from_file(path)?;
    if record.tag != clothes.as_str() {
        return Err(KpdaNetError::CheckpointTagMismatch {
            expected: clothes.as_str().to_string(),
            found: record.tag,
        });
    }

    let state = ResumeState {
        epoch: record.epoch,
        lr: record.lr,
        best_loss: record.best_loss,
    };
    let model = model_from_bytes::<B, M>(model, record.weights, device)?;

    log::info!(
        "Loaded checkpoint {:?} (epoch {}, best loss {:.4})",
        path,
        state.epoch,
        state.best_loss
    );
    Ok((model, state))
}
