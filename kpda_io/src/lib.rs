//! kpda_io - persistence for clothing keypoint detection training.
//!
//! This crate owns every on-disk artifact a training run leaves behind:
//!
//! - [`CheckpointRecord`]: epoch, learning rate, best validation loss, a tag
//!   and an opaque weight blob, stored in a small versioned binary format
//! - [`find_latest_checkpoint`]: discovery of the newest checkpoint for a tag
//! - [`TrainLog`]: the human-readable per-epoch log
//!
//! The weight blob is produced by whatever recorder the model crate uses;
//! this crate never interprets it.
//!
//! # Example
//!
//! ```ignore
//! use kpda_io::{checkpoint_path, save_to_file, CheckpointRecord};
//!
//! let record = CheckpointRecord::new(epoch, Some(lr), best, "blouse", weights);
//! save_to_file(&record, checkpoint_path(save_dir, "blouse", epoch))?;
//! ```

pub mod error;
pub mod format;
pub mod store;
pub mod train_log;

pub use error::{KpdaIoError, Result};
pub use format::{
    load_checkpoint, load_from_file, save_checkpoint, save_to_file, CheckpointHeader,
    CheckpointRecord, CHECKPOINT_MAGIC, CHECKPOINT_VERSION, HEADER_SIZE,
};
pub use store::{
    checkpoint_file_name, checkpoint_path, find_latest_checkpoint, parse_checkpoint_epoch,
    train_log_file_name,
};
pub use train_log::{EpochLogEntry, PhaseSummary, TrainLog};
