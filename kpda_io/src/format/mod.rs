//! Checkpoint file format support.
//!
//! # Example
//!
//! ```ignore
//! use kpda_io::{save_to_file, load_from_file, CheckpointRecord};
//!
//! let record = CheckpointRecord::new(10, Some(1e-3), 0.042, "blouse", weights);
//! save_to_file(&record, "kpt_blouse_010.ckpt")?;
//!
//! let loaded = load_from_file("kpt_blouse_010.ckpt")?;
//! assert_eq!(loaded.epoch, 10);
//! ```

pub mod checkpoint;
pub mod header;

pub use checkpoint::{load_checkpoint, load_from_file, save_checkpoint, save_to_file, CheckpointRecord};
pub use header::{CheckpointHeader, CHECKPOINT_MAGIC, CHECKPOINT_VERSION, FLAG_HAS_LR, HEADER_SIZE};
