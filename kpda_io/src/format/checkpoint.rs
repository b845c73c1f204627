//! Checkpoint binary format read/write implementation.
//!
//! # File Layout
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │ HEADER (32 bytes)                                                  │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  0-3:   Magic "KPCK" (4 bytes)                                     │
//! │  4-5:   version (u16 LE)                                           │
//! │  6-7:   flags (u16 LE), bit 0 = learning rate present              │
//! │  8-11:  epoch (u32 LE)                                             │
//! │ 12-15:  reserved                                                   │
//! │ 16-23:  learning rate (f64 LE)                                     │
//! │ 24-31:  best validation loss (f64 LE)                              │
//! ├────────────────────────────────────────────────────────────────────┤
//! │ TAG                                                                │
//! │  u16 LE length, then UTF-8 bytes                                   │
//! ├────────────────────────────────────────────────────────────────────┤
//! │ WEIGHTS                                                            │
//! │  u64 LE length, then opaque recorder bytes                         │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use super::header::{CheckpointHeader, CHECKPOINT_VERSION, HEADER_SIZE};
use crate::error::{KpdaIoError, Result};

/// Everything needed to resume training or run inference.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointRecord {
    /// Epoch the checkpoint was taken after.
    pub epoch: usize,
    /// Learning rate for the next epoch; `None` after an early stop.
    pub lr: Option<f64>,
    /// Best validation loss seen so far.
    pub best_loss: f64,
    /// Free-form tag, the clothing category in practice.
    pub tag: String,
    /// Serialized model weights.
    pub weights: Vec<u8>,
}

impl CheckpointRecord {
    /// Create a new record.
    pub fn new(
        epoch: usize,
        lr: Option<f64>,
        best_loss: f64,
        tag: impl Into<String>,
        weights: Vec<u8>,
    ) -> Self {
        Self {
            epoch,
            lr,
            best_loss,
            tag: tag.into(),
            weights,
        }
    }
}

fn read_section<R: Read>(reader: &mut R, buf: &mut [u8], section: &'static str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            KpdaIoError::Truncated { section }
        } else {
            e.into()
        }
    })
}

/// Write a checkpoint to a writer.
///
/// # Errors
/// Returns `EpochOutOfRange` or `TagTooLong` if a field does not fit its
/// on-disk width, or `Io` if the writer fails.
pub fn save_checkpoint<W: Write>(record: &CheckpointRecord, writer: &mut W) -> Result<()> {
    let epoch = u32::try_from(record.epoch).map_err(|_| KpdaIoError::EpochOutOfRange {
        epoch: record.epoch,
    })?;
    let tag = record.tag.as_bytes();
    let tag_len =
        u16::try_from(tag.len()).map_err(|_| KpdaIoError::TagTooLong { len: tag.len() })?;

    let header = CheckpointHeader::new(epoch, record.lr, record.best_loss);
    writer.write_all(&header.to_bytes())?;

    writer.write_all(&tag_len.to_le_bytes())?;
    writer.write_all(tag)?;

    writer.write_all(&(record.weights.len() as u64).to_le_bytes())?;
    writer.write_all(&record.weights)?;

    Ok(())
}

/// Read a checkpoint from a reader.
///
/// # Errors
/// - `InvalidFormat` for bad magic bytes or a non-UTF-8 tag
/// - `UnsupportedVersion` for versions newer than this reader
/// - `Truncated` if the stream ends early
pub fn load_checkpoint<R: Read>(reader: &mut R) -> Result<CheckpointRecord> {
    let mut header_bytes = [0u8; HEADER_SIZE];
    read_section(reader, &mut header_bytes, "header")?;
    let header = CheckpointHeader::from_bytes(&header_bytes);

    if !header.is_valid() {
        return Err(KpdaIoError::InvalidFormat {
            message: "invalid magic bytes (expected KPCK)",
        });
    }
    if header.version == 0 || header.version > CHECKPOINT_VERSION {
        return Err(KpdaIoError::UnsupportedVersion {
            found: header.version,
            supported: CHECKPOINT_VERSION,
        });
    }

    let mut len_bytes = [0u8; 2];
    read_section(reader, &mut len_bytes, "tag length")?;
    let mut tag_bytes = vec![0u8; u16::from_le_bytes(len_bytes) as usize];
    read_section(reader, &mut tag_bytes, "tag")?;
    let tag = String::from_utf8(tag_bytes).map_err(|_| KpdaIoError::InvalidFormat {
        message: "tag is not valid UTF-8",
    })?;

    let mut len_bytes = [0u8; 8];
    read_section(reader, &mut len_bytes, "weights length")?;
    let weights_len = u64::from_le_bytes(len_bytes);

    // Bounded read so a corrupt length cannot trigger a huge allocation.
    let mut weights = Vec::new();
    reader.take(weights_len).read_to_end(&mut weights)?;
    if weights.len() as u64 != weights_len {
        return Err(KpdaIoError::Truncated { section: "weights" });
    }

    Ok(CheckpointRecord {
        epoch: header.epoch as usize,
        lr: header.learning_rate(),
        best_loss: header.best_loss,
        tag,
        weights,
    })
}

/// Save a checkpoint to a file path.
pub fn save_to_file<P: AsRef<Path>>(record: &CheckpointRecord, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    save_checkpoint(record, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Load a checkpoint from a file path.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<CheckpointRecord> {
    let mut reader = BufReader::new(File::open(path)?);
    load_checkpoint(&mut reader)
}
