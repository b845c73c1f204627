//! Human-readable per-epoch training log.
//!
//! Each epoch appends a block of the form
//!
//! ```text
//! Epoch 001 (lr 0.0010000)
//! Train:      time 12.34 loss: 0.1234 loss1: 0.0617 loss2: 0.0617
//! Validation: time 1.23 loss: 0.1100 loss1: 0.0550 loss2: 0.0550
//!
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Wall time and mean losses for one pass over a data split.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseSummary {
    /// Wall-clock seconds spent in the pass.
    pub seconds: f64,
    /// Mean total loss.
    pub loss: f64,
    /// Mean global-stage loss.
    pub global_loss: f64,
    /// Mean refine-stage loss.
    pub refine_loss: f64,
}

impl PhaseSummary {
    fn format(&self, label: &str) -> String {
        format!(
            "{:<12}time {:3.2} loss: {:2.4} loss1: {:2.4} loss2: {:2.4}",
            label, self.seconds, self.loss, self.global_loss, self.refine_loss
        )
    }
}

/// One epoch's entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochLogEntry {
    /// Epoch number.
    pub epoch: usize,
    /// Learning rate used during the epoch.
    pub lr: f64,
    /// Training pass summary.
    pub train: PhaseSummary,
    /// Validation pass summary.
    pub validation: PhaseSummary,
}

impl EpochLogEntry {
    /// The lines of this entry, without the trailing blank line.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Epoch {:03} (lr {:.7})", self.epoch, self.lr),
            self.train.format("Train:"),
            self.validation.format("Validation:"),
        ]
    }
}

/// Append-only writer for the training log file.
#[derive(Debug)]
pub struct TrainLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TrainLog {
    /// Open the log, truncating it unless `append` is set.
    pub fn open<P: AsRef<Path>>(path: P, append: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one entry and flush it to disk; the same lines go to the log facade.
    pub fn write_entry(&mut self, entry: &EpochLogEntry) -> Result<()> {
        for line in entry.lines() {
            log::info!("{}", line);
            writeln!(self.writer, "{}", line)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(epoch: usize) -> EpochLogEntry {
        EpochLogEntry {
            epoch,
            lr: 1e-3,
            train: PhaseSummary {
                seconds: 12.3456,
                loss: 0.12346,
                global_loss: 0.0617,
                refine_loss: 0.0617,
            },
            validation: PhaseSummary {
                seconds: 1.234,
                loss: 0.11,
                global_loss: 0.055,
                refine_loss: 0.055,
            },
        }
    }

    #[test]
    fn test_entry_lines() {
        let lines = entry(1).lines();
        assert_eq!(lines[0], "Epoch 001 (lr 0.0010000)");
        assert_eq!(
            lines[1],
            "Train:      time 12.35 loss: 0.1235 loss1: 0.0617 loss2: 0.0617"
        );
        assert_eq!(
            lines[2],
            "Validation: time 1.23 loss: 0.1100 loss1: 0.0550 loss2: 0.0550"
        );
    }

    #[test]
    fn test_truncate_then_append() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");
        std::fs::write(&path, "stale\n").unwrap();

        {
            let mut log = TrainLog::open(&path, false).unwrap();
            log.write_entry(&entry(1)).unwrap();
        }
        {
            let mut log = TrainLog::open(&path, true).unwrap();
            log.write_entry(&entry(2)).unwrap();
        }

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.starts_with("Epoch 001"));
        assert!(text.contains("\n\nEpoch 002"));
        assert_eq!(text.lines().count(), 8);
    }
}
