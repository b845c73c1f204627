//! Error types for kpda_net.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while training or running the keypoint network.
#[derive(Error, Debug)]
pub enum KpdaNetError {
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(#[from] burn::config::ConfigError),

    /// Heatmap math failure.
    #[error("heatmap error: {0}")]
    Core(#[from] kpda_core::KpdaCoreError),

    /// Checkpoint or log I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] kpda_io::KpdaIoError),

    /// Image decode or encode failure.
    #[error("image error at {path:?}: {source}")]
    Image {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: image::ImageError,
    },

    /// Manifest could not be read or parsed.
    #[error("manifest error at {path:?}: {message}")]
    Manifest {
        /// Manifest file.
        path: PathBuf,
        /// Description of the error.
        message: String,
    },

    /// Model weights could not be recorded or restored.
    #[error("recorder error: {0}")]
    Recorder(String),

    /// Checkpoint belongs to another clothing category.
    #[error("checkpoint tag {found:?} does not match {expected:?}")]
    CheckpointTagMismatch {
        /// Category the run expects.
        expected: String,
        /// Category stored in the checkpoint.
        found: String,
    },

    /// A sample carries the wrong number of keypoints.
    #[error("sample {index} has {got} keypoints, expected {expected}")]
    KeypointCount {
        /// Sample index in the manifest.
        index: usize,
        /// Keypoints for the clothing category.
        expected: usize,
        /// Keypoints in the sample.
        got: usize,
    },

    /// A data source has no batches where at least one is required.
    #[error("{split} data source is empty")]
    EmptyDataSource {
        /// Which split.
        split: &'static str,
    },

    /// Batch index past the end of a data source.
    #[error("batch {index} out of range for {len} batches")]
    BatchOutOfRange {
        /// Requested batch.
        index: usize,
        /// Number of batches.
        len: usize,
    },

    /// Tensor shape mismatch.
    #[error("tensor shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// Tensor data could not be read back.
    #[error("tensor data error: {0}")]
    TensorData(String),
}

/// Result type for kpda_net operations.
pub type Result<T> = std::result::Result<T, KpdaNetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KpdaNetError::KeypointCount {
            index: 4,
            expected: 13,
            got: 12,
        };
        assert_eq!(err.to_string(), "sample 4 has 12 keypoints, expected 13");

        let err = KpdaNetError::EmptyDataSource { split: "validation" };
        assert_eq!(err.to_string(), "validation data source is empty");
    }

    #[test]
    fn test_from_core_and_io() {
        let err: KpdaNetError = kpda_core::KpdaCoreError::EmptyHeatmap.into();
        assert!(matches!(err, KpdaNetError::Core(_)));

        let err: KpdaNetError = kpda_io::KpdaIoError::Truncated { section: "tag" }.into();
        assert!(err.to_string().contains("tag"));
    }
}
