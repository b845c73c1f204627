//! Error types for kpda_io operations.

use core::fmt;

/// Errors that can occur while reading or writing checkpoints and logs.
#[derive(Debug, Clone, PartialEq)]
pub enum KpdaIoError {
    /// The file does not follow the checkpoint layout.
    InvalidFormat {
        /// Description of the format error.
        message: &'static str,
    },

    /// The file was written by an unknown format version.
    UnsupportedVersion {
        /// Version found in the header.
        found: u16,
        /// Highest version this reader understands.
        supported: u16,
    },

    /// The file ended before a section was complete.
    Truncated {
        /// Section being read.
        section: &'static str,
    },

    /// The tag does not fit the 16-bit length prefix.
    TagTooLong {
        /// Tag length in bytes.
        len: usize,
    },

    /// The epoch does not fit the 32-bit header field.
    EpochOutOfRange {
        /// Offending epoch.
        epoch: usize,
    },

    /// I/O error during serialization/deserialization.
    Io(String),
}

impl fmt::Display for KpdaIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpdaIoError::InvalidFormat { message } => {
                write!(f, "invalid checkpoint format: {}", message)
            }
            KpdaIoError::UnsupportedVersion { found, supported } => {
                write!(
                    f,
                    "unsupported checkpoint version {} (reader supports up to {})",
                    found, supported
                )
            }
            KpdaIoError::Truncated { section } => {
                write!(f, "checkpoint truncated while reading {}", section)
            }
            KpdaIoError::TagTooLong { len } => {
                write!(f, "checkpoint tag of {} bytes exceeds 65535", len)
            }
            KpdaIoError::EpochOutOfRange { epoch } => {
                write!(f, "epoch {} does not fit in a checkpoint header", epoch)
            }
            KpdaIoError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for KpdaIoError {}

impl From<std::io::Error> for KpdaIoError {
    fn from(err: std::io::Error) -> Self {
        KpdaIoError::Io(err.to_string())
    }
}

/// Result type alias for kpda_io operations.
pub type Result<T> = core::result::Result<T, KpdaIoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KpdaIoError::UnsupportedVersion {
            found: 7,
            supported: 1,
        };
        assert_eq!(
            format!("{}", err),
            "unsupported checkpoint version 7 (reader supports up to 1)"
        );

        let err = KpdaIoError::Truncated { section: "weights" };
        assert!(format!("{}", err).contains("weights"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: KpdaIoError = io.into();
        assert!(matches!(err, KpdaIoError::Io(ref m) if m.contains("missing")));
    }
}
