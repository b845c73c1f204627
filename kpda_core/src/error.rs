//! Error types for kpda_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.

use core::fmt;

/// Error types that can occur during kpda_core operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KpdaCoreError {
    /// Heatmap dimensions do not match what the operation expects.
    ShapeMismatch {
        /// Expected (channels, height, width).
        expected: (usize, usize, usize),
        /// Actual (channels, height, width).
        got: (usize, usize, usize),
    },
    /// A buffer length does not match the declared heatmap shape.
    LengthMismatch {
        /// Number of values implied by the shape.
        expected: usize,
        /// Number of values provided.
        got: usize,
    },
    /// The heatmap has a zero-sized dimension.
    EmptyHeatmap,
    /// A channel index is outside the heatmap.
    ChannelOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of channels available.
        channels: usize,
    },
    /// A keypoint appears in a conjugate pair with itself.
    SelfConjugate {
        /// The offending index.
        index: usize,
    },
    /// A keypoint appears in more than one conjugate pair.
    DuplicateConjugate {
        /// The offending index.
        index: usize,
    },
    /// A numeric parameter is outside its valid domain.
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
    },
}

impl fmt::Display for KpdaCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpdaCoreError::ShapeMismatch { expected, got } => {
                write!(
                    f,
                    "heatmap shape mismatch: expected {}x{}x{}, got {}x{}x{}",
                    expected.0, expected.1, expected.2, got.0, got.1, got.2
                )
            }
            KpdaCoreError::LengthMismatch { expected, got } => {
                write!(f, "buffer holds {} values, shape requires {}", got, expected)
            }
            KpdaCoreError::EmptyHeatmap => write!(f, "heatmap has a zero-sized dimension"),
            KpdaCoreError::ChannelOutOfRange { index, channels } => {
                write!(f, "channel {} out of range for {} channels", index, channels)
            }
            KpdaCoreError::SelfConjugate { index } => {
                write!(f, "keypoint {} is paired with itself", index)
            }
            KpdaCoreError::DuplicateConjugate { index } => {
                write!(f, "keypoint {} appears in more than one conjugate pair", index)
            }
            KpdaCoreError::InvalidParameter { name } => {
                write!(f, "invalid parameter: {}", name)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KpdaCoreError {}

/// Result type alias for kpda_core operations.
pub type Result<T> = core::result::Result<T, KpdaCoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "std")]
    #[test]
    fn test_error_display() {
        use std::format;

        let err = KpdaCoreError::ShapeMismatch {
            expected: (4, 8, 8),
            got: (4, 8, 7),
        };
        assert_eq!(
            format!("{}", err),
            "heatmap shape mismatch: expected 4x8x8, got 4x8x7"
        );

        let err = KpdaCoreError::ChannelOutOfRange {
            index: 9,
            channels: 4,
        };
        assert_eq!(format!("{}", err), "channel 9 out of range for 4 channels");

        let err = KpdaCoreError::InvalidParameter { name: "stride" };
        assert_eq!(format!("{}", err), "invalid parameter: stride");
    }

    #[test]
    fn test_error_equality() {
        let err1 = KpdaCoreError::SelfConjugate { index: 3 };
        let err2 = KpdaCoreError::SelfConjugate { index: 3 };
        let err3 = KpdaCoreError::DuplicateConjugate { index: 3 };

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
