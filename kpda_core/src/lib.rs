//! # kpda_core
//!
//! Dependency-light math for clothing keypoint detection.
//!
//! This crate holds everything that can be expressed without a tensor
//! library: heatmap peak decoding, left/right flip alignment, the conjugate
//! keypoint permutation, letterbox geometry, Gaussian target encoding and the
//! normalized error metric.
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables standard library support (`std::error::Error`)
//! - `serde`: Derives `Serialize`/`Deserialize` on the value types
//!
//! ## Modules
//!
//! - [`types`]: Value types (Point2, Keypoint, Visibility, ImageSize, DecodeMethod)
//! - [`heatmap`]: Channel-major heatmap stack
//! - [`conjugate`]: Validated left/right keypoint permutation
//! - [`resize`]: Letterbox plan shared by preprocessing and decoding
//! - [`decode`]: Peak localisation and pixel mapping
//! - [`flip`]: Mirrored heatmap alignment and keypoint mirroring
//! - [`encode`]: Gaussian training targets
//! - [`eval`]: Normalized error
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use kpda_core::prelude::*;
//!
//! let plan = ResizePlan::fit(ImageSize::new(640, 480), 512)?;
//! let params = DecodeParams::from_plan(&plan, 4, DecodeMethod::MaxOffset);
//!
//! let aligned = unflip_heatmaps(&mirrored, &perm, plan.valid_heatmap_width(4))?;
//! let fused = fuse_heatmaps(&original, &aligned)?;
//! let keypoints = decode_heatmaps(&fused, &params)?;
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod conjugate;
pub mod decode;
pub mod encode;
pub mod error;
pub mod eval;
pub mod flip;
pub mod heatmap;
pub mod resize;
pub mod types;

pub use conjugate::ConjugatePermutation;
pub use decode::{argmax, cell_to_pixel, decode_heatmaps, locate_peak, DecodeParams, PEAK_OFFSET};
pub use encode::{EncodedTargets, TargetEncoder};
pub use error::{KpdaCoreError, Result};
pub use eval::{normalized_error, ErrorAccumulator};
pub use flip::{flip_keypoints, fuse_heatmaps, unflip_heatmaps};
pub use heatmap::Heatmaps;
pub use resize::ResizePlan;
pub use types::{DecodeMethod, ImageSize, Keypoint, Point2, Visibility};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::conjugate::ConjugatePermutation;
    pub use crate::decode::{decode_heatmaps, DecodeParams};
    pub use crate::encode::{EncodedTargets, TargetEncoder};
    pub use crate::error::{KpdaCoreError, Result};
    pub use crate::eval::{normalized_error, ErrorAccumulator};
    pub use crate::flip::{flip_keypoints, fuse_heatmaps, unflip_heatmaps};
    pub use crate::heatmap::Heatmaps;
    pub use crate::resize::ResizePlan;
    pub use crate::types::{DecodeMethod, ImageSize, Keypoint, Point2, Visibility};
}
