//! Owned per-keypoint heatmap stack.
//!
//! Values are stored channel-major (`[channel][row][col]`), matching the
//! `K x H x W` slice a network emits for a single image.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{KpdaCoreError, Result};

/// A stack of `channels` heatmaps of `height x width` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmaps {
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl Heatmaps {
    /// Create an all-zero heatmap stack.
    pub fn zeros(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
            data: vec![0.0; channels * height * width],
        }
    }

    /// Wrap an existing channel-major buffer.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if `data.len() != channels * height * width`.
    pub fn from_vec(channels: usize, height: usize, width: usize, data: Vec<f32>) -> Result<Self> {
        let expected = channels * height * width;
        if data.len() != expected {
            return Err(KpdaCoreError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            channels,
            height,
            width,
            data,
        })
    }

    /// Number of keypoint channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Rows per channel.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns per channel.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// `(channels, height, width)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.channels, self.height, self.width)
    }

    /// Whether any dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels == 0 || self.height == 0 || self.width == 0
    }

    #[inline]
    fn index(&self, channel: usize, row: usize, col: usize) -> usize {
        (channel * self.height + row) * self.width + col
    }

    /// Value at `(channel, row, col)`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, channel: usize, row: usize, col: usize) -> f32 {
        self.data[self.index(channel, row, col)]
    }

    /// Set the value at `(channel, row, col)`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn set(&mut self, channel: usize, row: usize, col: usize, value: f32) {
        let idx = self.index(channel, row, col);
        self.data[idx] = value;
    }

    /// Row-major cells of one channel.
    pub fn channel(&self, channel: usize) -> Result<&[f32]> {
        if channel >= self.channels {
            return Err(KpdaCoreError::ChannelOutOfRange {
                index: channel,
                channels: self.channels,
            });
        }
        let plane = self.height * self.width;
        Ok(&self.data[channel * plane..(channel + 1) * plane])
    }

    /// Mutable row-major cells of one channel.
    pub fn channel_mut(&mut self, channel: usize) -> Result<&mut [f32]> {
        if channel >= self.channels {
            return Err(KpdaCoreError::ChannelOutOfRange {
                index: channel,
                channels: self.channels,
            });
        }
        let plane = self.height * self.width;
        Ok(&mut self.data[channel * plane..(channel + 1) * plane])
    }

    /// Clamp negative responses to zero in place.
    pub fn rectify(&mut self) {
        for v in &mut self.data {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
    }

    /// Pointwise sum with another stack of the same shape.
    pub fn add(&self, other: &Heatmaps) -> Result<Heatmaps> {
        if self.shape() != other.shape() {
            return Err(KpdaCoreError::ShapeMismatch {
                expected: self.shape(),
                got: other.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Heatmaps {
            channels: self.channels,
            height: self.height,
            width: self.width,
            data,
        })
    }

    /// Raw channel-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consume into the raw channel-major buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
