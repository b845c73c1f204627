//! Left/right conjugate keypoint permutation.
//!
//! Mirroring an image turns every left landmark into a right one. A
//! [`ConjugatePermutation`] records, for every keypoint slot, which slot its
//! mirrored prediction lands in. Construction rejects tables that are not an
//! involution, so a mis-specified pair list fails loudly instead of silently
//! swapping keypoints.

use alloc::vec::Vec;

use crate::error::{KpdaCoreError, Result};

/// A validated involutive permutation over keypoint indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConjugatePermutation {
    table: Vec<usize>,
}

impl ConjugatePermutation {
    /// Identity permutation over `len` keypoints.
    pub fn identity(len: usize) -> Self {
        Self {
            table: (0..len).collect(),
        }
    }

    /// Build a permutation from left/right index pairs.
    ///
    /// Indices not named in any pair map to themselves.
    ///
    /// # Errors
    /// - `ChannelOutOfRange` if an index is `>= len`
    /// - `SelfConjugate` if a pair names the same index twice
    /// - `DuplicateConjugate` if an index appears in more than one pair
    pub fn from_pairs(len: usize, pairs: &[(usize, usize)]) -> Result<Self> {
        let mut table: Vec<usize> = (0..len).collect();
        let mut paired = alloc::vec![false; len];

        for &(a, b) in pairs {
            for idx in [a, b] {
                if idx >= len {
                    return Err(KpdaCoreError::ChannelOutOfRange {
                        index: idx,
                        channels: len,
                    });
                }
            }
            if a == b {
                return Err(KpdaCoreError::SelfConjugate { index: a });
            }
            for idx in [a, b] {
                if paired[idx] {
                    return Err(KpdaCoreError::DuplicateConjugate { index: idx });
                }
                paired[idx] = true;
            }
            table[a] = b;
            table[b] = a;
        }

        Ok(Self { table })
    }

    /// Number of keypoint slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the permutation covers zero keypoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Slot whose value moves into `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn source(&self, index: usize) -> usize {
        self.table[index]
    }

    /// The raw lookup table.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.table
    }

    /// The distinct pairs, each reported once with the smaller index first.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.table
            .iter()
            .enumerate()
            .filter(|&(i, &j)| i < j)
            .map(|(i, &j)| (i, j))
            .collect()
    }

    /// Whether applying the permutation twice yields the identity.
    pub fn is_involution(&self) -> bool {
        self.table
            .iter()
            .enumerate()
            .all(|(i, &j)| j < self.table.len() && self.table[j] == i)
    }

    /// Reorder `values` so that `out[i] = values[source(i)]`.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if `values.len() != len()`.
    pub fn apply<T: Clone>(&self, values: &[T]) -> Result<Vec<T>> {
        if values.len() != self.table.len() {
            return Err(KpdaCoreError::LengthMismatch {
                expected: self.table.len(),
                got: values.len(),
            });
        }
        Ok(self.table.iter().map(|&src| values[src].clone()).collect())
    }
}
