//! Sparse vector representation keyed by vocabulary dimension.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{RankfuseError, Result};

/// A sparse vector: parallel `indices` / `values` sequences.
///
/// Invariants, checked by [`SparseVector::new`] and upheld by the extractor:
/// - `indices.len() == values.len()`
/// - `indices` is strictly ascending (hence duplicate free)
/// - every value is finite and `> 0`
///
/// Both fields are always plain sequences, whatever the number of entries.
/// A vector with a single surviving dimension is a pair of length-1 vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSparseVector")]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

/// Unvalidated wire form; deserialization goes through [`SparseVector::new`].
#[derive(Deserialize)]
struct RawSparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl TryFrom<RawSparseVector> for SparseVector {
    type Error = RankfuseError;

    fn try_from(raw: RawSparseVector) -> Result<Self> {
        SparseVector::new(raw.indices, raw.values)
    }
}

impl SparseVector {
    /// Create a sparse vector, validating its invariants.
    pub fn new(indices: Vec<u32>, values: Vec<f32>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(RankfuseError::shape_mismatch(format!(
                "sparse vector has {} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if let Some(pos) = indices.windows(2).position(|w| w[0] >= w[1]) {
            return Err(RankfuseError::shape_mismatch(format!(
                "sparse vector indices must be strictly ascending, found {} followed by {}",
                indices[pos],
                indices[pos + 1]
            )));
        }
        if let Some(pos) = values.iter().position(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(RankfuseError::shape_mismatch(format!(
                "sparse vector value for dimension {} must be finite and positive, got {}",
                indices[pos], values[pos]
            )));
        }
        Ok(Self { indices, values })
    }

    /// Build without validation. Callers must already satisfy the invariants.
    pub(crate) fn from_parts_unchecked(indices: Vec<u32>, values: Vec<f32>) -> Self {
        debug_assert_eq!(indices.len(), values.len());
        Self { indices, values }
    }

    /// The empty sparse vector.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Vocabulary dimension ids, ascending.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Weights, aligned with [`indices`](SparseVector::indices).
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of materialized dimensions.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no dimension survived.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(dimension, weight)` pairs in ascending dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Weight of `dimension`, if materialized.
    pub fn get(&self, dimension: u32) -> Option<f32> {
        self.indices
            .binary_search(&dimension)
            .ok()
            .map(|pos| self.values[pos])
    }

    /// Dot product with another sparse vector (merge join over sorted indices).
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}
