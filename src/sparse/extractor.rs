//! Max-pooling extraction of sparse vectors from importance tensors.
//!
//! The extractor collapses a `tokens x vocabulary` importance tensor into a
//! single [`SparseVector`]:
//!
//! 1. rows whose validity flag is 0 (padding tokens) are skipped;
//! 2. each vocabulary dimension takes the maximum over all token rows;
//! 3. only dimensions whose pooled value is strictly above the threshold
//!    (zero by default) are materialized, in ascending dimension order.
//!
//! # Example
//!
//! ```
//! use rankfuse::sparse::extractor::SparseVectorExtractor;
//! use rankfuse::sparse::tensor::{ImportanceTensor, ValidityMask};
//!
//! let tensor = ImportanceTensor::from_rows(vec![
//!     vec![0.0, 2.0, 0.0],
//!     vec![1.0, 0.0, 0.0],
//! ]).unwrap();
//! let mask = ValidityMask::from(vec![1, 1]);
//!
//! let vector = SparseVectorExtractor::default().extract(&tensor, &mask).unwrap();
//! assert_eq!(vector.indices(), &[0, 1]);
//! assert_eq!(vector.values(), &[1.0, 2.0]);
//! ```

use std::fs;
use std::path::Path;

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RankfuseError, Result};
use crate::sparse::tensor::{ImportanceTensor, ValidityMask};
use crate::sparse::vector::SparseVector;

/// Configuration for [`SparseVectorExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// A dimension survives when its pooled value is strictly greater than
    /// this. Must be finite and non-negative.
    pub threshold: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { threshold: 0.0 }
    }
}

impl ExtractorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the survival threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(RankfuseError::invalid_config(format!(
                "Extraction threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Converts per-token importance tensors into sparse vectors.
///
/// Holds nothing but its configuration, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SparseVectorExtractor {
    config: ExtractorConfig,
}

impl SparseVectorExtractor {
    /// Create an extractor with a validated configuration.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the sparse vector for one text.
    ///
    /// Fails with [`RankfuseError::InputShapeMismatch`] when the mask does not
    /// have exactly one entry per tensor row. An all-zero (or fully masked)
    /// tensor yields the empty vector.
    pub fn extract(&self, tensor: &ImportanceTensor, mask: &ValidityMask) -> Result<SparseVector> {
        if tensor.rows() != mask.len() {
            return Err(RankfuseError::shape_mismatch(format!(
                "importance tensor has {} rows but validity mask has {} entries",
                tensor.rows(),
                mask.len()
            )));
        }
        if u32::try_from(tensor.cols().saturating_sub(1)).is_err() {
            return Err(RankfuseError::shape_mismatch(format!(
                "vocabulary of {} dimensions does not fit u32 ids",
                tensor.cols()
            )));
        }

        // Starting from zero clamps negative inputs.
        let mut pooled = vec![0.0f32; tensor.cols()];
        let mut negatives = 0usize;
        let mut non_finite = 0usize;

        for (i, row) in tensor.iter_rows().enumerate() {
            if !mask.is_valid(i) {
                continue;
            }
            for (slot, &raw) in pooled.iter_mut().zip(row) {
                if !raw.is_finite() {
                    non_finite += 1;
                    continue;
                }
                if raw < 0.0 {
                    negatives += 1;
                    continue;
                }
                if raw > *slot {
                    *slot = raw;
                }
            }
        }

        if negatives > 0 {
            warn!("clamped {negatives} negative importance values to zero");
        }
        if non_finite > 0 {
            warn!("ignored {non_finite} non-finite importance values");
        }

        let threshold = self.config.threshold;
        let (indices, values): (Vec<u32>, Vec<f32>) = pooled
            .into_iter()
            .enumerate()
            .filter(|&(_, value)| value > threshold)
            .map(|(dim, value)| (dim as u32, value))
            .unzip();

        debug!(
            "extracted sparse vector: {} tokens ({} valid), {} dimensions, {} non-zero",
            tensor.rows(),
            mask.valid_count(),
            tensor.cols(),
            indices.len()
        );

        Ok(SparseVector::from_parts_unchecked(indices, values))
    }

    /// Extract sparse vectors for many texts in parallel.
    ///
    /// Output order follows input order. If any extraction fails, an error
    /// is returned and no vectors are.
    pub fn extract_batch(
        &self,
        inputs: &[(ImportanceTensor, ValidityMask)],
    ) -> Result<Vec<SparseVector>> {
        inputs
            .par_iter()
            .map(|(tensor, mask)| self.extract(tensor, mask))
            .collect()
    }
}

/// Extract with the default configuration.
pub fn extract(tensor: &ImportanceTensor, mask: &ValidityMask) -> Result<SparseVector> {
    SparseVectorExtractor::default().extract(tensor, mask)
}
