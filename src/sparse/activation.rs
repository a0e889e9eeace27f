//! SPLADE-style rectification of masked-language-model logits.
//!
//! A sparse encoder emits one raw logit per (token, vocabulary entry). The
//! importance of a vocabulary entry for a token is `log(1 + relu(logit))`,
//! which is non-negative, zero for every non-positive logit, and grows only
//! logarithmically for large ones.

use crate::error::Result;
use crate::sparse::tensor::ImportanceTensor;

/// Apply `log(1 + relu(x))` to a single logit.
#[inline]
pub fn splade_weight(logit: f32) -> f32 {
    if logit > 0.0 { logit.ln_1p() } else { 0.0 }
}

/// Apply [`splade_weight`] to every value in place.
pub fn splade_activation(values: &mut [f32]) {
    for value in values.iter_mut() {
        *value = splade_weight(*value);
    }
}

impl ImportanceTensor {
    /// Build an importance tensor from raw logits, applying the SPLADE
    /// rectifier to every cell.
    pub fn from_logits(rows: usize, cols: usize, mut logits: Vec<f32>) -> Result<Self> {
        splade_activation(&mut logits);
        ImportanceTensor::new(rows, cols, logits)
    }

    /// Nested-row variant of [`ImportanceTensor::from_logits`].
    pub fn from_logit_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let mut tensor = ImportanceTensor::from_rows(rows)?;
        splade_activation(tensor.as_mut_slice());
        Ok(tensor)
    }
}
