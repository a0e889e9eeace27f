//! Token-by-vocabulary importance tensors and their validity masks.

use serde::{Deserialize, Serialize};

use crate::error::{RankfuseError, Result};

/// A rectangular array of importance scores.
///
/// One row per input token, one column per vocabulary dimension. Values are
/// stored row-major in a single buffer so a row is always a contiguous slice
/// of length [`cols`](ImportanceTensor::cols).
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceTensor {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ImportanceTensor {
    /// Create a tensor from a row-major buffer.
    ///
    /// Fails with [`RankfuseError::InputShapeMismatch`] when the buffer does
    /// not hold exactly `rows * cols` values.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            RankfuseError::shape_mismatch(format!("{rows} x {cols} tensor overflows usize"))
        })?;
        if data.len() != expected {
            return Err(RankfuseError::shape_mismatch(format!(
                "expected {rows} x {cols} = {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a tensor from nested rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map(|row| row.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(RankfuseError::shape_mismatch(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Create an all-zero tensor.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let len = rows
            .checked_mul(cols)
            .unwrap_or_else(|| panic!("{rows} x {cols} tensor overflows usize"));
        Self {
            rows,
            cols,
            data: vec![0.0; len],
        }
    }

    /// Number of token rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Vocabulary cardinality.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Mutably borrow row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over rows in token order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// The raw row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The raw row-major buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Set a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()` or `col >= self.cols()`.
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(
            col < self.cols,
            "column {col} out of range for {} columns",
            self.cols
        );
        self.row_mut(row)[col] = value;
    }
}

/// Per-token validity flags: `1` for a real token, `0` for padding.
///
/// Any non-zero flag marks the token as valid. Flags select rows; they never
/// scale them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidityMask(Vec<u32>);

impl ValidityMask {
    /// Create a mask from raw flags.
    pub fn new(flags: Vec<u32>) -> Self {
        Self(flags)
    }

    /// A mask marking `len` tokens as valid.
    pub fn all_valid(len: usize) -> Self {
        Self(vec![1; len])
    }

    /// Number of tokens covered by the mask.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mask covers no tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether token `i` is a real token.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn is_valid(&self, i: usize) -> bool {
        self.0[i] != 0
    }

    /// Number of tokens flagged as valid.
    pub fn valid_count(&self) -> usize {
        self.0.iter().filter(|&&flag| flag != 0).count()
    }

    /// The raw flags.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for ValidityMask {
    fn from(flags: Vec<u32>) -> Self {
        Self(flags)
    }
}
