//! Encoder interfaces for the hybrid search pipeline.
//!
//! Models live outside this crate. A dense encoder maps text to a fixed-size
//! embedding; a sparse encoder exposes the raw per-token vocabulary
//! importances that [`SparseVectorExtractor`] pools into a sparse vector.
//!
//! [`SparseVectorExtractor`]: crate::sparse::extractor::SparseVectorExtractor
//!
//! # Custom implementation
//!
//! ```
//! use async_trait::async_trait;
//! use rankfuse::error::Result;
//! use rankfuse::hybrid::encoder::DenseEncoder;
//!
//! struct ConstantEncoder {
//!     dimension: usize,
//! }
//!
//! #[async_trait]
//! impl DenseEncoder for ConstantEncoder {
//!     async fn encode(&self, _text: &str) -> Result<Vec<f32>> {
//!         Ok(vec![1.0; self.dimension])
//!     }
//!
//!     fn dimension(&self) -> usize {
//!         self.dimension
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::sparse::tensor::{ImportanceTensor, ValidityMask};

/// Converts text into a dense embedding.
#[async_trait]
pub trait DenseEncoder: Send + Sync {
    /// Embed one text. Output length must equal [`dimension`](DenseEncoder::dimension).
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of every embedding this encoder produces.
    fn dimension(&self) -> usize;

    /// Embed many texts. The default calls [`encode`](DenseEncoder::encode)
    /// sequentially; override when the model batches natively.
    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.encode(text).await?);
        }
        Ok(results)
    }
}

/// Produces per-token vocabulary importances for a text.
#[async_trait]
pub trait SparseEncoder: Send + Sync {
    /// Return the importance tensor (one row per token, non-negative values)
    /// and the matching validity mask.
    async fn encode_logits(&self, text: &str) -> Result<(ImportanceTensor, ValidityMask)>;

    /// Vocabulary cardinality, i.e. the tensor's column count.
    fn vocab_size(&self) -> usize;
}
