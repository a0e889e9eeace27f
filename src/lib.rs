//! # Rankfuse
//!
//! Building blocks for hybrid (dense + sparse) retrieval.
//!
//! ## Features
//!
//! - Sparse lexical vectors from masked-language-model importances
//!   (SPLADE-style rectification, masked max pooling, zero pruning)
//! - Reciprocal rank fusion of any number of ranked lists, with
//!   deterministic tie-breaking and optional per-list weights
//! - Encoder and vector store traits plus a hybrid searcher that fuses
//!   dense and sparse rankings
//! - A small CLI for extracting, fusing and inspecting vectors

pub mod cli;
pub mod error;
pub mod fusion;
pub mod hybrid;
pub mod sparse;

pub mod prelude {
    pub use crate::error::{RankfuseError, Result};
    pub use crate::fusion::config::FusionConfig;
    pub use crate::fusion::engine::{RankFusionEngine, reciprocal_rank_fusion};
    pub use crate::fusion::types::{FusedResult, PointId, RankedList, ScoredItem};
    pub use crate::sparse::extractor::{ExtractorConfig, SparseVectorExtractor};
    pub use crate::sparse::tensor::{ImportanceTensor, ValidityMask};
    pub use crate::sparse::vector::SparseVector;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
