//! Hybrid retrieval: dense and sparse search fused into one ranking.
//!
//! The encoders and the vector store are external collaborators reached
//! through the traits in [`encoder`] and [`store`]. [`searcher`] wires them
//! to the sparse extractor and the rank fusion engine:
//!
//! ```text
//! text ─┬─ DenseEncoder ───────────────────────────┐
//!       └─ SparseEncoder ─ SparseVectorExtractor ──┴─ VectorStore ─ search ─ RankFusionEngine
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rankfuse::error::Result;
//! use rankfuse::hybrid::encoder::{DenseEncoder, SparseEncoder};
//! use rankfuse::hybrid::searcher::{HybridSearchConfig, HybridSearcher};
//! use rankfuse::hybrid::store::VectorStore;
//!
//! async fn example(
//!     dense: Arc<dyn DenseEncoder>,
//!     sparse: Arc<dyn SparseEncoder>,
//!     store: Arc<dyn VectorStore>,
//! ) -> Result<()> {
//!     let searcher = HybridSearcher::new(dense, sparse, store, HybridSearchConfig::default())?;
//!     searcher.create_index("sample").await?;
//!     searcher.index_texts("sample", &["Tamagoyaki is one of the egg dishes"]).await?;
//!
//!     let results = searcher.search("sample", "egg dishes", 10).await?;
//!     for hit in &results.fused {
//!         println!("{} {:.5}", hit.id, hit.fusion_score);
//!     }
//!
//!     searcher.delete_index("sample").await
//! }
//! ```

pub mod encoder;
pub mod searcher;
pub mod store;
