//! Hybrid dense + sparse search over an external vector store.

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{RankfuseError, Result};
use crate::fusion::config::FusionConfig;
use crate::fusion::engine::RankFusionEngine;
use crate::fusion::types::{FusedResult, RankedList};
use crate::hybrid::encoder::{DenseEncoder, SparseEncoder};
use crate::hybrid::store::{Distance, IndexSchema, Point, SearchRequest, VectorData, VectorStore};
use crate::sparse::extractor::{ExtractorConfig, SparseVectorExtractor};
use crate::sparse::vector::SparseVector;

/// Configuration for [`HybridSearcher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridSearchConfig {
    /// Name of the dense vector space.
    pub dense_vector_name: String,
    /// Name of the sparse vector space.
    pub sparse_vector_name: String,
    /// Similarity used for the dense space.
    pub dense_distance: Distance,
    /// Rank fusion settings. Weights, when set, apply to `[dense, sparse]`.
    pub fusion: FusionConfig,
    /// Sparse extraction settings.
    pub extractor: ExtractorConfig,
}

impl Default for HybridSearchConfig {
    fn default() -> Self {
        Self {
            dense_vector_name: "dense".to_string(),
            sparse_vector_name: "sparse".to_string(),
            dense_distance: Distance::Cosine,
            fusion: FusionConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl HybridSearchConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dense_vector_name.is_empty() || self.sparse_vector_name.is_empty() {
            return Err(RankfuseError::invalid_config(
                "Vector space names must not be empty",
            ));
        }
        if self.dense_vector_name == self.sparse_vector_name {
            return Err(RankfuseError::invalid_config(format!(
                "Dense and sparse vector spaces share the name {:?}",
                self.dense_vector_name
            )));
        }
        self.fusion.validate()?;
        self.fusion.check_list_count(2)?;
        self.extractor.validate()
    }
}

/// Per-modality and fused results of one hybrid query.
#[derive(Debug, Clone, Serialize)]
pub struct HybridSearchResults {
    pub dense: RankedList,
    pub sparse: RankedList,
    pub fused: Vec<FusedResult>,
}

/// Indexes texts with both encoders and answers queries by fusing the dense
/// and sparse rankings.
pub struct HybridSearcher {
    dense_encoder: Arc<dyn DenseEncoder>,
    sparse_encoder: Arc<dyn SparseEncoder>,
    store: Arc<dyn VectorStore>,
    extractor: SparseVectorExtractor,
    fusion: RankFusionEngine,
    config: HybridSearchConfig,
}

impl HybridSearcher {
    /// Create a searcher from its collaborators.
    pub fn new(
        dense_encoder: Arc<dyn DenseEncoder>,
        sparse_encoder: Arc<dyn SparseEncoder>,
        store: Arc<dyn VectorStore>,
        config: HybridSearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dense_encoder,
            sparse_encoder,
            store,
            extractor: SparseVectorExtractor::new(config.extractor)?,
            fusion: RankFusionEngine::new(config.fusion.clone())?,
            config,
        })
    }

    pub fn config(&self) -> &HybridSearchConfig {
        &self.config
    }

    /// The schema this searcher writes: one dense and one sparse space.
    pub fn schema(&self) -> IndexSchema {
        IndexSchema::new()
            .with_dense(
                self.config.dense_vector_name.clone(),
                self.dense_encoder.dimension(),
                self.config.dense_distance,
            )
            .with_sparse(self.config.sparse_vector_name.clone())
    }

    /// Create `collection` in the store.
    pub async fn create_index(&self, collection: &str) -> Result<()> {
        let schema = self.schema();
        schema.validate()?;
        self.store.create_index(collection, &schema).await?;
        info!("index created: {collection}");
        Ok(())
    }

    /// Drop `collection` from the store.
    pub async fn delete_index(&self, collection: &str) -> Result<()> {
        self.store.delete_index(collection).await?;
        info!("index deleted: {collection}");
        Ok(())
    }

    /// Sparse vector for `text`, checked against the encoder's vocabulary size.
    pub async fn sparse_vector(&self, text: &str) -> Result<SparseVector> {
        let (tensor, mask) = self.sparse_encoder.encode_logits(text).await?;
        let expected = self.sparse_encoder.vocab_size();
        if tensor.cols() != expected {
            return Err(RankfuseError::shape_mismatch(format!(
                "sparse encoder returned {} vocabulary columns, expected {expected}",
                tensor.cols()
            )));
        }
        self.extractor.extract(&tensor, &mask)
    }

    /// Dense vector for `text`, checked against the encoder's dimension.
    pub async fn dense_vector(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.dense_encoder.encode(text).await?;
        self.check_dense_dimension(&vector)?;
        Ok(vector)
    }

    fn check_dense_dimension(&self, vector: &[f32]) -> Result<()> {
        let expected = self.dense_encoder.dimension();
        if vector.len() != expected {
            return Err(RankfuseError::encoder(format!(
                "dense encoder returned {} dimensions, expected {expected}",
                vector.len()
            )));
        }
        Ok(())
    }

    /// Encode and upsert `texts`. Point ids are the texts' positions.
    ///
    /// Dense embeddings are requested in one batch.
    pub async fn index_texts(&self, collection: &str, texts: &[&str]) -> Result<usize> {
        let dense_vectors = self.dense_encoder.encode_batch(texts).await?;
        if dense_vectors.len() != texts.len() {
            return Err(RankfuseError::encoder(format!(
                "dense encoder returned {} embeddings for {} texts",
                dense_vectors.len(),
                texts.len()
            )));
        }

        let mut points = Vec::with_capacity(texts.len());
        for (position, (text, dense)) in texts.iter().zip(dense_vectors).enumerate() {
            self.check_dense_dimension(&dense)?;
            let sparse = self.sparse_vector(text).await?;
            debug!(
                "point {position}: {} dense dims, {} sparse dims",
                dense.len(),
                sparse.len()
            );
            points.push(
                Point::new(position as u64)
                    .with_vector(
                        self.config.dense_vector_name.clone(),
                        VectorData::Dense(dense),
                    )
                    .with_vector(
                        self.config.sparse_vector_name.clone(),
                        VectorData::Sparse(sparse),
                    ),
            );
        }

        let count = points.len();
        if count > 0 {
            self.store.upsert(collection, points).await?;
        }
        info!("data inserted: {count}");
        Ok(count)
    }

    /// Run a dense and a sparse search for `query` and fuse them.
    ///
    /// Each backend is asked for `top_n` hits; the fused ranking is cut to
    /// `top_n` as well.
    pub async fn search(
        &self,
        collection: &str,
        query: &str,
        top_n: usize,
    ) -> Result<HybridSearchResults> {
        let dense_query = self.dense_vector(query).await?;
        let sparse_query = self.sparse_vector(query).await?;

        let requests = [
            SearchRequest::new(
                self.config.dense_vector_name.clone(),
                VectorData::Dense(dense_query),
                top_n,
            ),
            SearchRequest::new(
                self.config.sparse_vector_name.clone(),
                VectorData::Sparse(sparse_query),
                top_n,
            ),
        ];

        let mut lists = self.store.search(collection, &requests).await?;
        if lists.len() != requests.len() {
            return Err(RankfuseError::store(format!(
                "expected {} result lists, store returned {}",
                requests.len(),
                lists.len()
            )));
        }

        let mut fused = self.fusion.fuse(&lists)?;
        fused.truncate(top_n);

        let sparse = lists.pop().unwrap_or_default();
        let dense = lists.pop().unwrap_or_default();
        debug!(
            "query {query:?}: {} dense hits, {} sparse hits, {} fused",
            dense.len(),
            sparse.len(),
            fused.len()
        );

        Ok(HybridSearchResults {
            dense,
            sparse,
            fused,
        })
    }
}
