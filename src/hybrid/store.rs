//! Vector store interface.
//!
//! The store owns indexing, persistence and similarity search. The hybrid
//! searcher only needs to create and drop a collection, upsert points
//! carrying named dense and sparse vectors, and run one search per named
//! vector space.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{RankfuseError, Result};
use crate::fusion::types::{PointId, RankedList};
use crate::sparse::vector::SparseVector;

/// Similarity function of a dense vector space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Cosine,
    Dot,
    Euclid,
}

/// Parameters of one named dense vector space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSpaceParams {
    pub size: usize,
    pub distance: Distance,
}

/// Layout of a collection: named dense spaces and named sparse spaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSchema {
    pub dense: BTreeMap<String, DenseSpaceParams>,
    pub sparse: BTreeSet<String>,
}

impl IndexSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dense vector space.
    pub fn with_dense<S: Into<String>>(mut self, name: S, size: usize, distance: Distance) -> Self {
        self.dense
            .insert(name.into(), DenseSpaceParams { size, distance });
        self
    }

    /// Add a sparse vector space.
    pub fn with_sparse<S: Into<String>>(mut self, name: S) -> Self {
        self.sparse.insert(name.into());
        self
    }

    /// Check that no name is used twice and every dense space has a size.
    pub fn validate(&self) -> Result<()> {
        if self.dense.is_empty() && self.sparse.is_empty() {
            return Err(RankfuseError::invalid_config(
                "Schema must declare at least one vector space",
            ));
        }
        if let Some(name) = self.sparse.iter().find(|name| self.dense.contains_key(*name)) {
            return Err(RankfuseError::invalid_config(format!(
                "Vector space {name:?} is declared both dense and sparse"
            )));
        }
        if let Some((name, _)) = self.dense.iter().find(|(_, params)| params.size == 0) {
            return Err(RankfuseError::invalid_config(format!(
                "Dense vector space {name:?} must have a non-zero size"
            )));
        }
        Ok(())
    }
}

/// A vector in one named space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VectorData {
    Dense(Vec<f32>),
    Sparse(SparseVector),
}

/// A stored point: id, free-form payload and its named vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    #[serde(default)]
    pub payload: HashMap<String, serde_json::Value>,
    pub vectors: HashMap<String, VectorData>,
}

impl Point {
    pub fn new<I: Into<PointId>>(id: I) -> Self {
        Self {
            id: id.into(),
            payload: HashMap::new(),
            vectors: HashMap::new(),
        }
    }

    /// Attach a vector under `name`.
    pub fn with_vector<S: Into<String>>(mut self, name: S, vector: VectorData) -> Self {
        self.vectors.insert(name.into(), vector);
        self
    }

    /// Attach a payload field.
    pub fn with_payload<S: Into<String>>(mut self, key: S, value: serde_json::Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}

/// A query against one named vector space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub name: String,
    pub vector: VectorData,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new<S: Into<String>>(name: S, vector: VectorData, limit: usize) -> Self {
        Self {
            name: name.into(),
            vector,
            limit,
        }
    }
}

/// A vector database holding named collections.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create `collection` with the given layout.
    async fn create_index(&self, collection: &str, schema: &IndexSchema) -> Result<()>;

    /// Insert or replace points.
    async fn upsert(&self, collection: &str, points: Vec<Point>) -> Result<()>;

    /// Run every request and return one ranked list per request, in request
    /// order, each sorted by descending relevance.
    async fn search(&self, collection: &str, requests: &[SearchRequest])
    -> Result<Vec<RankedList>>;

    /// Drop `collection` and everything in it.
    async fn delete_index(&self, collection: &str) -> Result<()>;
}
