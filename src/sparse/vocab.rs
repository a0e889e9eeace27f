//! Vocabulary lookups for inspecting sparse vectors.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{RankfuseError, Result};
use crate::sparse::vector::SparseVector;

/// A decoded sparse vector entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermWeight {
    /// Vocabulary dimension.
    pub id: u32,
    /// Token text for the dimension.
    pub token: String,
    /// Importance weight.
    pub weight: f32,
}

/// Dimension id to token text mapping.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tokens: HashMap<u32, String>,
}

impl Vocabulary {
    /// Build from a token -> id map, the layout tokenizers export.
    pub fn from_token_ids(vocab: HashMap<String, u32>) -> Result<Self> {
        let mut tokens = HashMap::with_capacity(vocab.len());
        for (token, id) in vocab {
            if let Some(previous) = tokens.insert(id, token) {
                return Err(RankfuseError::invalid_argument(format!(
                    "vocabulary id {id} is assigned to more than one token (e.g. {previous:?})"
                )));
            }
        }
        Ok(Self { tokens })
    }

    /// Load a JSON object mapping token strings to ids.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let vocab: HashMap<String, u32> = serde_json::from_str(&content)?;
        Self::from_token_ids(vocab)
    }

    /// Number of known tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token text for `id`.
    pub fn token(&self, id: u32) -> Option<&str> {
        self.tokens.get(&id).map(|s| s.as_str())
    }

    /// Decode a sparse vector into its terms, heaviest first.
    ///
    /// Equal weights are ordered by token text. Ids missing from the
    /// vocabulary render as `[UNK:<id>]`.
    pub fn decode(&self, vector: &SparseVector) -> Vec<TermWeight> {
        let mut terms: Vec<TermWeight> = vector
            .iter()
            .map(|(id, weight)| TermWeight {
                id,
                token: self
                    .token(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("[UNK:{id}]")),
                weight,
            })
            .collect();

        terms.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.token.cmp(&b.token))
        });
        terms
    }
}
