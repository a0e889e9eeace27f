//! Ranked-list and fused-result types.

use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{RankfuseError, Result};

/// Identifier of a stored point.
///
/// Vector stores address points either by unsigned integer or by UUID
/// string. Ordering is total: every numeric id sorts before every string id,
/// numeric ids compare numerically and string ids lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    /// Numeric id.
    Num(u64),
    /// UUID (or any other string) id.
    Uuid(String),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{n}"),
            PointId::Uuid(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for PointId {
    fn from(id: u64) -> Self {
        PointId::Num(id)
    }
}

impl From<&str> for PointId {
    fn from(id: &str) -> Self {
        PointId::Uuid(id.to_string())
    }
}

impl From<String> for PointId {
    fn from(id: String) -> Self {
        PointId::Uuid(id)
    }
}

/// One entry of a ranked list.
///
/// `score` is whatever the producing backend reports; scores from different
/// backends are not comparable, which is why fusion only looks at positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem<Id = PointId> {
    pub id: Id,
    pub score: f32,
}

impl<Id> ScoredItem<Id> {
    pub fn new(id: Id, score: f32) -> Self {
        Self { id, score }
    }
}

/// Items ordered by descending relevance. Position 0 is rank 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedList<Id = PointId> {
    items: Vec<ScoredItem<Id>>,
}

impl<Id> Default for RankedList<Id> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<Id> RankedList<Id> {
    /// Wrap items that are already in rank order.
    pub fn new(items: Vec<ScoredItem<Id>>) -> Self {
        Self { items }
    }

    /// Build a list from ids in rank order, with synthetic descending scores.
    pub fn from_ids<I: IntoIterator<Item = Id>>(ids: I) -> Self {
        let ids: Vec<Id> = ids.into_iter().collect();
        let n = ids.len();
        let items = ids
            .into_iter()
            .enumerate()
            .map(|(rank, id)| ScoredItem::new(id, (n - rank) as f32))
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ScoredItem<Id>] {
        &self.items
    }

    /// Iterate as `(rank, item)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ScoredItem<Id>)> {
        self.items.iter().enumerate()
    }
}

impl<Id: Eq + std::hash::Hash + fmt::Debug> RankedList<Id> {
    /// Reject lists that mention the same id more than once.
    pub fn check_unique(&self) -> Result<()> {
        let mut seen: AHashMap<&Id, usize> = AHashMap::with_capacity(self.items.len());
        for (rank, item) in self.iter() {
            if let Some(first) = seen.insert(&item.id, rank) {
                return Err(RankfuseError::duplicate_rank_entry(format!(
                    "id {:?} appears at ranks {first} and {rank}",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// Rank of `id`, if present.
    pub fn rank_of(&self, id: &Id) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

impl<Id> From<Vec<ScoredItem<Id>>> for RankedList<Id> {
    fn from(items: Vec<ScoredItem<Id>>) -> Self {
        Self::new(items)
    }
}

impl<Id> FromIterator<ScoredItem<Id>> for RankedList<Id> {
    fn from_iter<T: IntoIterator<Item = ScoredItem<Id>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One entry of a fused ranking.
///
/// `fusion_score` only orders results within one fused output; it is not an
/// absolute relevance measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult<Id = PointId> {
    pub id: Id,
    pub fusion_score: f64,
    /// 0-based rank in each input list, `None` where the item is absent.
    pub ranks: Vec<Option<usize>>,
}
