//! Reciprocal rank fusion.
//!
//! Every list contributes `w / (k + r + 1)` to each item it ranks at 0-based
//! position `r` (`w` is the list weight, 1.0 unless configured). Items are
//! ordered by the sum of their contributions, descending, with ties broken by
//! ascending id.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use ahash::AHashMap;
use log::{debug, trace};

use crate::error::Result;
use crate::fusion::config::FusionConfig;
use crate::fusion::types::{FusedResult, RankedList};

/// Contribution of an item at 0-based `rank` under damping constant `k`.
#[inline]
pub fn rrf_contribution(k: f64, rank: usize) -> f64 {
    1.0 / (k + rank as f64 + 1.0)
}

/// Merges independently ranked lists into one consensus ranking.
#[derive(Debug, Clone, Default)]
pub struct RankFusionEngine {
    config: FusionConfig,
}

/// Per-item accumulation state.
struct Accumulator {
    ranks: Vec<Option<usize>>,
    contributions: Vec<f64>,
}

impl RankFusionEngine {
    /// Create an engine with a validated configuration.
    pub fn new(config: FusionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an unweighted engine with damping constant `k`.
    pub fn with_k(k: f64) -> Result<Self> {
        Self::new(FusionConfig::new().with_k(k))
    }

    /// The active configuration.
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuse `lists` into a single ranking.
    ///
    /// The full ranking is returned; slicing to a result count is up to the
    /// caller. No lists yields no results. A list containing the same id
    /// twice is rejected with `DuplicateRankEntry`.
    pub fn fuse<Id>(&self, lists: &[RankedList<Id>]) -> Result<Vec<FusedResult<Id>>>
    where
        Id: Clone + Eq + Hash + Ord + Debug,
    {
        self.config.check_list_count(lists.len())?;
        for list in lists {
            list.check_unique()?;
        }

        let k = self.config.k;
        let list_count = lists.len();
        let mut accumulators: AHashMap<&Id, Accumulator> = AHashMap::new();

        for (list_index, list) in lists.iter().enumerate() {
            let weight = self.config.weight(list_index);
            trace!(
                "fusing list {list_index}: {} items, weight {weight}",
                list.len()
            );

            for (rank, item) in list.iter() {
                let acc = accumulators.entry(&item.id).or_insert_with(|| Accumulator {
                    ranks: vec![None; list_count],
                    contributions: Vec::with_capacity(list_count),
                });
                acc.ranks[list_index] = Some(rank);
                acc.contributions.push(weight * rrf_contribution(k, rank));
            }
        }

        let mut results: Vec<FusedResult<Id>> = accumulators
            .into_iter()
            .filter_map(|(id, mut acc)| {
                // Summing in a fixed order makes the total independent of
                // the order the lists were passed in.
                acc.contributions.sort_by(f64::total_cmp);
                let fusion_score: f64 = acc.contributions.iter().sum();
                (fusion_score > 0.0).then(|| FusedResult {
                    id: id.clone(),
                    fusion_score,
                    ranks: acc.ranks,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.fusion_score
                .partial_cmp(&a.fusion_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        debug!(
            "fused {list_count} ranked lists into {} results (k = {k})",
            results.len()
        );

        Ok(results)
    }
}

/// Fuse `lists` with damping constant `k` and equal list weights.
pub fn reciprocal_rank_fusion<Id>(lists: &[RankedList<Id>], k: f64) -> Result<Vec<FusedResult<Id>>>
where
    Id: Clone + Eq + Hash + Ord + Debug,
{
    RankFusionEngine::with_k(k)?.fuse(lists)
}
