//! Reciprocal rank fusion of independently ranked result lists.
//!
//! Retrieval backends (dense similarity, sparse similarity, ...) each return
//! a [`RankedList`](types::RankedList) whose scores live on their own scale.
//! Fusion ignores those scores and combines rank positions only, producing
//! a single list of [`FusedResult`](types::FusedResult)s.
//!
//! # Example
//!
//! ```
//! use rankfuse::fusion::engine::RankFusionEngine;
//! use rankfuse::fusion::types::RankedList;
//!
//! let dense = RankedList::from_ids([1u64, 2, 3]);
//! let sparse = RankedList::from_ids([2u64, 3, 1]);
//!
//! let fused = RankFusionEngine::default().fuse(&[dense, sparse]).unwrap();
//! let order: Vec<u64> = fused.iter().map(|r| r.id).collect();
//! assert_eq!(order, vec![2, 1, 3]);
//! ```

pub mod config;
pub mod engine;
pub mod types;
