//! Error types for the Rankfuse library.
//!
//! All failures are reported through the [`RankfuseError`] enum. Both core
//! components (sparse extraction and rank fusion) are stateless, so an error
//! never leaves anything half-updated: the caller simply gets the error back.
//!
//! # Examples
//!
//! ```
//! use rankfuse::error::{RankfuseError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(RankfuseError::invalid_config("k must be non-negative"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Rankfuse operations.
#[derive(Error, Debug)]
pub enum RankfuseError {
    /// Tensor, mask or sparse vector dimensions are inconsistent.
    #[error("Input shape mismatch: {0}")]
    InputShapeMismatch(String),

    /// A ranked list mentions the same id more than once.
    #[error("Duplicate rank entry: {0}")]
    DuplicateRankEntry(String),

    /// Configuration values out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure reported by a dense or sparse encoder.
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Failure reported by a vector store.
    #[error("Store error: {0}")]
    Store(String),

    /// I/O errors (reading inputs, vocabularies, config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Error with attached context, shown with its full cause chain.
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with RankfuseError.
pub type Result<T> = std::result::Result<T, RankfuseError>;

impl RankfuseError {
    /// Create a new shape mismatch error.
    pub fn shape_mismatch<S: Into<String>>(msg: S) -> Self {
        RankfuseError::InputShapeMismatch(msg.into())
    }

    /// Create a new duplicate rank entry error.
    pub fn duplicate_rank_entry<S: Into<String>>(msg: S) -> Self {
        RankfuseError::DuplicateRankEntry(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        RankfuseError::InvalidConfig(msg.into())
    }

    /// Create a new encoder error.
    pub fn encoder<S: Into<String>>(msg: S) -> Self {
        RankfuseError::Encoder(msg.into())
    }

    /// Create a new store error.
    pub fn store<S: Into<String>>(msg: S) -> Self {
        RankfuseError::Store(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        RankfuseError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
