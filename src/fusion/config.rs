//! Configuration for reciprocal rank fusion.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RankfuseError, Result};

/// Default RRF damping constant.
pub const DEFAULT_RRF_K: f64 = 60.0;

/// Configuration for [`RankFusionEngine`](crate::fusion::engine::RankFusionEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Damping constant added to every 1-based rank. Larger values flatten
    /// the difference between top and lower ranks.
    pub k: f64,

    /// Optional per-list weights, aligned with the lists passed to `fuse`.
    /// `None` weighs every list 1.0.
    pub weights: Option<Vec<f64>>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_RRF_K,
            weights: None,
        }
    }
}

impl FusionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the damping constant.
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Set per-list weights.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Weight applied to list `index`.
    pub fn weight(&self, index: usize) -> f64 {
        self.weights
            .as_ref()
            .and_then(|w| w.get(index).copied())
            .unwrap_or(1.0)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.k.is_finite() || self.k < 0.0 {
            return Err(RankfuseError::invalid_config(format!(
                "RRF constant k must be finite and non-negative, got {}",
                self.k
            )));
        }

        if let Some(weights) = &self.weights {
            if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(RankfuseError::invalid_config(format!(
                    "List weights must be finite and non-negative, got {bad}"
                )));
            }
        }

        Ok(())
    }

    /// Check that the weights, if any, cover exactly `list_count` lists.
    pub(crate) fn check_list_count(&self, list_count: usize) -> Result<()> {
        match &self.weights {
            Some(weights) if weights.len() != list_count => {
                Err(RankfuseError::invalid_config(format!(
                    "{} list weights configured but {list_count} ranked lists given",
                    weights.len()
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FusionConfig::default();
        assert_eq!(config.k, 60.0);
        assert_eq!(config.weight(0), 1.0);
        assert_eq!(config.weight(5), 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_k() {
        assert!(FusionConfig::new().with_k(0.0).validate().is_ok());
        assert!(FusionConfig::new().with_k(-1.0).validate().is_err());
        assert!(FusionConfig::new().with_k(f64::INFINITY).validate().is_err());
        assert!(FusionConfig::new().with_k(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_weights() {
        let config = FusionConfig::new().with_weights(vec![0.7, 0.3]);
        assert!(config.validate().is_ok());
        assert_eq!(config.weight(1), 0.3);

        assert!(
            FusionConfig::new()
                .with_weights(vec![1.0, -0.5])
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_check_list_count() {
        let config = FusionConfig::new().with_weights(vec![1.0, 2.0]);
        assert!(config.check_list_count(2).is_ok());
        assert!(config.check_list_count(3).is_err());
        assert!(FusionConfig::default().check_list_count(7).is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FusionConfig = serde_json::from_str(r#"{"weights": [2.0, 1.0]}"#).unwrap();
        assert_eq!(config.k, DEFAULT_RRF_K);
        assert_eq!(config.weights, Some(vec![2.0, 1.0]));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fusion.json");
        std::fs::write(&path, r#"{"k": 10.0}"#).unwrap();
        assert_eq!(FusionConfig::from_json_file(&path).unwrap().k, 10.0);

        std::fs::write(&path, r#"{"k": -10.0}"#).unwrap();
        assert!(FusionConfig::from_json_file(&path).is_err());
    }
}
