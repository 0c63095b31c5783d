// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TraversalError};
use crate::mode::ExecutionMode;
use crate::process::MatchAlgorithmKind;

/// Default capacity of barriers inserted by the lazy barrier strategy
pub const DEFAULT_MAX_BARRIER_SIZE: usize = 10_000;

/// Default number of expansion steps a traversal needs before barriers are
/// inserted
pub const DEFAULT_BARRIER_THRESHOLD: usize = 2;

/// Configuration consumed when building the default strategy registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of every no-op barrier inserted by `LazyBarrierStrategy`
    pub max_barrier_size: usize,

    /// Expansion steps that must be seen before a barrier may be inserted
    pub barrier_threshold: usize,

    /// Clause ordering policy installed into match steps
    pub match_algorithm: MatchAlgorithmKind,

    /// Execution mode used when a caller does not pass one explicitly
    pub execution_mode: ExecutionMode,

    /// Enable predicate pushdown into storage queries
    pub enable_pushdown: bool,

    /// Enable lazy barrier insertion
    pub enable_lazy_barriers: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_barrier_size: DEFAULT_MAX_BARRIER_SIZE,
            barrier_threshold: DEFAULT_BARRIER_THRESHOLD,
            match_algorithm: MatchAlgorithmKind::Count,
            execution_mode: ExecutionMode::Local,
            enable_pushdown: true,
            enable_lazy_barriers: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| TraversalError::Configuration(format!("Invalid engine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TraversalError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        log::debug!("Loading engine config from {}", path.display());
        Self::from_json_str(&contents)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_barrier_size == 0 {
            return Err(TraversalError::Configuration(
                "max_barrier_size must be greater than zero".to_string(),
            ));
        }
        if self.barrier_threshold == 0 {
            return Err(TraversalError::Configuration(
                "barrier_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_barrier_size, 10_000);
        assert_eq!(config.barrier_threshold, 2);
        assert_eq!(config.match_algorithm, MatchAlgorithmKind::Count);
        assert!(config.execution_mode.is_local());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"max_barrier_size": 2, "match_algorithm": "greedy"}"#)
                .unwrap();
        assert_eq!(config.max_barrier_size, 2);
        assert_eq!(config.match_algorithm, MatchAlgorithmKind::Greedy);
        assert_eq!(config.barrier_threshold, 2);
        assert!(config.enable_pushdown);
    }

    #[test]
    fn test_zero_barrier_size_rejected() {
        let error = EngineConfig::from_json_str(r#"{"max_barrier_size": 0}"#).unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(EngineConfig::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"execution_mode": "distributed"}}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert!(config.execution_mode.is_distributed());
    }

    #[test]
    fn test_missing_file() {
        let error = EngineConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(error.is_configuration());
    }
}
