// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Traversal error types

use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised while building a strategy registry, compiling a traversal
/// or pulling results from it.
///
/// Exhaustion is not an error: a step with no more output returns `Ok(None)`.
#[derive(Error, Debug)]
pub enum TraversalError {
    /// Invalid strategy set or engine configuration. Raised when a registry
    /// is built, never in the middle of a query.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A step is illegal for the chosen execution mode, or the traversal is
    /// structurally invalid. Raised at compile time, before any execution.
    #[error("Verification error in {strategy}: {reason} [{step}]")]
    Verification {
        strategy: String,
        step: String,
        reason: String,
    },

    /// A step could not process a traverser's value.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TraversalError {
    /// Build a verification error for the given strategy and offending step
    pub fn verification(
        strategy: impl Into<String>,
        step: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        TraversalError::Verification {
            strategy: strategy.into(),
            step: step.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors raised by a verification strategy
    pub fn is_verification(&self) -> bool {
        matches!(self, TraversalError::Verification { .. })
    }

    /// Returns true for configuration errors
    pub fn is_configuration(&self) -> bool {
        matches!(self, TraversalError::Configuration(_))
    }

    /// Returns true for errors raised while pulling results
    pub fn is_evaluation(&self) -> bool {
        matches!(self, TraversalError::Evaluation(_))
    }
}

pub type Result<T> = std::result::Result<T, TraversalError>;
