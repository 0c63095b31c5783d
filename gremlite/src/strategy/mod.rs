// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Traversal strategies
//!
//! A strategy is a rewrite rule applied to a traversal's step list before
//! the first result is pulled. Strategies belong to one of four ordered
//! categories and may declare which other strategies must run before or
//! after them. `TraversalStrategies` orders a strategy set once and applies
//! it to a traversal and, recursively, to all of its child traversals.

pub mod decoration;
pub mod explanation;
pub mod finalization;
pub mod helper;
pub mod optimization;
pub mod registry;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::Result;
use crate::mode::ExecutionMode;
use crate::process::Traversal;

pub use decoration::EventStrategy;
pub use explanation::{ExplanationStep, TraversalExplanation};
pub use finalization::{LazyBarrierStrategy, MatchAlgorithmStrategy, PathRequirementStrategy};
pub use optimization::{IdentityRemovalStrategy, PredicatePushdownStrategy};
pub use registry::{TraversalStrategies, TraversalStrategiesBuilder};
pub use verification::{DistributedVerificationStrategy, MatchVerificationStrategy};

/// Strategy phase; phases run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrategyCategory {
    /// Adds application-level behavior (listeners, side effects)
    Decoration,
    /// Rewrites for efficiency without changing results
    Optimization,
    /// Final adjustments that depend on the optimized shape
    Finalization,
    /// Rejects traversals that cannot run in the target mode
    Verification,
}

impl fmt::Display for StrategyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyCategory::Decoration => write!(f, "decoration"),
            StrategyCategory::Optimization => write!(f, "optimization"),
            StrategyCategory::Finalization => write!(f, "finalization"),
            StrategyCategory::Verification => write!(f, "verification"),
        }
    }
}

/// Where in the traversal tree a strategy is being applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyContext {
    pub mode: ExecutionMode,
    /// False while rewriting a child traversal
    pub is_root: bool,
    /// Labels bound by enclosing traversals in front of the step that owns
    /// this one
    pub outer_labels: HashSet<String>,
}

impl StrategyContext {
    pub fn root(mode: ExecutionMode) -> Self {
        Self {
            mode,
            is_root: true,
            outer_labels: HashSet::new(),
        }
    }

    /// Context for a child of a step preceded by steps binding `labels`
    pub fn child(&self, labels: HashSet<String>) -> Self {
        let mut outer_labels = self.outer_labels.clone();
        outer_labels.extend(labels);
        Self {
            mode: self.mode,
            is_root: false,
            outer_labels,
        }
    }
}

/// A rewrite rule over a traversal's step sequence
pub trait TraversalStrategy: fmt::Debug + Send + Sync {
    /// Unique name, used by ordering constraints
    fn name(&self) -> &'static str;

    fn category(&self) -> StrategyCategory;

    /// Strategies that must run before this one
    fn applies_prior(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Strategies that must run after this one
    fn applies_post(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Rewrite `traversal` in place. Must leave an already rewritten
    /// traversal unchanged.
    fn apply(&self, traversal: &mut Traversal, ctx: &StrategyContext) -> Result<()>;
}
