// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::process::{MatchAlgorithmKind, StepKind, Traversal};
use crate::strategy::{StrategyCategory, StrategyContext, TraversalStrategy};

/// Installs the configured clause ordering policy into every match step
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAlgorithmStrategy {
    kind: MatchAlgorithmKind,
}

impl MatchAlgorithmStrategy {
    pub fn new(kind: MatchAlgorithmKind) -> Self {
        Self { kind }
    }
}

impl TraversalStrategy for MatchAlgorithmStrategy {
    fn name(&self) -> &'static str {
        "MatchAlgorithmStrategy"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Finalization
    }

    fn apply(&self, traversal: &mut Traversal, _ctx: &StrategyContext) -> Result<()> {
        for step in traversal.steps_mut() {
            if let StepKind::Match(match_step) = step.kind_mut() {
                match_step.set_algorithm(self.kind);
            }
        }
        Ok(())
    }
}
