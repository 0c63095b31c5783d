// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Result, TraversalError};
use crate::process::{StepKind, Traversal};
use crate::strategy::helper::labels_before;
use crate::strategy::{StrategyCategory, StrategyContext, TraversalStrategy};

/// Rejects match steps with clauses that can never run: every clause must
/// start at the match's input label, a label bound on the incoming path
/// (including by enclosing traversals), or a label bound by another
/// reachable clause
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchVerificationStrategy;

impl TraversalStrategy for MatchVerificationStrategy {
    fn name(&self) -> &'static str {
        "MatchVerificationStrategy"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Verification
    }

    fn apply(&self, traversal: &mut Traversal, ctx: &StrategyContext) -> Result<()> {
        for (index, step) in traversal.steps().iter().enumerate() {
            if let StepKind::Match(match_step) = step.kind() {
                let mut path_labels = labels_before(traversal, index);
                path_labels.extend(ctx.outer_labels.iter().cloned());
                if let Err(reason) = match_step.validate(&path_labels) {
                    return Err(TraversalError::verification(self.name(), step, reason));
                }
            }
        }
        Ok(())
    }
}
