// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use crate::error::Result;
use crate::process::{StepKind, Traversal, TraverserMode};
use crate::strategy::helper::labels_before;
use crate::strategy::{StrategyCategory, StrategyContext, TraversalStrategy};

/// Picks the traverser variant for the whole traversal tree.
///
/// Path tracking is needed when any step reads paths, or when a match step
/// refers to a label bound by an earlier step, in its own traversal or an
/// enclosing one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathRequirementStrategy;

fn requires_path(traversal: &Traversal, outer: &HashSet<String>) -> bool {
    traversal.steps().iter().enumerate().any(|(index, step)| {
        if step.kind().requires_path() {
            return true;
        }
        let mut earlier = labels_before(traversal, index);
        earlier.extend(outer.iter().cloned());
        if let StepKind::Match(match_step) = step.kind() {
            if match_step.variables().iter().any(|v| earlier.contains(v)) {
                return true;
            }
        }
        step.children()
            .into_iter()
            .any(|child| requires_path(child, &earlier))
    })
}

impl TraversalStrategy for PathRequirementStrategy {
    fn name(&self) -> &'static str {
        "PathRequirementStrategy"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Finalization
    }

    fn apply(&self, traversal: &mut Traversal, ctx: &StrategyContext) -> Result<()> {
        if !ctx.is_root {
            return Ok(());
        }
        let mode = if requires_path(traversal, &ctx.outer_labels) {
            TraverserMode::PathTracking
        } else {
            TraverserMode::Simple
        };
        log::debug!("traverser mode: {:?}", mode);
        traversal.set_traverser_mode(mode);
        Ok(())
    }
}
