// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::process::{StepKind, Traversal};
use crate::strategy::{StrategyCategory, StrategyContext, TraversalStrategy};

/// Removes unlabeled identity steps, never the only step
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRemovalStrategy;

impl TraversalStrategy for IdentityRemovalStrategy {
    fn name(&self) -> &'static str {
        "IdentityRemovalStrategy"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Optimization
    }

    fn apply(&self, traversal: &mut Traversal, _ctx: &StrategyContext) -> Result<()> {
        let mut index = 0;
        while index < traversal.len() {
            let step = &traversal.steps()[index];
            if traversal.len() > 1
                && matches!(step.kind(), StepKind::Identity)
                && step.labels().is_empty()
            {
                traversal.remove_step(index);
            } else {
                index += 1;
            }
        }
        Ok(())
    }
}
