// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::process::{CallbackRegistry, StepKind, Traversal};
use crate::strategy::{StrategyCategory, StrategyContext, TraversalStrategy};

/// Attaches mutation listeners to every add-vertex step
#[derive(Debug, Clone, Default)]
pub struct EventStrategy {
    callbacks: CallbackRegistry,
}

impl EventStrategy {
    pub fn new(callbacks: CallbackRegistry) -> Self {
        Self { callbacks }
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }
}

impl TraversalStrategy for EventStrategy {
    fn name(&self) -> &'static str {
        "EventStrategy"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Decoration
    }

    fn apply(&self, traversal: &mut Traversal, _ctx: &StrategyContext) -> Result<()> {
        if self.callbacks.is_empty() {
            return Ok(());
        }
        for step in traversal.steps_mut() {
            if let StepKind::AddVertex { callbacks, .. } = step.kind_mut() {
                callbacks.merge(&self.callbacks);
            }
        }
        Ok(())
    }
}
