// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Predicate pushdown into storage queries
//!
//! `has()` filters directly behind a `V()`/`E()` or adjacency step are moved
//! into that step, so the storage backend evaluates them while it scans.
//! Only literal predicates move; predicates comparing against a nested
//! traversal stay in their filter step.

use crate::error::Result;
use crate::process::{HasContainer, StepKind, Traversal};
use crate::strategy::{StrategyCategory, StrategyContext, TraversalStrategy};

#[derive(Debug, Clone, Copy, Default)]
pub struct PredicatePushdownStrategy;

impl TraversalStrategy for PredicatePushdownStrategy {
    fn name(&self) -> &'static str {
        "PredicatePushdownStrategy"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Optimization
    }

    fn applies_prior(&self) -> Vec<&'static str> {
        vec!["IdentityRemovalStrategy"]
    }

    fn apply(&self, traversal: &mut Traversal, _ctx: &StrategyContext) -> Result<()> {
        let mut index = 0;
        while index < traversal.len() {
            if traversal.steps()[index].kind().is_storage_query() {
                push_into(traversal, index);
            }
            index += 1;
        }
        Ok(())
    }
}

/// Fold the run of `Has` steps following the storage step at `target`
fn push_into(traversal: &mut Traversal, target: usize) {
    let mut next = target + 1;
    while next < traversal.len() {
        let (moved, emptied) = {
            let StepKind::Has { containers } = traversal.steps_mut()[next].kind_mut() else {
                break;
            };
            let (native, remaining): (Vec<HasContainer>, Vec<HasContainer>) =
                std::mem::take(containers)
                    .into_iter()
                    .partition(HasContainer::is_native);
            *containers = remaining;
            let emptied = containers.is_empty();
            (native, emptied)
        };

        if !moved.is_empty() {
            log::trace!(
                "pushing {} predicate(s) into {}",
                moved.len(),
                traversal.steps()[target]
            );
            if let Some(has_containers) = traversal.steps_mut()[target]
                .kind_mut()
                .has_containers_mut()
            {
                has_containers.extend(moved);
            }
        }

        if emptied {
            let removed = traversal.remove_step(next);
            for label in removed.labels() {
                traversal.steps_mut()[target].add_label(label.clone());
            }
        } else {
            next += 1;
        }
    }
}
