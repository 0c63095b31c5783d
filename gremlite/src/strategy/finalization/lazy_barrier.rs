// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lazy barrier insertion
//!
//! Long chains of adjacency expansions multiply the number of traversers.
//! A bounded no-op barrier behind an expansion lets equal traversers merge
//! into one bulked traverser before the next expansion runs.

use crate::config::{DEFAULT_BARRIER_THRESHOLD, DEFAULT_MAX_BARRIER_SIZE};
use crate::error::Result;
use crate::process::{Step, StepKind, Traversal};
use crate::strategy::helper::count_steps;
use crate::strategy::{StrategyCategory, StrategyContext, TraversalStrategy};

#[derive(Debug, Clone, Copy)]
pub struct LazyBarrierStrategy {
    max_barrier_size: usize,
    threshold: usize,
}

impl Default for LazyBarrierStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BARRIER_SIZE, DEFAULT_BARRIER_THRESHOLD)
    }
}

impl LazyBarrierStrategy {
    /// `max_barrier_size` is the capacity of every inserted barrier;
    /// barriers appear once more than `threshold` expansions exist, and only
    /// behind the `threshold`-th expansion and later.
    pub fn new(max_barrier_size: usize, threshold: usize) -> Self {
        Self {
            max_barrier_size,
            threshold,
        }
    }

    pub fn max_barrier_size(&self) -> usize {
        self.max_barrier_size
    }
}

/// Steps that keep working on the element an expansion just produced
fn continues_element(kind: &StepKind) -> bool {
    matches!(
        kind,
        StepKind::EdgeVertex { .. }
            | StepKind::Identity
            | StepKind::Id
            | StepKind::Label
            | StepKind::Values { .. }
            | StepKind::Path
            | StepKind::Select { .. }
    )
}

impl TraversalStrategy for LazyBarrierStrategy {
    fn name(&self) -> &'static str {
        "LazyBarrierStrategy"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Finalization
    }

    fn applies_prior(&self) -> Vec<&'static str> {
        vec!["PathRequirementStrategy"]
    }

    fn apply(&self, traversal: &mut Traversal, ctx: &StrategyContext) -> Result<()> {
        if !ctx.is_root
            || ctx.mode.is_distributed()
            || traversal.traverser_mode().tracks_paths()
            || count_steps(traversal, |s| s.kind().is_expansion()) <= self.threshold
        {
            return Ok(());
        }

        let mut expansions = 0;
        let mut index = 0;
        while index + 1 < traversal.len() {
            let kind = traversal.steps()[index].kind();
            if kind.is_expansion() {
                expansions += 1;
            }
            // Filters are skipped so placement does not depend on whether a
            // filter was folded into the expansion before it
            let next = traversal.steps()[index + 1..]
                .iter()
                .map(Step::kind)
                .find(|k| !k.is_filter());
            let insert = expansions >= self.threshold
                && (kind.is_map() || kind.is_flat_map())
                && next.is_some_and(|next| {
                    !continues_element(next) && !matches!(next, StepKind::NoOpBarrier { .. })
                });

            if insert {
                traversal.insert_step(
                    index + 1,
                    Step::new(StepKind::NoOpBarrier {
                        max: self.max_barrier_size,
                    }),
                );
                index += 2;
            } else {
                index += 1;
            }
        }
        Ok(())
    }
}
