// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Result, TraversalError};
use crate::process::{HasContainer, Step, StepKind, Traversal};
use crate::storage::{ElementKind, ID_KEY};
use crate::strategy::helper::find_step;
use crate::strategy::{StrategyCategory, StrategyContext, TraversalStrategy};

/// Rejects traversals the distributed runtime cannot execute:
///
/// - lambda steps anywhere in the tree, since opaque closures cannot be
///   shipped to workers
/// - reducing barriers anywhere but at the end of the root traversal
/// - child traversals that reach past the elements adjacent to the vertex
///   they start from (match clauses are exempt, the runtime joins them
///   itself)
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributedVerificationStrategy;

/// Where a child traversal currently sits relative to its start vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    Local,
    IncidentEdge,
    Adjacent,
}

fn id_only(containers: &[HasContainer]) -> bool {
    containers.iter().all(|c| c.key() == ID_KEY)
}

/// First step of a child traversal that a worker could not evaluate
fn unreachable_in_child(child: &Traversal) -> Option<(&Step, &'static str)> {
    let mut reach = Reach::Local;
    for step in child.steps() {
        if step.kind().is_reducing_barrier() {
            return Some((
                step,
                "reducing barriers cannot run inside child traversals in distributed mode",
            ));
        }
        let (leaves_star, next) = match step.kind() {
            StepKind::Vertex {
                returns,
                has_containers,
                ..
            } => {
                let next = match returns {
                    ElementKind::Vertex => Reach::Adjacent,
                    ElementKind::Edge => Reach::IncidentEdge,
                };
                let filters_neighbours = next == Reach::Adjacent && !id_only(has_containers);
                (reach == Reach::Adjacent || filters_neighbours, next)
            }
            StepKind::EdgeVertex { .. } => (reach == Reach::Adjacent, Reach::Adjacent),
            StepKind::Has { containers } => (reach == Reach::Adjacent && !id_only(containers), reach),
            StepKind::Values { .. }
            | StepKind::Label
            | StepKind::Where(_)
            | StepKind::Union(_)
            | StepKind::Match(_) => (reach == Reach::Adjacent, reach),
            _ => (false, reach),
        };
        if leaves_star {
            return Some((
                step,
                "child traversals cannot read past adjacent elements in distributed mode",
            ));
        }
        reach = next;
        for nested in step.children() {
            if let Some(found) = unreachable_in_child(nested) {
                return Some(found);
            }
        }
    }
    None
}

impl DistributedVerificationStrategy {
    fn reject(&self, step: &Step, reason: &str) -> TraversalError {
        log::warn!("rejecting {} for distributed execution: {}", step, reason);
        TraversalError::verification(self.name(), step, reason)
    }
}

impl TraversalStrategy for DistributedVerificationStrategy {
    fn name(&self) -> &'static str {
        "DistributedVerificationStrategy"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Verification
    }

    fn apply(&self, traversal: &mut Traversal, ctx: &StrategyContext) -> Result<()> {
        if !ctx.is_root || !ctx.mode.is_distributed() {
            return Ok(());
        }
        if let Some(step) = find_step(traversal, &|s: &Step| s.kind().is_lambda()) {
            return Err(self.reject(step, "lambda steps cannot be executed in distributed mode"));
        }

        let last = traversal.len().saturating_sub(1);
        for (index, step) in traversal.steps().iter().enumerate() {
            if step.kind().is_reducing_barrier() && index != last {
                return Err(self.reject(
                    step,
                    "reducing barriers must end the traversal in distributed mode",
                ));
            }
            if matches!(step.kind(), StepKind::Match(_)) {
                continue;
            }
            for child in step.children() {
                if let Some((found, reason)) = unreachable_in_child(child) {
                    return Err(self.reject(found, reason));
                }
            }
        }
        Ok(())
    }
}
