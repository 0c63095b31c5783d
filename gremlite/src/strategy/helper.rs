// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Traversal inspection helpers shared by strategies

use std::collections::HashSet;

use crate::process::{Step, Traversal};

/// First step matching `predicate`, searching each step before its
/// children
pub fn find_step<'t, P>(traversal: &'t Traversal, predicate: &P) -> Option<&'t Step>
where
    P: Fn(&Step) -> bool,
{
    for step in traversal.steps() {
        if predicate(step) {
            return Some(step);
        }
        for child in step.children() {
            if let Some(found) = find_step(child, predicate) {
                return Some(found);
            }
        }
    }
    None
}

/// Whether any step in the traversal tree matches
pub fn any_step<P>(traversal: &Traversal, predicate: &P) -> bool
where
    P: Fn(&Step) -> bool,
{
    find_step(traversal, predicate).is_some()
}

/// Labels attached to the steps in front of `index`
pub fn labels_before(traversal: &Traversal, index: usize) -> HashSet<String> {
    traversal.steps()[..index.min(traversal.len())]
        .iter()
        .flat_map(|step| step.labels().iter().cloned())
        .collect()
}

/// Number of top-level steps matching `predicate`
pub fn count_steps<P>(traversal: &Traversal, predicate: P) -> usize
where
    P: Fn(&Step) -> bool,
{
    traversal.steps().iter().filter(|step| predicate(step)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::anonymous as __;

    #[test]
    fn test_find_step_descends_into_children() {
        let traversal = __::out(&[]).where_(__::map("inner", |v| Ok(v.clone())));
        let found = find_step(&traversal, &|s: &Step| s.kind().is_lambda()).unwrap();
        assert_eq!(found.to_string(), "LambdaStep(map:inner)");
        assert!(!any_step(&traversal, &|s: &Step| s.kind().is_barrier()));
    }

    #[test]
    fn test_labels_before() {
        let traversal = __::as_("a").out(&[]).as_("b").count().as_("c");
        let labels = labels_before(&traversal, 2);
        assert!(labels.contains("a") && labels.contains("b"));
        assert!(!labels.contains("c"));
        assert_eq!(count_steps(&traversal, |s| s.kind().is_expansion()), 1);
    }
}
