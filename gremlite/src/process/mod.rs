// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Traversal process model
//!
//! This module provides:
//! - Traversers and the bulking traverser set
//! - Steps, their definitions and pull-based execution
//! - Traversals, the anonymous `__` constructors and the graph-bound source
//! - Predicates, lambdas, mutation events and serializable descriptions

pub mod anonymous;
pub mod description;
pub mod event;
pub mod lambda;
pub mod predicate;
pub mod source;
pub mod step;
pub mod traversal;
pub mod traverser;
pub mod traverser_set;

pub use description::{StepDescription, TraversalDescription};
pub use event::{Callback, CallbackId, CallbackRegistry, Event};
pub use lambda::{Lambda, LambdaFunction};
pub use predicate::{Compare, HasContainer, PredicateValue};
pub use source::TraversalSource;
pub use step::{
    CountMatchAlgorithm, GreedyMatchAlgorithm, MatchAlgorithm, MatchAlgorithmKind, MatchClause,
    MatchEmit, MatchStep, Step, StepKind,
};
pub use traversal::{ExecutionContext, Traversal, Upstream};
pub use traverser::{Path, PathEntry, Traverser, TraverserMode};
pub use traverser_set::TraverserSet;
