// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Gremlite - A lazy, strategy-compiled graph traversal engine
//!
//! Gremlite executes traversals written as chains of steps over a property
//! graph. Before the first result is pulled, a traversal is compiled through
//! an ordered set of rewrite strategies, then executed as a pull-driven
//! pipeline that streams traversers one at a time.
//!
//! # Features
//!
//! - **Lazy Execution**: Every step computes its next output only on demand
//! - **Strategy Compilation**: Decoration, optimization, finalization and
//!   verification passes ordered by declared dependencies
//! - **Predicate Pushdown**: Literal `has()` filters move into storage queries
//! - **Lazy Barriers**: Long expansion chains are batched and bulked
//! - **Pattern Matching**: Multi-clause `match()` joins with pluggable
//!   clause ordering
//! - **Distributed Verification**: Lambdas and steps a worker cannot run
//!   are rejected before a traversal is handed to a distributed runtime
//!
//! # Usage
//!
//! ```ignore
//! use gremlite::{ExecutionMode, GraphCache, TraversalEngine, TraversalSource};
//!
//! let graph = std::sync::Arc::new(GraphCache::new());
//! let g = TraversalSource::new(graph);
//! let engine = TraversalEngine::new()?;
//! let mut compiled = engine.compile(g.v(&[]).out(&["knows"]).values(&["name"]), ExecutionMode::Local)?;
//! while let Some(traverser) = compiled.pull()? {
//!     println!("{}", traverser.value());
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod mode;
pub mod process;
pub mod storage;
pub mod strategy;

pub use config::EngineConfig;
pub use engine::{CompiledTraversal, TraversalEngine};
pub use error::{Result, TraversalError};
pub use mode::ExecutionMode;
pub use process::anonymous as __;
pub use process::{
    CallbackRegistry, Compare, Event, HasContainer, MatchAlgorithmKind, MatchClause, MatchEmit,
    Step, StepKind, Traversal, TraversalDescription, TraversalSource, Traverser, TraverserMode,
};
pub use storage::{Direction, Edge, ElementKind, GraphCache, GraphProvider, Value, Vertex};
pub use strategy::{StrategyCategory, TraversalExplanation, TraversalStrategies, TraversalStrategy};

/// Gremlite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gremlite crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
