// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query submission boundary
//!
//! `TraversalEngine` compiles traversals through its strategy registry;
//! `CompiledTraversal` is the locked, executable result that callers pull.

use std::time::Instant;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::mode::ExecutionMode;
use crate::process::{CallbackRegistry, Traversal, Traverser, TraverserMode};
use crate::storage::Value;
use crate::strategy::{TraversalExplanation, TraversalStrategies};

/// Compiles traversals with a fixed strategy set
#[derive(Debug, Clone)]
pub struct TraversalEngine {
    config: EngineConfig,
    strategies: TraversalStrategies,
}

impl TraversalEngine {
    /// Engine with the default configuration and strategy set
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let strategies = TraversalStrategies::default_for(&config)?;
        Ok(Self { config, strategies })
    }

    /// Engine whose compiled add-vertex steps notify `callbacks`
    pub fn with_callbacks(config: EngineConfig, callbacks: CallbackRegistry) -> Result<Self> {
        config.validate()?;
        let strategies = TraversalStrategies::builder_with_callbacks(&config, callbacks).build()?;
        Ok(Self { config, strategies })
    }

    /// Engine with a caller-supplied strategy set
    pub fn with_strategies(config: EngineConfig, strategies: TraversalStrategies) -> Self {
        Self { config, strategies }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn strategies(&self) -> &TraversalStrategies {
        &self.strategies
    }

    /// Apply the strategy set once and lock the traversal. A traversal that
    /// is already locked is only re-verified for `mode`.
    pub fn compile(&self, mut traversal: Traversal, mode: ExecutionMode) -> Result<CompiledTraversal> {
        if traversal.is_locked() {
            log::debug!("traversal already compiled, verifying for {} execution", mode);
            if let Err(e) = self.strategies.verify(&mut traversal, mode) {
                log::warn!("verification failed: {}", e);
                return Err(e);
            }
            return Ok(CompiledTraversal { traversal, mode });
        }

        let start = Instant::now();
        log::debug!("compiling {} for {} execution", traversal, mode);
        if let Err(e) = self.strategies.apply(&mut traversal, mode) {
            log::warn!("compilation failed: {}", e);
            return Err(e);
        }
        traversal.lock();
        log::debug!(
            "compiled {} in {:.3}ms",
            traversal,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(CompiledTraversal { traversal, mode })
    }

    /// Compile for the configured execution mode
    pub fn compile_default(&self, traversal: Traversal) -> Result<CompiledTraversal> {
        self.compile(traversal, self.config.execution_mode)
    }

    pub fn explain(&self, traversal: &Traversal, mode: ExecutionMode) -> Result<TraversalExplanation> {
        self.strategies.explain(traversal, mode)
    }
}

/// A compiled traversal, ready to be pulled.
///
/// Not for concurrent pulling: clone one per worker. Clones start from the
/// state of the original at the time of cloning and share lambdas and the
/// graph handle.
#[derive(Debug, Clone)]
pub struct CompiledTraversal {
    traversal: Traversal,
    mode: ExecutionMode,
}

impl CompiledTraversal {
    /// Next result, `Ok(None)` once exhausted
    pub fn pull(&mut self) -> Result<Option<Traverser>> {
        self.traversal.next()
    }

    /// Drain the remaining results, expanding bulk
    pub fn to_list(&mut self) -> Result<Vec<Value>> {
        self.traversal.to_list()
    }

    /// Drain the remaining traversers without expanding bulk
    pub fn to_traversers(&mut self) -> Result<Vec<Traverser>> {
        self.traversal.to_traversers()
    }

    /// Rewind to the beginning. Inputs added with `add_start` are dropped.
    pub fn reset(&mut self) {
        self.traversal.reset();
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    pub fn into_traversal(self) -> Traversal {
        self.traversal
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn traverser_mode(&self) -> TraverserMode {
        self.traversal.traverser_mode()
    }
}

impl Iterator for CompiledTraversal {
    type Item = Result<Traverser>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pull().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::anonymous as __;
    use crate::process::StepKind;

    #[test]
    fn test_compile_locks_and_rewrites() {
        let engine = TraversalEngine::new().unwrap();
        let compiled = engine
            .compile(__::identity().out(&[]).identity(), ExecutionMode::Local)
            .unwrap();
        assert!(compiled.traversal().is_locked());
        assert_eq!(compiled.traversal().len(), 1);
        assert_eq!(compiled.mode(), ExecutionMode::Local);
    }

    #[test]
    fn test_compile_twice_is_noop() {
        let engine = TraversalEngine::new().unwrap();
        let once = engine
            .compile(__::out(&[]).out(&[]).out(&[]), ExecutionMode::Local)
            .unwrap();
        let twice = engine
            .compile(once.traversal().clone(), ExecutionMode::Local)
            .unwrap();
        assert_eq!(once.traversal(), twice.traversal());
        let barriers = twice
            .traversal()
            .steps()
            .iter()
            .filter(|s| matches!(s.kind(), StepKind::NoOpBarrier { .. }))
            .count();
        assert_eq!(barriers, 1);
    }

    #[test]
    fn test_distributed_lambda_rejected() {
        let engine = TraversalEngine::new().unwrap();
        let traversal = __::out(&[]).filter("always", |_: &Value| true);
        let error = engine
            .compile(traversal.clone(), ExecutionMode::Distributed)
            .unwrap_err();
        assert!(error.is_verification());
        assert!(engine.compile(traversal, ExecutionMode::Local).is_ok());
    }

    #[test]
    fn test_recompiling_for_distributed_reverifies() {
        let engine = TraversalEngine::new().unwrap();
        let local = engine
            .compile(__::out(&[]).map("ident", |v: &Value| Ok(v.clone())), ExecutionMode::Local)
            .unwrap();
        let error = engine
            .compile(local.clone().into_traversal(), ExecutionMode::Distributed)
            .unwrap_err();
        assert!(error.is_verification());

        let again = engine
            .compile(local.into_traversal(), ExecutionMode::Local)
            .unwrap();
        assert_eq!(again.mode(), ExecutionMode::Local);
    }

    #[test]
    fn test_pull_injected_values() {
        let engine = TraversalEngine::new().unwrap();
        let mut traversal = __::identity().count();
        traversal.add_start_value(Value::from(1));
        traversal.add_start_value(Value::from(2));
        let mut compiled = engine.compile(traversal, ExecutionMode::Local).unwrap();
        assert_eq!(compiled.to_list().unwrap(), vec![Value::from(2)]);
        assert!(compiled.pull().unwrap().is_none());
    }

    #[test]
    fn test_explain_records_every_strategy() {
        let engine = TraversalEngine::new().unwrap();
        let explanation = engine
            .explain(&__::out(&[]).identity(), ExecutionMode::Local)
            .unwrap();
        assert_eq!(explanation.steps.len(), engine.strategies().len());
        assert!(explanation
            .applied()
            .any(|s| s.strategy == "IdentityRemovalStrategy"));
    }
}
