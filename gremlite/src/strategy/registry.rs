// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Strategy registry
//!
//! Orders a strategy set once, at construction, and applies it to
//! traversals. Ordering is by category first, then by the prior/post
//! constraints each strategy declares, resolved with a topological sort.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::error::{Result, TraversalError};
use crate::mode::ExecutionMode;
use crate::process::{CallbackRegistry, Traversal};
use crate::strategy::explanation::{ExplanationStep, TraversalExplanation};
use crate::strategy::helper::labels_before;
use crate::strategy::{
    DistributedVerificationStrategy, EventStrategy, IdentityRemovalStrategy, LazyBarrierStrategy,
    MatchAlgorithmStrategy, MatchVerificationStrategy, PathRequirementStrategy,
    PredicatePushdownStrategy, StrategyCategory, StrategyContext, TraversalStrategy,
};

/// An ordered, immutable strategy set
#[derive(Clone, Default)]
pub struct TraversalStrategies {
    strategies: Vec<Arc<dyn TraversalStrategy>>,
}

impl TraversalStrategies {
    pub fn builder() -> TraversalStrategiesBuilder {
        TraversalStrategiesBuilder::default()
    }

    /// Builder preloaded with the standard strategy set for `config`
    pub fn builder_for(config: &EngineConfig) -> TraversalStrategiesBuilder {
        Self::builder_with_callbacks(config, CallbackRegistry::new())
    }

    /// Like [`builder_for`](Self::builder_for), with mutation listeners
    /// attached to every add-vertex step
    pub fn builder_with_callbacks(
        config: &EngineConfig,
        callbacks: CallbackRegistry,
    ) -> TraversalStrategiesBuilder {
        let mut builder = Self::builder()
            .add_strategy(EventStrategy::new(callbacks))
            .add_strategy(IdentityRemovalStrategy);
        if config.enable_pushdown {
            builder = builder.add_strategy(PredicatePushdownStrategy);
        }
        builder = builder
            .add_strategy(PathRequirementStrategy)
            .add_strategy(MatchAlgorithmStrategy::new(config.match_algorithm));
        if config.enable_lazy_barriers {
            builder = builder.add_strategy(LazyBarrierStrategy::new(
                config.max_barrier_size,
                config.barrier_threshold,
            ));
        }
        builder
            .add_strategy(MatchVerificationStrategy)
            .add_strategy(DistributedVerificationStrategy)
    }

    /// The standard strategy set for `config`
    pub fn default_for(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Self::builder_for(config).build()
    }

    pub fn strategies(&self) -> &[Arc<dyn TraversalStrategy>] {
        &self.strategies
    }

    /// Strategy names in application order
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.iter().any(|s| s.name() == name)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Apply every strategy, in order, to `traversal` and all of its child
    /// traversals. The first failing strategy aborts the rewrite.
    pub fn apply(&self, traversal: &mut Traversal, mode: ExecutionMode) -> Result<()> {
        let ctx = StrategyContext::root(mode);
        for strategy in &self.strategies {
            log::trace!("applying {}", strategy.name());
            apply_recursive(strategy.as_ref(), traversal, &ctx)?;
        }
        Ok(())
    }

    /// Run only the verification strategies. Used for traversals whose
    /// rewrites were already applied, possibly for another execution mode.
    pub fn verify(&self, traversal: &mut Traversal, mode: ExecutionMode) -> Result<()> {
        let ctx = StrategyContext::root(mode);
        for strategy in &self.strategies {
            if strategy.category() == StrategyCategory::Verification {
                log::trace!("verifying with {}", strategy.name());
                apply_recursive(strategy.as_ref(), traversal, &ctx)?;
            }
        }
        Ok(())
    }

    /// Apply the strategies to a copy of `traversal`, recording the
    /// traversal after each one
    pub fn explain(&self, traversal: &Traversal, mode: ExecutionMode) -> Result<TraversalExplanation> {
        let start = Instant::now();
        let ctx = StrategyContext::root(mode);
        let mut current = traversal.clone();
        let mut steps = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let before = current.clone();
            let step_start = Instant::now();
            apply_recursive(strategy.as_ref(), &mut current, &ctx)?;
            let duration = step_start.elapsed();
            steps.push(ExplanationStep {
                strategy: strategy.name().to_string(),
                category: strategy.category(),
                duration,
                changed: before != current,
                traversal: current.to_string(),
            });
        }

        Ok(TraversalExplanation {
            original: traversal.to_string(),
            steps,
            final_traversal: current.to_string(),
            traverser_mode: current.traverser_mode(),
            total_duration: start.elapsed(),
        })
    }
}

fn apply_recursive(
    strategy: &dyn TraversalStrategy,
    traversal: &mut Traversal,
    ctx: &StrategyContext,
) -> Result<()> {
    strategy.apply(traversal, ctx)?;
    let bound: Vec<_> = (0..traversal.len())
        .map(|index| labels_before(traversal, index))
        .collect();
    for (step, labels) in traversal.steps_mut().iter_mut().zip(bound) {
        let child_ctx = ctx.child(labels);
        for child in step.children_mut() {
            apply_recursive(strategy, child, &child_ctx)?;
        }
    }
    Ok(())
}

impl fmt::Debug for TraversalStrategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Collects strategies and orders them on [`build`](Self::build)
#[derive(Default)]
pub struct TraversalStrategiesBuilder {
    strategies: Vec<Arc<dyn TraversalStrategy>>,
}

impl TraversalStrategiesBuilder {
    /// Add a strategy, replacing any strategy with the same name
    pub fn add_strategy<S: TraversalStrategy + 'static>(self, strategy: S) -> Self {
        self.add_shared(Arc::new(strategy))
    }

    pub fn add_shared(mut self, strategy: Arc<dyn TraversalStrategy>) -> Self {
        match self
            .strategies
            .iter()
            .position(|s| s.name() == strategy.name())
        {
            Some(index) => self.strategies[index] = strategy,
            None => self.strategies.push(strategy),
        }
        self
    }

    pub fn remove_strategy(mut self, name: &str) -> Self {
        self.strategies.retain(|s| s.name() != name);
        self
    }

    /// Order the strategies. Fails when constraints form a cycle or point
    /// across categories in the wrong direction. Constraints naming a
    /// strategy that is not in the set are ignored.
    pub fn build(self) -> Result<TraversalStrategies> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.strategies.len())
            .map(|i| graph.add_node(i))
            .collect();
        let by_name: HashMap<&'static str, usize> = self
            .strategies
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name(), i))
            .collect();

        for (index, strategy) in self.strategies.iter().enumerate() {
            for prior in strategy.applies_prior() {
                if let Some(&other) = by_name.get(prior) {
                    if self.strategies[other].category() > strategy.category() {
                        return Err(category_error(strategy.as_ref(), prior, "prior"));
                    }
                    graph.add_edge(nodes[other], nodes[index], ());
                }
            }
            for post in strategy.applies_post() {
                if let Some(&other) = by_name.get(post) {
                    if self.strategies[other].category() < strategy.category() {
                        return Err(category_error(strategy.as_ref(), post, "post"));
                    }
                    graph.add_edge(nodes[index], nodes[other], ());
                }
            }
        }

        let order = toposort(&graph, None).map_err(|cycle| {
            let name = self.strategies[graph[cycle.node_id()]].name();
            TraversalError::Configuration(format!(
                "Strategy ordering constraints form a cycle through {}",
                name
            ))
        })?;

        let mut strategies: Vec<Arc<dyn TraversalStrategy>> = order
            .into_iter()
            .map(|node| Arc::clone(&self.strategies[graph[node]]))
            .collect();
        // Stable, so the topological order survives within a category
        strategies.sort_by_key(|s| s.category());

        let registry = TraversalStrategies { strategies };
        log::debug!("strategy order: {:?}", registry.names());
        Ok(registry)
    }
}

fn category_error(strategy: &dyn TraversalStrategy, other: &str, relation: &str) -> TraversalError {
    TraversalError::Configuration(format!(
        "{} ({}) declares {} as {} across categories in the wrong direction",
        strategy.name(),
        strategy.category(),
        other,
        relation
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Named {
        name: &'static str,
        category: StrategyCategory,
        prior: Vec<&'static str>,
        post: Vec<&'static str>,
    }

    impl Named {
        fn new(name: &'static str, category: StrategyCategory) -> Self {
            Self {
                name,
                category,
                prior: Vec::new(),
                post: Vec::new(),
            }
        }
    }

    impl TraversalStrategy for Named {
        fn name(&self) -> &'static str {
            self.name
        }
        fn category(&self) -> StrategyCategory {
            self.category
        }
        fn applies_prior(&self) -> Vec<&'static str> {
            self.prior.clone()
        }
        fn applies_post(&self) -> Vec<&'static str> {
            self.post.clone()
        }
        fn apply(&self, _traversal: &mut Traversal, _ctx: &StrategyContext) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_order() {
        let registry = TraversalStrategies::default_for(&EngineConfig::default()).unwrap();
        let names = registry.names();
        let position = |name: &str| names.iter().position(|n| *n == name).unwrap();

        assert_eq!(names.len(), 8);
        assert_eq!(names[0], "EventStrategy");
        assert!(position("IdentityRemovalStrategy") < position("PredicatePushdownStrategy"));
        assert!(position("PathRequirementStrategy") < position("LazyBarrierStrategy"));
        assert!(position("LazyBarrierStrategy") < position("MatchVerificationStrategy"));
        assert!(position("LazyBarrierStrategy") < position("DistributedVerificationStrategy"));
    }

    #[test]
    fn test_disabled_strategies_left_out() {
        let config = EngineConfig {
            enable_pushdown: false,
            enable_lazy_barriers: false,
            ..EngineConfig::default()
        };
        let registry = TraversalStrategies::default_for(&config).unwrap();
        assert!(!registry.contains("PredicatePushdownStrategy"));
        assert!(!registry.contains("LazyBarrierStrategy"));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_categories_order_before_constraints() {
        let registry = TraversalStrategies::builder()
            .add_strategy(Named::new("v", StrategyCategory::Verification))
            .add_strategy(Named::new("o", StrategyCategory::Optimization))
            .add_strategy(Named::new("d", StrategyCategory::Decoration))
            .build()
            .unwrap();
        assert_eq!(registry.names(), vec!["d", "o", "v"]);
    }

    #[test]
    fn test_constraints_within_category() {
        let mut a = Named::new("a", StrategyCategory::Optimization);
        a.prior = vec!["b"];
        let mut c = Named::new("c", StrategyCategory::Optimization);
        c.post = vec!["b"];
        let registry = TraversalStrategies::builder()
            .add_strategy(a)
            .add_strategy(Named::new("b", StrategyCategory::Optimization))
            .add_strategy(c)
            .build()
            .unwrap();
        assert_eq!(registry.names(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut a = Named::new("a", StrategyCategory::Optimization);
        a.prior = vec!["b"];
        let mut b = Named::new("b", StrategyCategory::Optimization);
        b.prior = vec!["a"];
        let error = TraversalStrategies::builder()
            .add_strategy(a)
            .add_strategy(b)
            .build()
            .unwrap_err();
        assert!(error.is_configuration());
        assert!(error.to_string().contains("cycle"));
    }

    #[test]
    fn test_prior_in_later_category_rejected() {
        let mut a = Named::new("a", StrategyCategory::Decoration);
        a.prior = vec!["v"];
        let error = TraversalStrategies::builder()
            .add_strategy(a)
            .add_strategy(Named::new("v", StrategyCategory::Verification))
            .build()
            .unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn test_unknown_constraint_ignored() {
        let mut a = Named::new("a", StrategyCategory::Optimization);
        a.prior = vec!["missing"];
        assert!(TraversalStrategies::builder().add_strategy(a).build().is_ok());
    }

    #[test]
    fn test_add_replaces_and_remove() {
        let builder = TraversalStrategies::builder()
            .add_strategy(Named::new("a", StrategyCategory::Optimization))
            .add_strategy(Named::new("a", StrategyCategory::Finalization))
            .add_strategy(Named::new("b", StrategyCategory::Optimization))
            .remove_strategy("b");
        let registry = builder.build().unwrap();
        assert_eq!(registry.names(), vec!["a"]);
        assert_eq!(
            registry.strategies()[0].category(),
            StrategyCategory::Finalization
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            max_barrier_size: 0,
            ..EngineConfig::default()
        };
        assert!(TraversalStrategies::default_for(&config)
            .unwrap_err()
            .is_configuration());
    }
}
