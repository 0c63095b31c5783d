//! Strategy registry ordering, idempotence and explanation

#[path = "testutils/mod.rs"]
mod testutils;

use gremlite::strategy::StrategyContext;
use gremlite::{
    EngineConfig, ExecutionMode, Result, StepKind, StrategyCategory, Traversal,
    TraversalEngine, TraversalStrategies, TraversalStrategy, __,
};
use testutils::modern;

fn samples() -> Vec<Traversal> {
    let g = modern();
    vec![
        g.v(&[]).identity().has("name", "marko").out(&[]).out(&[]).out(&[]).count(),
        g.v(&[]).out_e(&[]).in_v().out_e(&[]).in_v().out_e(&[]).in_v().group_count(),
        g.v(&[]).as_("a").out(&[]).has_label(&["person"]).path(),
        g.v(&[]).where_(__::identity().out(&[]).has_id(&["2", "4"])),
        g.v(&[]).match_(
            "a",
            Some("c"),
            vec![
                __::as_("a").out(&["knows"]).as_("b"),
                __::as_("b").out(&["created"]).as_("c"),
                __::as_("c").has("lang", "java"),
            ],
        ),
        g.add_v("person").property("name", "ada"),
    ]
}

#[test]
fn test_reapplying_is_idempotent() {
    testutils::init_logging();
    let registry = TraversalStrategies::default_for(&EngineConfig::default()).unwrap();
    for mode in [ExecutionMode::Local, ExecutionMode::Distributed] {
        for original in samples() {
            let mut once = original.clone();
            registry.apply(&mut once, mode).unwrap();
            let mut twice = once.clone();
            registry.apply(&mut twice, mode).unwrap();
            assert_eq!(twice, once, "re-applying to {}", original);
        }
    }
}

#[test]
fn test_children_are_rewritten() {
    let g = modern();
    let registry = TraversalStrategies::default_for(&EngineConfig::default()).unwrap();
    let mut traversal = g
        .v(&[])
        .union(vec![__::identity().out(&[]).has("name", "lop")]);
    registry.apply(&mut traversal, ExecutionMode::Local).unwrap();

    let child = traversal.steps()[0].children()[0];
    assert_eq!(child.len(), 1);
    match child.steps()[0].kind() {
        StepKind::Vertex { has_containers, .. } => assert_eq!(has_containers.len(), 1),
        other => panic!("unexpected step {:?}", other),
    }
}

/// Drops every `limit()` step
#[derive(Debug)]
struct LimitRemoval;

impl TraversalStrategy for LimitRemoval {
    fn name(&self) -> &'static str {
        "LimitRemoval"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Optimization
    }

    fn applies_post(&self) -> Vec<&'static str> {
        vec!["IdentityRemovalStrategy"]
    }

    fn apply(&self, traversal: &mut Traversal, _ctx: &StrategyContext) -> Result<()> {
        traversal
            .steps_mut()
            .retain(|s| !matches!(s.kind(), StepKind::Limit(_)));
        Ok(())
    }
}

#[test]
fn test_custom_strategy_ordered_by_constraints() {
    let config = EngineConfig::default();
    let registry = TraversalStrategies::builder_for(&config)
        .add_strategy(LimitRemoval)
        .build()
        .unwrap();
    let names = registry.names();
    let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
    assert!(position("LimitRemoval") < position("IdentityRemovalStrategy"));
    assert!(position("EventStrategy") < position("LimitRemoval"));

    let g = modern();
    let engine = TraversalEngine::with_strategies(config, registry);
    let all = engine
        .compile(g.v(&[]).limit(1).id(), ExecutionMode::Local)
        .unwrap()
        .to_list()
        .unwrap();
    assert_eq!(all.len(), 6);
}

#[derive(Debug)]
struct NeedsVerification;

impl TraversalStrategy for NeedsVerification {
    fn name(&self) -> &'static str {
        "NeedsVerification"
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Decoration
    }

    fn applies_prior(&self) -> Vec<&'static str> {
        vec!["DistributedVerificationStrategy"]
    }

    fn apply(&self, _traversal: &mut Traversal, _ctx: &StrategyContext) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_constraint_on_later_category_rejected() {
    let error = TraversalStrategies::builder_for(&EngineConfig::default())
        .add_strategy(NeedsVerification)
        .build()
        .unwrap_err();
    assert!(error.is_configuration());
}

#[test]
fn test_removed_strategy_no_longer_applies() {
    let registry = TraversalStrategies::builder_for(&EngineConfig::default())
        .remove_strategy("IdentityRemovalStrategy")
        .build()
        .unwrap();
    let mut traversal = __::out(&[]).identity();
    registry.apply(&mut traversal, ExecutionMode::Local).unwrap();
    assert_eq!(traversal.len(), 2);
}

#[test]
fn test_explain_tracks_rewrites() {
    let engine = testutils::engine();
    let g = modern();
    let explanation = engine
        .explain(
            &g.v(&[]).identity().has("name", "marko").out(&[]).path(),
            ExecutionMode::Local,
        )
        .unwrap();

    let applied: Vec<&str> = explanation.applied().map(|s| s.strategy.as_str()).collect();
    assert_eq!(
        applied,
        vec![
            "IdentityRemovalStrategy",
            "PredicatePushdownStrategy",
            "PathRequirementStrategy"
        ]
    );
    assert!(explanation.final_traversal.starts_with("[GraphStep(vertex,[],"));
    assert!(explanation.final_traversal.contains("name.eq(\"marko\")"));
    assert!(explanation
        .format_explanation()
        .contains("PathRequirementStrategy [finalization]"));
}
