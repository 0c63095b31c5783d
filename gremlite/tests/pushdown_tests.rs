//! Predicate pushdown: storage queries absorb literal has() filters without
//! changing results

#[path = "testutils/mod.rs"]
mod testutils;

use gremlite::{Compare, EngineConfig, ExecutionMode, StepKind, Traversal, TraversalSource, __};
use testutils::{engine_with, modern, strings};

fn without_pushdown() -> EngineConfig {
    EngineConfig {
        enable_pushdown: false,
        ..EngineConfig::default()
    }
}

fn assert_transparent(build: impl Fn(&TraversalSource) -> Traversal) {
    let g = modern();
    let pushed = engine_with(EngineConfig::default())
        .compile(build(&g), ExecutionMode::Local)
        .unwrap()
        .to_list()
        .unwrap();
    let filtered = engine_with(without_pushdown())
        .compile(build(&g), ExecutionMode::Local)
        .unwrap()
        .to_list()
        .unwrap();
    assert_eq!(pushed, filtered);
}

#[test]
fn test_results_unchanged_by_pushdown() {
    testutils::init_logging();
    assert_transparent(|g| g.v(&[]).has("name", "marko").out(&[]).values(&["name"]));
    assert_transparent(|g| g.v(&[]).has_label(&["person"]).has_with("age", Compare::Lt, 30));
    assert_transparent(|g| g.v(&[]).out(&[]).has_label(&["software"]).id());
    assert_transparent(|g| g.v(&["1", "4"]).out_e(&[]).has_with("weight", Compare::Gte, 0.5));
    assert_transparent(|g| g.e(&[]).has("weight", 0.4).out_v().values(&["name"]));
    assert_transparent(|g| g.v(&[]).as_("a").has("lang", "java").identity().has_id(&["3"]));
}

#[test]
fn test_barrier_placement_unchanged_by_pushdown() {
    let build = |g: &TraversalSource| {
        g.v(&[])
            .both(&[])
            .both(&[])
            .both(&[])
            .has_label(&["person"])
            .values(&["name"])
    };
    assert_transparent(build);
    assert_transparent(|g| g.v(&[]).both(&[]).both(&[]).both(&[]).has("age", 32).both(&[]).id());

    let g = modern();
    let barriers = |config: EngineConfig| {
        engine_with(config)
            .compile(build(&g), ExecutionMode::Local)
            .unwrap()
            .traversal()
            .steps()
            .iter()
            .filter(|s| matches!(s.kind(), StepKind::NoOpBarrier { .. }))
            .count()
    };
    assert_eq!(barriers(EngineConfig::default()), barriers(without_pushdown()));
}

#[test]
fn test_has_folds_into_graph_step() {
    let g = modern();
    let compiled = engine_with(EngineConfig::default())
        .compile(
            g.v(&[]).has_label(&["person"]).has("name", "josh"),
            ExecutionMode::Local,
        )
        .unwrap();
    let steps = compiled.traversal().steps();
    assert_eq!(steps.len(), 1);
    match steps[0].kind() {
        StepKind::Graph { has_containers, .. } => assert_eq!(has_containers.len(), 2),
        other => panic!("unexpected step {:?}", other),
    }
}

#[test]
fn test_traversal_predicates_stay_in_place() {
    let g = modern();
    let build = || {
        g.v(&[])
            .has_traversal("age", Compare::Gt, __::in_(&["knows"]).values(&["age"]))
            .values(&["name"])
    };

    let mut compiled = engine_with(EngineConfig::default())
        .compile(build(), ExecutionMode::Local)
        .unwrap();
    assert!(compiled
        .traversal()
        .steps()
        .iter()
        .any(|s| matches!(s.kind(), StepKind::Has { .. })));
    assert_eq!(strings(&compiled.to_list().unwrap()), vec!["josh"]);
}

#[test]
fn test_labels_survive_pushdown() {
    let g = modern();
    let rows = engine_with(EngineConfig::default())
        .compile(
            g.v(&[]).has("name", "marko").as_("m").out(&["knows"]).select(&["m"]),
            ExecutionMode::Local,
        )
        .unwrap()
        .to_list()
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.element_id() == Some("1")));
}
