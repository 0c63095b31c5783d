//! Compile-time verification: distributed execution and match clause graphs

#[path = "testutils/mod.rs"]
mod testutils;

use gremlite::{Compare, ExecutionMode, TraversalError, Value, __};
use testutils::{engine, modern};

fn verification_parts(error: TraversalError) -> (String, String) {
    match error {
        TraversalError::Verification { strategy, step, .. } => (strategy, step),
        other => panic!("expected a verification error, got {:?}", other),
    }
}

#[test]
fn test_lambda_rejected_only_when_distributed() {
    testutils::init_logging();
    let g = modern();
    let build = || g.v(&[]).filter("adults", |v: &Value| v.element_property("age").is_some());

    let error = engine()
        .compile(build(), ExecutionMode::Distributed)
        .unwrap_err();
    let (strategy, step) = verification_parts(error);
    assert_eq!(strategy, "DistributedVerificationStrategy");
    assert_eq!(step, "LambdaStep(filter:adults)");

    let results = engine()
        .compile(build(), ExecutionMode::Local)
        .unwrap()
        .to_list()
        .unwrap();
    assert_eq!(results.len(), 4);
}

#[test]
fn test_nested_lambdas_rejected() {
    let g = modern();
    let in_where = g
        .v(&[])
        .where_(__::out(&[]).side_effect("log", |_: &Value| {}));
    assert!(engine()
        .compile(in_where, ExecutionMode::Distributed)
        .unwrap_err()
        .is_verification());

    let in_predicate = g.v(&[]).has_traversal(
        "age",
        Compare::Eq,
        __::values(&["age"]).map("double", |v: &Value| {
            Ok(Value::from(v.as_number().unwrap_or_default() * 2.0))
        }),
    );
    assert!(engine()
        .compile(in_predicate, ExecutionMode::Distributed)
        .unwrap_err()
        .is_verification());

    let in_match = g.v(&[]).match_(
        "a",
        None,
        vec![__::as_("a")
            .flat_map("twice", |v: &Value| vec![v.clone(), v.clone()])
            .as_("b")],
    );
    assert!(engine()
        .compile(in_match, ExecutionMode::Distributed)
        .unwrap_err()
        .is_verification());
}

#[test]
fn test_lambda_free_traversal_distributes() {
    let g = modern();
    let compiled = engine()
        .compile(
            g.v(&[]).out(&["created"]).has("lang", "java").count(),
            ExecutionMode::Distributed,
        )
        .unwrap();
    assert_eq!(compiled.mode(), ExecutionMode::Distributed);
}

#[test]
fn test_unreachable_match_clause_rejected() {
    let g = modern();
    let error = engine()
        .compile(
            g.v(&[]).match_(
                "a",
                None,
                vec![
                    __::as_("a").out(&[]).as_("b"),
                    __::as_("x").out(&[]).as_("y"),
                ],
            ),
            ExecutionMode::Local,
        )
        .unwrap_err();
    let (strategy, step) = verification_parts(error);
    assert_eq!(strategy, "MatchVerificationStrategy");
    assert!(step.starts_with("MatchStep"));
}

#[test]
fn test_failed_compilation_does_not_mutate_graph() {
    let g = modern();
    let error = engine()
        .compile(
            g.add_v("person").map("noop", |v: &Value| Ok(v.clone())),
            ExecutionMode::Distributed,
        )
        .unwrap_err();
    assert!(error.is_verification());
    let count = engine()
        .compile(g.v(&[]).count(), ExecutionMode::Local)
        .unwrap()
        .to_list()
        .unwrap();
    assert_eq!(count, vec![Value::from(6)]);
}

#[test]
fn test_lambda_free_traversals_workers_cannot_run() {
    let g = modern();
    let rejected = vec![
        (
            g.v(&[]).out(&[]).union(vec![__::out(&[]).count(), __::in_(&[]).count()]),
            "CountStep",
        ),
        (
            g.v(&[]).where_(__::out(&[]).values(&["name"])),
            "PropertiesStep",
        ),
        (g.v(&[]).group_count().out(&[]).count(), "GroupCountStep"),
    ];
    for (traversal, offending) in rejected {
        let error = engine()
            .compile(traversal.clone(), ExecutionMode::Distributed)
            .unwrap_err();
        let (strategy, step) = verification_parts(error);
        assert_eq!(strategy, "DistributedVerificationStrategy");
        assert!(step.starts_with(offending), "{} rejected at {}", traversal, step);
        assert!(engine().compile(traversal, ExecutionMode::Local).is_ok());
    }
}

#[test]
fn test_recompiled_traversal_verified_for_new_mode() {
    let g = modern();
    let local = engine()
        .compile(
            g.v(&[]).map("ident", |v: &Value| Ok(v.clone())),
            ExecutionMode::Local,
        )
        .unwrap();
    assert!(local.traversal().is_locked());

    let error = engine()
        .compile(local.into_traversal(), ExecutionMode::Distributed)
        .unwrap_err();
    let (strategy, step) = verification_parts(error);
    assert_eq!(strategy, "DistributedVerificationStrategy");
    assert_eq!(step, "LambdaStep(map:ident)");
}
