//! End-to-end traversal execution over the modern graph

#[path = "testutils/mod.rs"]
mod testutils;

use gremlite::{
    CallbackRegistry, Compare, EngineConfig, Event, ExecutionMode, TraversalEngine,
    TraverserMode, Value, __,
};
use parking_lot::Mutex;
use std::sync::Arc;
use testutils::{compile, ids, modern, run, sorted, strings};

#[test]
fn test_out_by_edge_label() {
    testutils::init_logging();
    let g = modern();
    let names = run(g.v(&["1"]).out(&["knows"]).values(&["name"]));
    assert_eq!(strings(&names), vec!["vadas", "josh"]);
}

#[test]
fn test_in_edges_follow_insertion_order() {
    let g = modern();
    let names = run(g.v(&["3"]).in_(&["created"]).values(&["name"]));
    assert_eq!(strings(&names), vec!["marko", "josh", "peter"]);
}

#[test]
fn test_edge_hops() {
    let g = modern();
    let weights = run(g.v(&["4"]).out_e(&["created"]).values(&["weight"]));
    assert_eq!(weights, vec![Value::from(1.0), Value::from(0.4)]);

    let names = run(g.e(&["7"]).both_v().values(&["name"]));
    assert_eq!(strings(&names), vec!["marko", "vadas"]);
}

#[test]
fn test_has_filters() {
    let g = modern();
    let names = run(g
        .v(&[])
        .has_label(&["person"])
        .has_with("age", Compare::Gt, 30)
        .values(&["name"]));
    assert_eq!(strings(&names), vec!["josh", "peter"]);

    let names = run(g
        .v(&[])
        .has_with("name", Compare::Within, Value::List(vec!["lop".into(), "vadas".into()]))
        .id());
    assert_eq!(strings(&names), vec!["2", "3"]);
}

#[test]
fn test_interval_is_half_open() {
    let g = modern();
    let names = run(g.v(&[]).interval("age", 29, 35).values(&["name"]));
    assert_eq!(strings(&names), vec!["marko", "josh"]);
}

#[test]
fn test_where_and_union() {
    let g = modern();
    let creators = run(g.v(&[]).where_(__::out(&["created"])).values(&["name"]));
    assert_eq!(strings(&creators), vec!["marko", "josh", "peter"]);

    let neighbours = run(g
        .v(&["4"])
        .union(vec![__::out(&[]), __::in_(&[])])
        .values(&["name"]));
    assert_eq!(strings(&neighbours), vec!["ripple", "lop", "marko"]);
}

#[test]
fn test_dedup_limit_and_group_count() {
    let g = modern();
    let software = run(g.v(&[]).out(&["created"]).dedup().values(&["name"]));
    assert_eq!(strings(&software), vec!["lop", "ripple"]);

    let first_two = run(g.v(&[]).out(&[]).limit(2).id());
    assert_eq!(strings(&first_two), vec!["2", "4"]);

    let counts = run(g.v(&[]).out(&["created"]).values(&["name"]).group_count());
    let expected: Value = Value::Map(
        [
            ("lop".to_string(), Value::from(3)),
            ("ripple".to_string(), Value::from(1)),
        ]
        .into_iter()
        .collect(),
    );
    assert_eq!(counts, vec![expected]);
}

#[test]
fn test_lambdas_run_locally() {
    let g = modern();
    let upper = run(g
        .v(&["1"])
        .out(&["knows"])
        .values(&["name"])
        .map("upper", |v: &Value| {
            Ok(Value::from(v.as_string().unwrap_or_default().to_uppercase()))
        }));
    assert_eq!(strings(&upper), vec!["VADAS", "JOSH"]);
}

#[test]
fn test_path_forks_are_independent() {
    let g = modern();
    let mut compiled = compile(g.v(&["1"]).out(&[]).path());
    assert_eq!(compiled.traverser_mode(), TraverserMode::PathTracking);

    let paths = compiled.to_list().unwrap();
    assert_eq!(paths.len(), 3);
    let ends: Vec<String> = paths
        .iter()
        .map(|path| {
            let steps = path.as_list().expect("path is a list");
            assert_eq!(steps.len(), 2);
            assert_eq!(steps[0].element_id(), Some("1"));
            steps[1].element_id().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(ends, vec!["2", "4", "3"]);
}

#[test]
fn test_select_labels() {
    let g = modern();
    let rows = run(g
        .v(&["1"])
        .as_("a")
        .out(&["knows"])
        .as_("b")
        .select(&["a", "b"]));
    assert_eq!(rows.len(), 2);
    let map = rows[1].as_map().expect("select with two labels yields a map");
    assert_eq!(map["a"].element_id(), Some("1"));
    assert_eq!(map["b"].element_id(), Some("4"));
}

#[test]
fn test_add_vertex_notifies_listeners() {
    let g = modern();
    let added = Arc::new(Mutex::new(Vec::new()));
    let mut callbacks = CallbackRegistry::new();
    let sink = Arc::clone(&added);
    callbacks.add_callback(move |event: &Event| {
        let Event::VertexAdded(vertex) = event;
        sink.lock().push(vertex.label.clone());
    });

    let engine = TraversalEngine::with_callbacks(EngineConfig::default(), callbacks).unwrap();
    let mut compiled = engine
        .compile(
            g.add_v("person").property("name", "stephen").property("age", 40),
            ExecutionMode::Local,
        )
        .unwrap();
    let created = compiled.to_list().unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(
        created[0].element_property("name"),
        Some(Value::from("stephen"))
    );
    assert_eq!(*added.lock(), vec!["person".to_string()]);
    assert_eq!(run(g.v(&[]).count()), vec![Value::from(7)]);
}

#[test]
fn test_clones_run_on_worker_threads() {
    let g = modern();
    let compiled = compile(g.v(&[]).out(&[]).in_(&[]).id());
    let expected = sorted(strings(&compiled.clone().to_list().unwrap()));

    let results: Vec<Vec<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut worker = compiled.clone();
                scope.spawn(move || sorted(strings(&worker.to_list().unwrap())))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn test_inject_and_count() {
    let g = modern();
    let values = run(g.inject(vec![Value::from(1), Value::from(1), Value::from(2)]).dedup());
    assert_eq!(values, vec![Value::from(1), Value::from(2)]);
}

#[test]
fn test_non_element_input_is_an_evaluation_error() {
    let g = modern();
    let mut compiled = compile(g.inject(vec![Value::from("marko")]).out(&[]));
    let error = compiled.pull().unwrap_err();
    assert!(error.is_evaluation());
}

#[test]
fn test_exhausted_traversal_keeps_returning_none() {
    let g = modern();
    let mut compiled = compile(g.v(&["2"]).out(&[]));
    assert!(compiled.pull().unwrap().is_none());
    assert!(compiled.pull().unwrap().is_none());
    assert_eq!(ids(&compiled.to_list().unwrap()), Vec::<String>::new());
}

#[test]
fn test_injected_values_track_paths() {
    let g = modern();
    let mut compiled = compile(g.inject(vec![Value::from(1), Value::from(2)]).path());
    assert_eq!(compiled.traverser_mode(), TraverserMode::PathTracking);
    assert_eq!(
        compiled.to_list().unwrap(),
        vec![
            Value::List(vec![Value::from(1)]),
            Value::List(vec![Value::from(2)])
        ]
    );

    let selected = run(g.inject(vec![Value::from(1)]).as_("x").select(&["x"]));
    assert_eq!(selected, vec![Value::from(1)]);
}
