//! Test utilities for Gremlite integration tests
//!
//! Provides the classic "modern" toy graph:
//!
//! ```text
//! marko(1) -knows-> vadas(2)      marko(1) -created-> lop(3)
//! marko(1) -knows-> josh(4)       josh(4)  -created-> ripple(5)
//! josh(4)  -created-> lop(3)      peter(6) -created-> lop(3)
//! ```

#![allow(dead_code)]

use gremlite::{
    CompiledTraversal, Edge, EngineConfig, ExecutionMode, GraphCache, Traversal, TraversalEngine,
    TraversalSource, Value, Vertex,
};
use std::sync::Arc;

/// Route library logging to the test harness; RUST_LOG picks the level
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn person(id: &str, name: &str, age: i64) -> Vertex {
    let mut vertex = Vertex::new(id.to_string(), "person".to_string());
    vertex.set_property("name".to_string(), Value::from(name));
    vertex.set_property("age".to_string(), Value::from(age));
    vertex
}

fn software(id: &str, name: &str) -> Vertex {
    let mut vertex = Vertex::new(id.to_string(), "software".to_string());
    vertex.set_property("name".to_string(), Value::from(name));
    vertex.set_property("lang".to_string(), Value::from("java"));
    vertex
}

fn edge(id: &str, out: &str, label: &str, inv: &str, weight: f64) -> Edge {
    let mut edge = Edge::new(
        id.to_string(),
        out.to_string(),
        inv.to_string(),
        label.to_string(),
    );
    edge.set_property("weight".to_string(), Value::from(weight));
    edge
}

/// Build the modern graph
pub fn modern_graph() -> Arc<GraphCache> {
    let graph = GraphCache::new();
    let vertices = [
        person("1", "marko", 29),
        person("2", "vadas", 27),
        software("3", "lop"),
        person("4", "josh", 32),
        software("5", "ripple"),
        person("6", "peter", 35),
    ];
    for vertex in vertices {
        graph.add_vertex(vertex).expect("add vertex");
    }
    let edges = [
        edge("7", "1", "knows", "2", 0.5),
        edge("8", "1", "knows", "4", 1.0),
        edge("9", "1", "created", "3", 0.4),
        edge("10", "4", "created", "5", 1.0),
        edge("11", "4", "created", "3", 0.4),
        edge("12", "6", "created", "3", 0.2),
    ];
    for edge in edges {
        graph.add_edge(edge).expect("add edge");
    }
    Arc::new(graph)
}

/// Traversal source over a fresh modern graph
pub fn modern() -> TraversalSource {
    TraversalSource::new(modern_graph())
}

pub fn engine() -> TraversalEngine {
    TraversalEngine::new().expect("default engine")
}

pub fn engine_with(config: EngineConfig) -> TraversalEngine {
    TraversalEngine::with_config(config).expect("engine config")
}

/// Compile with the default engine for local execution
pub fn compile(traversal: Traversal) -> CompiledTraversal {
    engine()
        .compile(traversal, ExecutionMode::Local)
        .expect("compile")
}

/// Compile and drain
pub fn run(traversal: Traversal) -> Vec<Value> {
    compile(traversal).to_list().expect("execute")
}

/// String results, in order
pub fn strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

/// Element ids of the results, in order
pub fn ids(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.element_id().unwrap_or_default().to_string())
        .collect()
}

pub fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}
