// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory graph cache implementation
//!
//! Provides graph storage using HashMap for vertices/edges and adjacency
//! lists for traversal. Insertion order is tracked separately so that
//! scans are deterministic.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::process::HasContainer;
use crate::storage::provider::{ensure_native, GraphProvider};
use crate::storage::types::{Direction, Edge, ElementKind, GraphError, StorageError, Vertex};
use crate::storage::value::{Value, ID_KEY};

/// Serialized form of a graph: the `--graph` file of the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Default)]
struct GraphData {
    /// All vertices indexed by ID
    vertices: HashMap<String, Vertex>,

    /// Vertex IDs in insertion order
    vertex_order: Vec<String>,

    /// All edges indexed by ID
    edges: HashMap<String, Edge>,

    /// Edge IDs in insertion order
    edge_order: Vec<String>,

    /// Adjacency list: vertex_id -> list of outgoing edge IDs
    adjacency_out: HashMap<String, Vec<String>>,

    /// Adjacency list: vertex_id -> list of incoming edge IDs
    adjacency_in: HashMap<String, Vec<String>>,
}

/// In-memory graph with adjacency indices, shareable across traversals
#[derive(Debug, Default)]
pub struct GraphCache {
    data: RwLock<GraphData>,
}

impl GraphCache {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from its serialized form
    pub fn from_document(document: GraphDocument) -> Result<Self, GraphError> {
        let graph = Self::new();
        for vertex in document.vertices {
            graph.add_vertex(vertex)?;
        }
        for edge in document.edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Parse a graph document from JSON
    pub fn from_json_str(json: &str) -> Result<Self, StorageError> {
        let document: GraphDocument =
            serde_json::from_str(json).map_err(|e| StorageError::LoadError(e.to_string()))?;
        Ok(Self::from_document(document)?)
    }

    /// Load a graph document file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StorageError::LoadError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }

    /// Add a vertex to the graph
    pub fn add_vertex(&self, vertex: Vertex) -> Result<(), GraphError> {
        let mut data = self.data.write();

        if data.vertices.contains_key(&vertex.id) {
            return Err(GraphError::VertexAlreadyExists(vertex.id));
        }

        data.adjacency_out.insert(vertex.id.clone(), Vec::new());
        data.adjacency_in.insert(vertex.id.clone(), Vec::new());
        data.vertex_order.push(vertex.id.clone());
        data.vertices.insert(vertex.id.clone(), vertex);

        Ok(())
    }

    /// Add an edge to the graph
    pub fn add_edge(&self, edge: Edge) -> Result<(), GraphError> {
        let mut data = self.data.write();

        if data.edges.contains_key(&edge.id) {
            return Err(GraphError::EdgeAlreadyExists(edge.id));
        }

        if !data.vertices.contains_key(&edge.out_vertex)
            || !data.vertices.contains_key(&edge.in_vertex)
        {
            return Err(GraphError::InvalidEdge {
                from: edge.out_vertex.clone(),
                to: edge.in_vertex.clone(),
            });
        }

        data.adjacency_out
            .entry(edge.out_vertex.clone())
            .or_default()
            .push(edge.id.clone());
        data.adjacency_in
            .entry(edge.in_vertex.clone())
            .or_default()
            .push(edge.id.clone());
        data.edge_order.push(edge.id.clone());
        data.edges.insert(edge.id.clone(), edge);

        Ok(())
    }

    /// Get a vertex snapshot by ID
    pub fn get_vertex(&self, id: &str) -> Option<Vertex> {
        self.data.read().vertices.get(id).cloned()
    }

    /// Get an edge snapshot by ID
    pub fn get_edge(&self, id: &str) -> Option<Edge> {
        self.data.read().edges.get(id).cloned()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.data.read().vertices.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.data.read().edges.len()
    }

    /// Check if the graph is empty (no vertices and no edges)
    pub fn is_empty(&self) -> bool {
        let data = self.data.read();
        data.vertices.is_empty() && data.edges.is_empty()
    }
}

fn passes(value: &Value, has: &[HasContainer]) -> bool {
    HasContainer::test_all(value, has)
}

impl GraphProvider for GraphCache {
    fn vertices(&self, ids: &[String], has: &[HasContainer]) -> Result<Vec<Value>, StorageError> {
        ensure_native(has)?;
        let data = self.data.read();
        let order: &[String] = if ids.is_empty() { &data.vertex_order } else { ids };

        Ok(order
            .iter()
            .filter_map(|id| data.vertices.get(id))
            .map(|vertex| Value::Vertex(vertex.clone()))
            .filter(|value| passes(value, has))
            .collect())
    }

    fn edges(&self, ids: &[String], has: &[HasContainer]) -> Result<Vec<Value>, StorageError> {
        ensure_native(has)?;
        let data = self.data.read();
        let order: &[String] = if ids.is_empty() { &data.edge_order } else { ids };

        Ok(order
            .iter()
            .filter_map(|id| data.edges.get(id))
            .map(|edge| Value::Edge(edge.clone()))
            .filter(|value| passes(value, has))
            .collect())
    }

    fn adjacent(
        &self,
        vertex: &Vertex,
        direction: Direction,
        edge_labels: &[String],
        returns: ElementKind,
        has: &[HasContainer],
    ) -> Result<Vec<Value>, StorageError> {
        ensure_native(has)?;
        let data = self.data.read();

        let mut incident: Vec<(&Edge, Direction)> = Vec::new();
        if matches!(direction, Direction::Out | Direction::Both) {
            if let Some(edge_ids) = data.adjacency_out.get(&vertex.id) {
                incident.extend(
                    edge_ids
                        .iter()
                        .filter_map(|id| data.edges.get(id))
                        .map(|e| (e, Direction::Out)),
                );
            }
        }
        if matches!(direction, Direction::In | Direction::Both) {
            if let Some(edge_ids) = data.adjacency_in.get(&vertex.id) {
                incident.extend(
                    edge_ids
                        .iter()
                        .filter_map(|id| data.edges.get(id))
                        .map(|e| (e, Direction::In)),
                );
            }
        }

        let mut results = Vec::new();
        for (edge, side) in incident {
            if !edge_labels.is_empty() && !edge_labels.iter().any(|l| *l == edge.label) {
                continue;
            }
            let value = match returns {
                ElementKind::Edge => Value::Edge(edge.clone()),
                ElementKind::Vertex => {
                    let other = match side {
                        Direction::Out => &edge.in_vertex,
                        _ => &edge.out_vertex,
                    };
                    match data.vertices.get(other) {
                        Some(v) => Value::Vertex(v.clone()),
                        None => return Err(GraphError::VertexNotFound(other.clone()).into()),
                    }
                }
            };
            if passes(&value, has) {
                results.push(value);
            }
        }

        Ok(results)
    }

    fn edge_vertices(&self, edge: &Edge, direction: Direction) -> Result<Vec<Value>, StorageError> {
        let data = self.data.read();
        edge.vertex_ids(direction)
            .into_iter()
            .map(|id| {
                data.vertices
                    .get(id)
                    .map(|v| Value::Vertex(v.clone()))
                    .ok_or_else(|| GraphError::VertexNotFound(id.to_string()).into())
            })
            .collect()
    }

    fn add_vertex(
        &self,
        label: &str,
        mut properties: BTreeMap<String, Value>,
    ) -> Result<Vertex, StorageError> {
        let id = match properties.remove(ID_KEY) {
            Some(Value::String(id)) => id,
            Some(other) => other.key_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let vertex = Vertex {
            id,
            label: label.to_string(),
            properties,
        };
        GraphCache::add_vertex(self, vertex.clone())?;
        log::trace!("Added vertex {} with label {}", vertex.id, vertex.label);
        Ok(vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Compare;

    fn small_graph() -> GraphCache {
        let graph = GraphCache::new();
        for (id, age) in [("1", 29), ("2", 27), ("3", 32)] {
            let mut vertex = Vertex::new(id.to_string(), "person".to_string());
            vertex.set_property("age".to_string(), Value::from(age));
            graph.add_vertex(vertex).unwrap();
        }
        graph
            .add_edge(Edge::new(
                "e1".to_string(),
                "1".to_string(),
                "2".to_string(),
                "knows".to_string(),
            ))
            .unwrap();
        graph
            .add_edge(Edge::new(
                "e2".to_string(),
                "1".to_string(),
                "3".to_string(),
                "created".to_string(),
            ))
            .unwrap();
        graph
    }

    #[test]
    fn test_scan_preserves_insertion_order() {
        let graph = small_graph();
        let ids: Vec<String> = graph
            .vertices(&[], &[])
            .unwrap()
            .iter()
            .map(|v| v.element_id().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_vertices_with_native_predicate() {
        let graph = small_graph();
        let has = vec![HasContainer::new("age", Compare::Gt, 28)];
        let found = graph.vertices(&[], &has).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_adjacent_filters_labels() {
        let graph = small_graph();
        let marko = graph.get_vertex("1").unwrap();
        let known = graph
            .adjacent(
                &marko,
                Direction::Out,
                &["knows".to_string()],
                ElementKind::Vertex,
                &[],
            )
            .unwrap();
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].element_id(), Some("2"));

        let incoming = graph
            .adjacent(&marko, Direction::In, &[], ElementKind::Edge, &[])
            .unwrap();
        assert!(incoming.is_empty());
    }

    #[test]
    fn test_duplicate_and_dangling_edges_rejected() {
        let graph = small_graph();
        assert!(graph
            .add_edge(Edge::new(
                "e1".to_string(),
                "2".to_string(),
                "3".to_string(),
                "knows".to_string()
            ))
            .is_err());
        assert!(graph
            .add_edge(Edge::new(
                "e9".to_string(),
                "1".to_string(),
                "404".to_string(),
                "knows".to_string()
            ))
            .is_err());
    }

    #[test]
    fn test_add_vertex_uses_explicit_id() {
        let graph = small_graph();
        let mut properties = BTreeMap::new();
        properties.insert(ID_KEY.to_string(), Value::from("42"));
        properties.insert("name".to_string(), Value::from("stephen"));

        let vertex = GraphProvider::add_vertex(&graph, "person", properties).unwrap();
        assert_eq!(vertex.id, "42");
        assert!(!vertex.has_property(ID_KEY));
        assert_eq!(graph.vertex_count(), 4);
    }

    #[test]
    fn test_from_json() {
        let graph = GraphCache::from_json_str(
            r#"{"vertices": [{"id": "a", "label": "person"}, {"id": "b", "label": "person"}],
                "edges": [{"id": "x", "label": "knows", "out_vertex": "a", "in_vertex": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.is_empty());
    }
}
