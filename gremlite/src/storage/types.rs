// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph data structures and error types
//!
//! Defines Vertex and Edge structures for the in-memory graph,
//! along with error types for graph operations.

use crate::storage::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error types for graph operations
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Vertex not found: {0}")]
    VertexNotFound(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    #[error("Vertex already exists: {0}")]
    VertexAlreadyExists(String),

    #[error("Edge already exists: {0}")]
    EdgeAlreadyExists(String),

    #[error("Invalid edge: from vertex {from} to vertex {to} - one or both vertices don't exist")]
    InvalidEdge { from: String, to: String },
}

/// Error types for storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    #[error("Load error: {0}")]
    LoadError(String),
}

/// Edge direction relative to a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Out,
    In,
    Both,
}

impl Direction {
    /// The direction seen from the other end of an edge
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Out => Direction::In,
            Direction::In => Direction::Out,
            Direction::Both => Direction::Both,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Out => write!(f, "OUT"),
            Direction::In => write!(f, "IN"),
            Direction::Both => write!(f, "BOTH"),
        }
    }
}

/// Kind of element a storage query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Vertex,
    Edge,
}

/// Graph vertex with id, label, and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl Vertex {
    /// Create a new vertex with the given id and label
    pub fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            properties: BTreeMap::new(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: String, value: Value) {
        self.properties.insert(key, value);
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Check if vertex has a specific property
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}

/// Graph edge with id, endpoints, label, and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub label: String,
    /// Tail vertex id (the edge leaves this vertex)
    pub out_vertex: String,
    /// Head vertex id (the edge enters this vertex)
    pub in_vertex: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl Edge {
    /// Create a new edge
    pub fn new(id: String, out_vertex: String, in_vertex: String, label: String) -> Self {
        Self {
            id,
            label,
            out_vertex,
            in_vertex,
            properties: BTreeMap::new(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: String, value: Value) {
        self.properties.insert(key, value);
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Endpoint ids in the given direction, `Both` yields out then in
    pub fn vertex_ids(&self, direction: Direction) -> Vec<&str> {
        match direction {
            Direction::Out => vec![self.out_vertex.as_str()],
            Direction::In => vec![self.in_vertex.as_str()],
            Direction::Both => vec![self.out_vertex.as_str(), self.in_vertex.as_str()],
        }
    }

    /// The endpoint opposite to `vertex_id`
    pub fn other_end(&self, vertex_id: &str) -> &str {
        if self.out_vertex == vertex_id {
            &self.in_vertex
        } else {
            &self.out_vertex
        }
    }
}
