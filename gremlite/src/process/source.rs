// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Traversal source: spawns traversals bound to a graph

use std::fmt;
use std::sync::Arc;

use crate::process::traversal::Traversal;
use crate::storage::{GraphProvider, Value};

/// Entry point for building root traversals over one graph
#[derive(Clone)]
pub struct TraversalSource {
    graph: Arc<dyn GraphProvider>,
}

impl TraversalSource {
    pub fn new(graph: Arc<dyn GraphProvider>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Arc<dyn GraphProvider> {
        &self.graph
    }

    /// Empty traversal bound to the graph
    pub fn traversal(&self) -> Traversal {
        Traversal::with_graph(Arc::clone(&self.graph))
    }

    /// All vertices, or those with the given ids
    pub fn v(&self, ids: &[&str]) -> Traversal {
        self.traversal().v(ids)
    }

    /// All edges, or those with the given ids
    pub fn e(&self, ids: &[&str]) -> Traversal {
        self.traversal().e(ids)
    }

    /// Create a vertex
    pub fn add_v(&self, label: &str) -> Traversal {
        self.traversal().add_v(label)
    }

    /// Start from arbitrary values
    pub fn inject(&self, values: Vec<Value>) -> Traversal {
        let mut traversal = self.traversal().start();
        for value in values {
            traversal.add_start_value(value);
        }
        traversal
    }
}

impl fmt::Debug for TraversalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalSource")
            .field("graph", &self.graph)
            .finish()
    }
}
