// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage collaborator interface
//!
//! The traversal engine never inspects how a storage backend evaluates a
//! query. It hands over natively evaluable `HasContainer`s attached to a
//! storage-query step and consumes the matching elements in the order the
//! backend returns them.

use std::collections::BTreeMap;
use std::fmt;

use crate::process::HasContainer;
use crate::storage::types::{Direction, Edge, ElementKind, StorageError, Vertex};
use crate::storage::value::Value;

/// Backend a traversal reads from and writes to
///
/// Implementations must return results in a deterministic order for a given
/// graph state: predicate pushdown relies on a pushed-down query yielding the
/// same ordered elements as an unfiltered query followed by a filter.
pub trait GraphProvider: fmt::Debug + Send + Sync {
    /// Vertices with the given ids (all vertices when `ids` is empty) that
    /// satisfy every container
    fn vertices(&self, ids: &[String], has: &[HasContainer]) -> Result<Vec<Value>, StorageError>;

    /// Edges with the given ids (all edges when `ids` is empty) that satisfy
    /// every container
    fn edges(&self, ids: &[String], has: &[HasContainer]) -> Result<Vec<Value>, StorageError>;

    /// Edges incident to `vertex`, or the vertices at their other end,
    /// filtered by edge label and by `has` on the returned elements
    fn adjacent(
        &self,
        vertex: &Vertex,
        direction: Direction,
        edge_labels: &[String],
        returns: ElementKind,
        has: &[HasContainer],
    ) -> Result<Vec<Value>, StorageError>;

    /// Endpoints of `edge` in the given direction
    fn edge_vertices(&self, edge: &Edge, direction: Direction) -> Result<Vec<Value>, StorageError>;

    /// Create a vertex and return a snapshot of it
    fn add_vertex(
        &self,
        label: &str,
        properties: BTreeMap<String, Value>,
    ) -> Result<Vertex, StorageError>;
}

/// Reject containers a backend cannot evaluate natively
pub fn ensure_native(has: &[HasContainer]) -> Result<(), StorageError> {
    match has.iter().find(|container| !container.is_native()) {
        Some(container) => Err(StorageError::UnsupportedPredicate(container.to_string())),
        None => Ok(()),
    }
}
