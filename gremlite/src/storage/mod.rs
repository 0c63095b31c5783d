// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph storage collaborator
//!
//! This module provides:
//! - Value type system for traverser payloads and properties
//! - The `GraphProvider` trait storage-query steps read through
//! - An in-memory reference graph with adjacency lists

pub mod graph_cache;
pub mod provider;
pub mod types;
pub mod value;

pub use graph_cache::{GraphCache, GraphDocument};
pub use provider::GraphProvider;
pub use types::{Direction, Edge, ElementKind, GraphError, StorageError, Vertex};
pub use value::{Value, ID_KEY, LABEL_KEY};
