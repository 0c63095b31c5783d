// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value type system for traverser payloads and element properties
//!
//! Supports the data carried through a traversal:
//! - Basic types: String, Number, Boolean, Null
//! - Collections: List, Map
//! - Graph elements: Vertex, Edge

use crate::storage::types::{Edge, Vertex};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Property key addressing an element's identifier
pub const ID_KEY: &str = "~id";

/// Property key addressing an element's label
pub const LABEL_KEY: &str = "~label";

/// Value flowing through a traversal
///
/// Serialized untagged, so JSON scalars, arrays and objects map directly
/// onto the corresponding variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Vertex(Vertex),
    Edge(Edge),
    Null,
}

impl Value {
    /// Extract as number if possible
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract as string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract as boolean if possible
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract as list if possible
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Extract as map if possible
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Extract as vertex if possible
    pub fn as_vertex(&self) -> Option<&Vertex> {
        match self {
            Value::Vertex(v) => Some(v),
            _ => None,
        }
    }

    /// Extract as edge if possible
    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Value::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// Check if value is a graph element
    pub fn is_element(&self) -> bool {
        matches!(self, Value::Vertex(_) | Value::Edge(_))
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Element identifier, if this value is an element
    pub fn element_id(&self) -> Option<&str> {
        match self {
            Value::Vertex(v) => Some(&v.id),
            Value::Edge(e) => Some(&e.id),
            _ => None,
        }
    }

    /// Element label, if this value is an element
    pub fn element_label(&self) -> Option<&str> {
        match self {
            Value::Vertex(v) => Some(&v.label),
            Value::Edge(e) => Some(&e.label),
            _ => None,
        }
    }

    /// Resolve a property key against an element.
    ///
    /// `~id` and `~label` resolve to the element's identity; any other key
    /// resolves to a stored property. Non-elements have no properties.
    pub fn element_property(&self, key: &str) -> Option<Value> {
        match key {
            ID_KEY => self.element_id().map(|id| Value::String(id.to_string())),
            LABEL_KEY => self.element_label().map(|l| Value::String(l.to_string())),
            _ => match self {
                Value::Vertex(v) => v.get_property(key).cloned(),
                Value::Edge(e) => e.get_property(key).cloned(),
                _ => None,
            },
        }
    }

    /// Order two values of the same type.
    ///
    /// Returns `None` for values of different types and for collections and
    /// elements, which have no natural order.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Key used when values are grouped, e.g. by `groupCount()`
    pub fn key_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Number(_) => "Number",
            Value::Boolean(_) => "Boolean",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Vertex(_) => "Vertex",
            Value::Edge(_) => "Edge",
            Value::Null => "Null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                write!(f, "}}")
            }
            Value::Vertex(vertex) => write!(f, "v[{}]", vertex.id),
            Value::Edge(edge) => write!(
                f,
                "e[{}][{}-{}->{}]",
                edge.id, edge.out_vertex, edge.label, edge.in_vertex
            ),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Convert from Rust primitive types to Value
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vec: Vec<T>) -> Self {
        Value::List(vec.into_iter().map(Into::into).collect())
    }
}

impl From<Vertex> for Value {
    fn from(vertex: Vertex) -> Self {
        Value::Vertex(vertex)
    }
}

impl From<Edge> for Value {
    fn from(edge: Edge) -> Self {
        Value::Edge(edge)
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0.hash(state),
            Value::Boolean(b) => {
                1.hash(state);
                b.hash(state);
            }
            Value::Number(n) => {
                2.hash(state);
                // Handle NaN and signed zero consistently
                if n.is_nan() {
                    "NaN".hash(state);
                } else if *n == 0.0 {
                    0u64.hash(state);
                } else {
                    n.to_bits().hash(state);
                }
            }
            Value::String(s) => {
                3.hash(state);
                s.hash(state);
            }
            Value::List(list) => {
                4.hash(state);
                list.len().hash(state);
                for item in list {
                    item.hash(state);
                }
            }
            Value::Map(map) => {
                5.hash(state);
                map.len().hash(state);
                for (key, item) in map {
                    key.hash(state);
                    item.hash(state);
                }
            }
            Value::Vertex(vertex) => {
                6.hash(state);
                vertex.id.hash(state);
            }
            Value::Edge(edge) => {
                7.hash(state);
                edge.id.hash(state);
            }
        }
    }
}
