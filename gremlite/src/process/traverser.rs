// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Traversers - the tokens flowing through a step pipeline
//!
//! A traverser carries a current value, a bulk (multiplicity) and a loop
//! counter. Path-tracking traversers additionally record every step they
//! pass through, together with that step's labels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::Value;

/// Traverser variant used by a compiled traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TraverserMode {
    /// No path is kept; cheapest variant (default)
    #[default]
    Simple,

    /// Every traverser owns a full path; forks copy it
    PathTracking,
}

impl TraverserMode {
    /// Returns true if traversers created in this mode record paths
    pub fn tracks_paths(&self) -> bool {
        matches!(self, TraverserMode::PathTracking)
    }
}

/// One recorded position in a path
#[derive(Debug, Clone, PartialEq)]
pub struct PathEntry {
    pub labels: Vec<String>,
    pub value: Value,
}

/// Ordered history of the values a traverser has held
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    entries: Vec<PathEntry>,
}

impl Path {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value with the labels of the step that produced it
    pub fn extend(&mut self, value: Value, labels: &[String]) {
        self.entries.push(PathEntry {
            labels: labels.to_vec(),
            value,
        });
    }

    /// Attach labels to the most recent entry
    pub fn add_labels(&mut self, labels: &[String]) {
        if let Some(last) = self.entries.last_mut() {
            for label in labels {
                if !last.labels.contains(label) {
                    last.labels.push(label.clone());
                }
            }
        }
    }

    /// Most recent value recorded under `label`
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.labels.iter().any(|l| l == label))
            .map(|entry| &entry.value)
    }

    /// Check whether any entry carries `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// All recorded values, oldest first
    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|e| e.value.clone()).collect()
    }

    /// All recorded entries, oldest first
    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Token representing one value moving through a traversal
#[derive(Debug, Clone, PartialEq)]
pub struct Traverser {
    value: Value,
    path: Option<Path>,
    bulk: u64,
    loops: u32,
}

impl Traverser {
    /// Create a traverser emitted by a source step
    pub fn new(value: Value, mode: TraverserMode, labels: &[String]) -> Self {
        let path = if mode.tracks_paths() {
            let mut path = Path::new();
            path.extend(value.clone(), labels);
            Some(path)
        } else {
            None
        };
        Self {
            value,
            path,
            bulk: 1,
            loops: 0,
        }
    }

    /// Current value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the traverser, keeping its value
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Multiplicity represented by this traverser
    pub fn bulk(&self) -> u64 {
        self.bulk
    }

    pub fn set_bulk(&mut self, bulk: u64) {
        self.bulk = bulk;
    }

    /// Loop counter used by repeat-style steps
    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn incr_loops(&mut self) {
        self.loops += 1;
    }

    pub fn reset_loops(&mut self) {
        self.loops = 0;
    }

    /// Recorded path, `None` for simple traversers
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn path_mut(&mut self) -> Option<&mut Path> {
        self.path.as_mut()
    }

    pub fn is_path_tracking(&self) -> bool {
        self.path.is_some()
    }

    /// Most recent path value recorded under `label`
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.path.as_ref().and_then(|p| p.get(label))
    }

    /// Derive the traverser a map or flat-map step emits for `value`.
    ///
    /// Bulk and loop counter carry over; a path-tracking parent's path is
    /// copied and extended with the new value and the step's labels.
    pub fn split(&self, value: Value, labels: &[String]) -> Traverser {
        let path = self.path.as_ref().map(|path| {
            let mut path = path.clone();
            path.extend(value.clone(), labels);
            path
        });
        Traverser {
            value,
            path,
            bulk: self.bulk,
            loops: self.loops,
        }
    }

    /// Convert to `mode`, keeping bulk and loops. A traverser gaining path
    /// tracking starts a fresh path at its current value.
    pub fn into_mode(self, mode: TraverserMode) -> Traverser {
        if self.is_path_tracking() == mode.tracks_paths() {
            return self;
        }
        let mut converted = Traverser::new(self.value, mode, &[]);
        converted.bulk = self.bulk;
        converted.loops = self.loops;
        converted
    }

    /// Fork a sibling with the same value and an independent path copy
    pub fn fork(&self) -> Traverser {
        self.clone()
    }

    /// Record a pass-through step's labels on the current path position
    pub fn add_labels(&mut self, labels: &[String]) {
        if labels.is_empty() {
            return;
        }
        if let Some(path) = self.path.as_mut() {
            path.add_labels(labels);
        }
    }

    /// Whether two traversers may be merged into one with summed bulk
    pub fn same_position(&self, other: &Traverser) -> bool {
        self.loops == other.loops && self.value == other.value && self.path == other.path
    }
}

impl fmt::Display for Traverser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bulk == 1 {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{}x{}", self.value, self.bulk)
        }
    }
}
