// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Serializable traversal descriptions
//!
//! A `TraversalDescription` is the JSON form of a traversal accepted at the
//! query submission boundary. It has no way to express lambdas.
//!
//! ```json
//! {"steps": [{"step": "v"}, {"step": "out", "labels": ["knows"]},
//!            {"step": "has", "key": "age", "predicate": "gt", "value": 30},
//!            {"step": "values", "keys": ["name"]}]}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, TraversalError};
use crate::process::predicate::Compare;
use crate::process::source::TraversalSource;
use crate::process::traversal::Traversal;
use crate::storage::Value;

fn default_compare() -> Compare {
    Compare::Eq
}

/// One step of a description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepDescription {
    V {
        #[serde(default)]
        ids: Vec<String>,
    },
    E {
        #[serde(default)]
        ids: Vec<String>,
    },
    Out {
        #[serde(default)]
        labels: Vec<String>,
    },
    In {
        #[serde(default)]
        labels: Vec<String>,
    },
    Both {
        #[serde(default)]
        labels: Vec<String>,
    },
    OutE {
        #[serde(default)]
        labels: Vec<String>,
    },
    InE {
        #[serde(default)]
        labels: Vec<String>,
    },
    BothE {
        #[serde(default)]
        labels: Vec<String>,
    },
    OutV,
    InV,
    BothV,
    Has {
        key: String,
        #[serde(default = "default_compare")]
        predicate: Compare,
        value: Value,
    },
    HasLabel {
        labels: Vec<String>,
    },
    HasId {
        ids: Vec<String>,
    },
    As {
        label: String,
    },
    Identity,
    Id,
    Label,
    Values {
        #[serde(default)]
        keys: Vec<String>,
    },
    Path,
    Select {
        labels: Vec<String>,
    },
    Where {
        traversal: TraversalDescription,
    },
    Union {
        traversals: Vec<TraversalDescription>,
    },
    Limit {
        n: u64,
    },
    Dedup,
    AddV {
        label: String,
        #[serde(default)]
        properties: BTreeMap<String, Value>,
    },
    Barrier {
        size: usize,
    },
    Count,
    GroupCount,
    Match {
        start: String,
        #[serde(default)]
        end: Option<String>,
        clauses: Vec<TraversalDescription>,
    },
}

/// Lambda-free traversal in serializable form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalDescription {
    pub steps: Vec<StepDescription>,
}

fn strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

impl TraversalDescription {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TraversalError::Configuration(format!("Invalid traversal: {}", e)))
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TraversalError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Build an anonymous traversal
    pub fn build(&self) -> Traversal {
        self.build_onto(Traversal::new())
    }

    /// Build a root traversal bound to the source's graph
    pub fn build_with(&self, source: &TraversalSource) -> Traversal {
        self.build_onto(source.traversal())
    }

    fn build_onto(&self, traversal: Traversal) -> Traversal {
        self.steps.iter().fold(traversal, |t, step| match step {
            StepDescription::V { ids } => t.v(&strs(ids)),
            StepDescription::E { ids } => t.e(&strs(ids)),
            StepDescription::Out { labels } => t.out(&strs(labels)),
            StepDescription::In { labels } => t.in_(&strs(labels)),
            StepDescription::Both { labels } => t.both(&strs(labels)),
            StepDescription::OutE { labels } => t.out_e(&strs(labels)),
            StepDescription::InE { labels } => t.in_e(&strs(labels)),
            StepDescription::BothE { labels } => t.both_e(&strs(labels)),
            StepDescription::OutV => t.out_v(),
            StepDescription::InV => t.in_v(),
            StepDescription::BothV => t.both_v(),
            StepDescription::Has {
                key,
                predicate,
                value,
            } => t.has_with(key, *predicate, value.clone()),
            StepDescription::HasLabel { labels } => t.has_label(&strs(labels)),
            StepDescription::HasId { ids } => t.has_id(&strs(ids)),
            StepDescription::As { label } => t.as_(label),
            StepDescription::Identity => t.identity(),
            StepDescription::Id => t.id(),
            StepDescription::Label => t.label(),
            StepDescription::Values { keys } => t.values(&strs(keys)),
            StepDescription::Path => t.path(),
            StepDescription::Select { labels } => t.select(&strs(labels)),
            StepDescription::Where { traversal } => t.where_(traversal.build()),
            StepDescription::Union { traversals } => {
                t.union(traversals.iter().map(TraversalDescription::build).collect())
            }
            StepDescription::Limit { n } => t.limit(*n),
            StepDescription::Dedup => t.dedup(),
            StepDescription::AddV { label, properties } => properties
                .iter()
                .fold(t.add_v(label), |t, (key, value)| t.property(key, value.clone())),
            StepDescription::Barrier { size } => t.barrier(*size),
            StepDescription::Count => t.count(),
            StepDescription::GroupCount => t.group_count(),
            StepDescription::Match {
                start,
                end,
                clauses,
            } => t.match_(
                start,
                end.as_deref(),
                clauses.iter().map(TraversalDescription::build).collect(),
            ),
        })
    }
}
