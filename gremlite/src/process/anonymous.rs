// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Anonymous traversal constructors, re-exported as `gremlite::__`
//!
//! Each function starts an unbound child traversal, for use in `where_`,
//! `union`, `match_` and traversal-valued predicates.

use crate::error::Result;
use crate::process::predicate::Compare;
use crate::process::traversal::Traversal;
use crate::storage::Value;

pub fn start() -> Traversal {
    Traversal::new().start()
}

pub fn as_(label: &str) -> Traversal {
    Traversal::new().as_(label)
}

pub fn v(ids: &[&str]) -> Traversal {
    Traversal::new().v(ids)
}

pub fn out(edge_labels: &[&str]) -> Traversal {
    Traversal::new().out(edge_labels)
}

pub fn in_(edge_labels: &[&str]) -> Traversal {
    Traversal::new().in_(edge_labels)
}

pub fn both(edge_labels: &[&str]) -> Traversal {
    Traversal::new().both(edge_labels)
}

pub fn out_e(edge_labels: &[&str]) -> Traversal {
    Traversal::new().out_e(edge_labels)
}

pub fn in_e(edge_labels: &[&str]) -> Traversal {
    Traversal::new().in_e(edge_labels)
}

pub fn both_e(edge_labels: &[&str]) -> Traversal {
    Traversal::new().both_e(edge_labels)
}

pub fn out_v() -> Traversal {
    Traversal::new().out_v()
}

pub fn in_v() -> Traversal {
    Traversal::new().in_v()
}

pub fn both_v() -> Traversal {
    Traversal::new().both_v()
}

pub fn has(key: &str, value: impl Into<Value>) -> Traversal {
    Traversal::new().has(key, value)
}

pub fn has_with(key: &str, compare: Compare, value: impl Into<Value>) -> Traversal {
    Traversal::new().has_with(key, compare, value)
}

pub fn interval(key: &str, start: impl Into<Value>, end: impl Into<Value>) -> Traversal {
    Traversal::new().interval(key, start, end)
}

pub fn has_label(labels: &[&str]) -> Traversal {
    Traversal::new().has_label(labels)
}

pub fn has_id(ids: &[&str]) -> Traversal {
    Traversal::new().has_id(ids)
}

pub fn identity() -> Traversal {
    Traversal::new().identity()
}

pub fn id() -> Traversal {
    Traversal::new().id()
}

pub fn label() -> Traversal {
    Traversal::new().label()
}

pub fn values(keys: &[&str]) -> Traversal {
    Traversal::new().values(keys)
}

pub fn path() -> Traversal {
    Traversal::new().path()
}

pub fn select(labels: &[&str]) -> Traversal {
    Traversal::new().select(labels)
}

pub fn where_(traversal: Traversal) -> Traversal {
    Traversal::new().where_(traversal)
}

pub fn union(traversals: Vec<Traversal>) -> Traversal {
    Traversal::new().union(traversals)
}

pub fn limit(n: u64) -> Traversal {
    Traversal::new().limit(n)
}

pub fn dedup() -> Traversal {
    Traversal::new().dedup()
}

pub fn map<F>(name: &str, f: F) -> Traversal
where
    F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
{
    Traversal::new().map(name, f)
}

pub fn filter<F>(name: &str, f: F) -> Traversal
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Traversal::new().filter(name, f)
}

pub fn flat_map<F>(name: &str, f: F) -> Traversal
where
    F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
{
    Traversal::new().flat_map(name, f)
}

pub fn side_effect<F>(name: &str, f: F) -> Traversal
where
    F: Fn(&Value) + Send + Sync + 'static,
{
    Traversal::new().side_effect(name, f)
}

pub fn add_v(label: &str) -> Traversal {
    Traversal::new().add_v(label)
}

pub fn barrier(max: usize) -> Traversal {
    Traversal::new().barrier(max)
}

pub fn count() -> Traversal {
    Traversal::new().count()
}

pub fn group_count() -> Traversal {
    Traversal::new().group_count()
}

pub fn match_(start: &str, end: Option<&str>, clauses: Vec<Traversal>) -> Traversal {
    Traversal::new().match_(start, end, clauses)
}
