// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Insertion-ordered traverser multiset used by barriers

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};

use crate::process::traverser::Traverser;

/// Buffer that merges traversers at the same position by summing bulks.
///
/// The first occurrence of a position fixes its place in iteration order.
#[derive(Debug, Clone, Default)]
pub struct TraverserSet {
    traversers: VecDeque<Traverser>,
    buckets: HashMap<u64, Vec<usize>>,
    /// Position of `traversers[0]` in insertion numbering
    offset: usize,
}

fn position_hash(traverser: &Traverser) -> u64 {
    let mut hasher = DefaultHasher::new();
    traverser.value().hash(&mut hasher);
    traverser.loops().hash(&mut hasher);
    hasher.finish()
}

impl TraverserSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a traverser, merging it into an equal one if present
    pub fn add(&mut self, traverser: Traverser) {
        let hash = position_hash(&traverser);
        if let Some(indices) = self.buckets.get(&hash) {
            for &index in indices {
                if let Some(existing) = self.traversers.get_mut(index - self.offset) {
                    if existing.same_position(&traverser) {
                        let bulk = existing.bulk() + traverser.bulk();
                        existing.set_bulk(bulk);
                        return;
                    }
                }
            }
        }
        let index = self.offset + self.traversers.len();
        self.buckets.entry(hash).or_default().push(index);
        self.traversers.push_back(traverser);
    }

    /// Remove the oldest traverser
    pub fn remove_first(&mut self) -> Option<Traverser> {
        let traverser = self.traversers.pop_front()?;
        let index = self.offset;
        self.offset += 1;
        let hash = position_hash(&traverser);
        if let Some(indices) = self.buckets.get_mut(&hash) {
            indices.retain(|&i| i != index);
            if indices.is_empty() {
                self.buckets.remove(&hash);
            }
        }
        if self.traversers.is_empty() {
            self.offset = 0;
        }
        Some(traverser)
    }

    /// Number of distinct positions held
    pub fn len(&self) -> usize {
        self.traversers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traversers.is_empty()
    }

    /// Sum of all bulks
    pub fn bulk_size(&self) -> u64 {
        self.traversers.iter().map(|t| t.bulk()).sum()
    }

    pub fn clear(&mut self) {
        self.traversers.clear();
        self.buckets.clear();
        self.offset = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Traverser> {
        self.traversers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::TraverserMode;
    use crate::storage::Value;

    fn simple(value: i64) -> Traverser {
        Traverser::new(Value::from(value), TraverserMode::Simple, &[])
    }

    #[test]
    fn test_merges_equal_positions() {
        let mut set = TraverserSet::new();
        set.add(simple(1));
        set.add(simple(2));
        set.add(simple(1));

        assert_eq!(set.len(), 2);
        assert_eq!(set.bulk_size(), 3);

        let first = set.remove_first().unwrap();
        assert_eq!(first.value(), &Value::from(1));
        assert_eq!(first.bulk(), 2);
    }

    #[test]
    fn test_merge_after_partial_drain() {
        let mut set = TraverserSet::new();
        set.add(simple(1));
        set.add(simple(2));
        assert_eq!(set.remove_first().unwrap().value(), &Value::from(1));

        set.add(simple(2));
        set.add(simple(1));
        assert_eq!(set.len(), 2);

        let second = set.remove_first().unwrap();
        assert_eq!(second.value(), &Value::from(2));
        assert_eq!(second.bulk(), 2);
        let third = set.remove_first().unwrap();
        assert_eq!(third.value(), &Value::from(1));
        assert_eq!(third.bulk(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn test_distinct_paths_not_merged() {
        let mut set = TraverserSet::new();
        let a = Traverser::new(Value::from(1), TraverserMode::PathTracking, &["a".to_string()]);
        let b = Traverser::new(Value::from(1), TraverserMode::PathTracking, &["b".to_string()]);
        set.add(a);
        set.add(b);
        assert_eq!(set.len(), 2);
        set.clear();
        assert!(set.is_empty());
    }
}
