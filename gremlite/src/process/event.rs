// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Mutation events and listener registration

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::storage::Vertex;

/// Detached snapshot of a graph mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    VertexAdded(Vertex),
}

/// Handle returned by `CallbackRegistry::add_callback`
pub type CallbackId = u64;

/// Listener invoked synchronously when a mutation step writes
pub type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// Ordered set of mutation listeners.
///
/// Ids are unique across registries, so a listener copied from one
/// registry into another keeps its identity.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    callbacks: Vec<(CallbackId, Callback)>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; listeners run in registration order
    pub fn add_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed);
        self.callbacks.push((id, Arc::new(callback)));
        id
    }

    /// Remove a listener, returning whether it was registered
    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    pub fn contains(&self, id: CallbackId) -> bool {
        self.callbacks.iter().any(|(existing, _)| *existing == id)
    }

    /// Copy every listener of `other` not already registered here
    pub fn merge(&mut self, other: &CallbackRegistry) {
        for (id, callback) in &other.callbacks {
            if !self.contains(*id) {
                self.callbacks.push((*id, Arc::clone(callback)));
            }
        }
    }

    pub fn ids(&self) -> Vec<CallbackId> {
        self.callbacks.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Deliver an event to every listener
    pub fn notify(&self, event: &Event) {
        for (_, callback) in &self.callbacks {
            callback(event);
        }
    }
}

impl PartialEq for CallbackRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.ids() == other.ids()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.ids())
            .finish()
    }
}
