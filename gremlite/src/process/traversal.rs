// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Traversals: ordered step pipelines
//!
//! Steps live in a `Vec` arena owned by the traversal. A step's upstream is
//! the step before it; the first step reads from the traversal's start
//! queue. Pulling the last step recursively pulls its predecessors, one
//! traverser at a time.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::process::event::CallbackRegistry;
use crate::process::lambda::{Lambda, LambdaFunction};
use crate::process::predicate::{self, Compare, HasContainer};
use crate::process::step::{MatchStep, Step, StepKind};
use crate::process::traverser::{Traverser, TraverserMode};
use crate::storage::{Direction, ElementKind, GraphProvider, Value};

/// What every step of a running traversal shares
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    pub graph: Option<Arc<dyn GraphProvider>>,
    pub mode: TraverserMode,
}

/// The part of a traversal in front of the step being pulled
pub struct Upstream<'a> {
    steps: &'a mut [Step],
    starts: &'a mut VecDeque<Traverser>,
    ctx: &'a ExecutionContext,
}

impl<'a> Upstream<'a> {
    /// Pull the next traverser from the previous step
    pub fn next(&mut self) -> Result<Option<Traverser>> {
        pull(&mut *self.steps, &mut *self.starts, self.ctx)
    }

    /// True when the pulled step is the first of its traversal
    pub fn is_source(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn ctx(&self) -> &'a ExecutionContext {
        self.ctx
    }
}

fn pull(
    steps: &mut [Step],
    starts: &mut VecDeque<Traverser>,
    ctx: &ExecutionContext,
) -> Result<Option<Traverser>> {
    match steps.split_last_mut() {
        None => Ok(starts.pop_front()),
        Some((step, upstream)) => {
            let mut upstream = Upstream {
                steps: upstream,
                starts,
                ctx,
            };
            step.process_next(&mut upstream)
        }
    }
}

/// An ordered, mutable sequence of steps
#[derive(Debug, Clone, Default)]
pub struct Traversal {
    steps: Vec<Step>,
    starts: VecDeque<Traverser>,
    context: ExecutionContext,
    locked: bool,
}

impl Traversal {
    /// Create an empty traversal not bound to any graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty traversal reading from `graph`
    pub fn with_graph(graph: Arc<dyn GraphProvider>) -> Self {
        let mut traversal = Self::new();
        traversal.context.graph = Some(graph);
        traversal
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut Vec<Step> {
        &mut self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn graph(&self) -> Option<&Arc<dyn GraphProvider>> {
        self.context.graph.as_ref()
    }

    pub fn set_graph(&mut self, graph: Arc<dyn GraphProvider>) {
        self.context.graph = Some(graph);
    }

    pub fn traverser_mode(&self) -> TraverserMode {
        self.context.mode
    }

    /// Set the traverser variant for this traversal and all its children
    pub fn set_traverser_mode(&mut self, mode: TraverserMode) {
        self.context.mode = mode;
        self.starts = self.starts.drain(..).map(|t| t.into_mode(mode)).collect();
        for child in self.children_mut() {
            child.set_traverser_mode(mode);
        }
    }

    /// Whether strategies have been applied and the step list is frozen
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Append a step
    pub fn add_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn insert_step(&mut self, index: usize, step: Step) {
        self.steps.insert(index, step);
    }

    pub fn remove_step(&mut self, index: usize) -> Step {
        self.steps.remove(index)
    }

    /// Direct children of every step
    pub fn children(&self) -> Vec<&Traversal> {
        self.steps.iter().flat_map(|step| step.children()).collect()
    }

    pub fn children_mut(&mut self) -> Vec<&mut Traversal> {
        self.steps
            .iter_mut()
            .flat_map(|step| step.children_mut())
            .collect()
    }

    /// Queue a traverser for the first step, converted to this traversal's
    /// traverser variant
    pub fn add_start(&mut self, traverser: Traverser) {
        self.starts.push_back(traverser.into_mode(self.context.mode));
    }

    /// Queue a plain value as a start traverser
    pub fn add_start_value(&mut self, value: Value) {
        let traverser = Traverser::new(value, self.context.mode, &[]);
        self.starts.push_back(traverser);
    }

    /// Discard queued starts and every step's runtime state
    pub fn reset(&mut self) {
        self.starts.clear();
        for step in &mut self.steps {
            step.reset();
        }
    }

    /// Pull the next result, `Ok(None)` once exhausted
    pub fn next(&mut self) -> Result<Option<Traverser>> {
        let Traversal {
            steps,
            starts,
            context,
            ..
        } = self;
        pull(steps, starts, context)
    }

    /// Drain every result, expanding bulk
    pub fn to_list(&mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        while let Some(traverser) = self.next()? {
            for _ in 1..traverser.bulk() {
                values.push(traverser.value().clone());
            }
            values.push(traverser.into_value());
        }
        Ok(values)
    }

    /// Drain every result traverser as-is
    pub fn to_traversers(&mut self) -> Result<Vec<Traverser>> {
        let mut traversers = Vec::new();
        while let Some(traverser) = self.next()? {
            traversers.push(traverser);
        }
        Ok(traversers)
    }

    /// Drain for side effects only
    pub fn iterate(&mut self) -> Result<()> {
        while self.next()?.is_some() {}
        Ok(())
    }

    /// Prepare this traversal to run as a child from one start
    pub(crate) fn start_from(&mut self, start: Traverser) {
        self.reset();
        self.starts.push_back(start);
    }

    /// Pull the next child result under the parent's context
    pub(crate) fn pull_child(&mut self, ctx: &ExecutionContext) -> Result<Option<Traverser>> {
        pull(&mut self.steps, &mut self.starts, ctx)
    }

    /// Run this traversal as a child from one start, returning its first
    /// result. Runs under the parent's context.
    pub(crate) fn first_from(
        &mut self,
        start: Traverser,
        ctx: &ExecutionContext,
    ) -> Result<Option<Traverser>> {
        self.start_from(start);
        self.pull_child(ctx)
    }

    /// Run this traversal as a child from one start, returning all results
    pub(crate) fn all_from(
        &mut self,
        start: Traverser,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Traverser>> {
        self.start_from(start);
        let mut results = Vec::new();
        while let Some(traverser) = self.pull_child(ctx)? {
            results.push(traverser);
        }
        Ok(results)
    }

    fn push(self, kind: StepKind) -> Self {
        self.add_step(Step::new(kind))
    }

    fn vertex_step(self, direction: Direction, edge_labels: &[&str], returns: ElementKind) -> Self {
        self.push(StepKind::Vertex {
            direction,
            edge_labels: edge_labels.iter().map(|l| l.to_string()).collect(),
            returns,
            has_containers: Vec::new(),
        })
    }

    // ----- builder -----

    /// Label the last step; on an empty traversal, add a labeled start
    pub fn as_(mut self, label: &str) -> Self {
        match self.steps.last_mut() {
            Some(step) => step.add_label(label),
            None => self
                .steps
                .push(Step::new(StepKind::Start).with_labels(vec![label.to_string()])),
        }
        self
    }

    pub fn start(self) -> Self {
        self.push(StepKind::Start)
    }

    pub fn v(self, ids: &[&str]) -> Self {
        self.push(StepKind::Graph {
            returns: ElementKind::Vertex,
            ids: ids.iter().map(|id| id.to_string()).collect(),
            has_containers: Vec::new(),
        })
    }

    pub fn e(self, ids: &[&str]) -> Self {
        self.push(StepKind::Graph {
            returns: ElementKind::Edge,
            ids: ids.iter().map(|id| id.to_string()).collect(),
            has_containers: Vec::new(),
        })
    }

    pub fn out(self, edge_labels: &[&str]) -> Self {
        self.vertex_step(Direction::Out, edge_labels, ElementKind::Vertex)
    }

    pub fn in_(self, edge_labels: &[&str]) -> Self {
        self.vertex_step(Direction::In, edge_labels, ElementKind::Vertex)
    }

    pub fn both(self, edge_labels: &[&str]) -> Self {
        self.vertex_step(Direction::Both, edge_labels, ElementKind::Vertex)
    }

    pub fn out_e(self, edge_labels: &[&str]) -> Self {
        self.vertex_step(Direction::Out, edge_labels, ElementKind::Edge)
    }

    pub fn in_e(self, edge_labels: &[&str]) -> Self {
        self.vertex_step(Direction::In, edge_labels, ElementKind::Edge)
    }

    pub fn both_e(self, edge_labels: &[&str]) -> Self {
        self.vertex_step(Direction::Both, edge_labels, ElementKind::Edge)
    }

    pub fn out_v(self) -> Self {
        self.push(StepKind::EdgeVertex {
            direction: Direction::Out,
        })
    }

    pub fn in_v(self) -> Self {
        self.push(StepKind::EdgeVertex {
            direction: Direction::In,
        })
    }

    pub fn both_v(self) -> Self {
        self.push(StepKind::EdgeVertex {
            direction: Direction::Both,
        })
    }

    /// Filter on property equality
    pub fn has(self, key: &str, value: impl Into<Value>) -> Self {
        self.has_with(key, Compare::Eq, value)
    }

    /// Filter on a property comparison
    pub fn has_with(self, key: &str, compare: Compare, value: impl Into<Value>) -> Self {
        self.push(StepKind::Has {
            containers: vec![HasContainer::new(key, compare, value)],
        })
    }

    /// Filter on a property compared against a child traversal's result
    pub fn has_traversal(self, key: &str, compare: Compare, traversal: Traversal) -> Self {
        self.push(StepKind::Has {
            containers: vec![HasContainer::with_traversal(key, compare, traversal)],
        })
    }

    /// Filter on `start <= key < end`
    pub fn interval(self, key: &str, start: impl Into<Value>, end: impl Into<Value>) -> Self {
        self.push(StepKind::Has {
            containers: vec![
                HasContainer::new(key, Compare::Gte, start),
                HasContainer::new(key, Compare::Lt, end),
            ],
        })
    }

    pub fn has_label(self, labels: &[&str]) -> Self {
        let container = match labels {
            [label] => predicate::label_eq(label),
            _ => HasContainer::new(crate::storage::LABEL_KEY, Compare::Within, labels.to_vec()),
        };
        self.push(StepKind::Has {
            containers: vec![container],
        })
    }

    pub fn has_id(self, ids: &[&str]) -> Self {
        self.push(StepKind::Has {
            containers: vec![predicate::id_within(ids)],
        })
    }

    pub fn identity(self) -> Self {
        self.push(StepKind::Identity)
    }

    pub fn id(self) -> Self {
        self.push(StepKind::Id)
    }

    pub fn label(self) -> Self {
        self.push(StepKind::Label)
    }

    pub fn values(self, keys: &[&str]) -> Self {
        self.push(StepKind::Values {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        })
    }

    pub fn path(self) -> Self {
        self.push(StepKind::Path)
    }

    pub fn select(self, labels: &[&str]) -> Self {
        self.push(StepKind::Select {
            labels: labels.iter().map(|l| l.to_string()).collect(),
        })
    }

    pub fn where_(self, traversal: Traversal) -> Self {
        self.push(StepKind::Where(Box::new(traversal)))
    }

    pub fn union(self, traversals: Vec<Traversal>) -> Self {
        self.push(StepKind::Union(traversals))
    }

    pub fn limit(self, n: u64) -> Self {
        self.push(StepKind::Limit(n))
    }

    pub fn dedup(self) -> Self {
        self.push(StepKind::Dedup)
    }

    pub fn map<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.push(StepKind::Lambda(Lambda::new(
            name,
            LambdaFunction::Map(Arc::new(f)),
        )))
    }

    pub fn filter<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.push(StepKind::Lambda(Lambda::new(
            name,
            LambdaFunction::Filter(Arc::new(f)),
        )))
    }

    pub fn flat_map<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
    {
        self.push(StepKind::Lambda(Lambda::new(
            name,
            LambdaFunction::FlatMap(Arc::new(f)),
        )))
    }

    pub fn side_effect<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.push(StepKind::Lambda(Lambda::new(
            name,
            LambdaFunction::SideEffect(Arc::new(f)),
        )))
    }

    pub fn add_v(self, label: &str) -> Self {
        self.push(StepKind::AddVertex {
            label: label.to_string(),
            properties: BTreeMap::new(),
            callbacks: CallbackRegistry::new(),
        })
    }

    /// Set a property on the preceding `add_v`; ignored after other steps
    pub fn property(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Some(StepKind::AddVertex { properties, .. }) =
            self.steps.last_mut().map(|s| s.kind_mut())
        {
            properties.insert(key.to_string(), value.into());
        } else {
            log::warn!("property({}) ignored: previous step is not add_v", key);
        }
        self
    }

    pub fn barrier(self, max: usize) -> Self {
        self.push(StepKind::NoOpBarrier { max })
    }

    pub fn count(self) -> Self {
        self.push(StepKind::Count)
    }

    pub fn group_count(self) -> Self {
        self.push(StepKind::GroupCount)
    }

    /// Join `clauses` starting from the current value bound to `start`.
    ///
    /// Emits the value bound to `end`, or a map of all bindings when `end`
    /// is `None`.
    pub fn match_(self, start: &str, end: Option<&str>, clauses: Vec<Traversal>) -> Self {
        self.push(StepKind::Match(Box::new(MatchStep::new(start, end, clauses))))
    }
}

impl PartialEq for Traversal {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps && self.context.mode == other.context.mode
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, "]")
    }
}
