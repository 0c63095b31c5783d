// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pipeline steps
//!
//! A step is one stage of a traversal. Its definition is a closed
//! `StepKind`; its runtime data (output buffer, barrier contents, dedup
//! set, limit counter) lives in a separate `StepState` so that rewrite
//! strategies and equality only ever look at the definition.

mod execute;
pub mod match_step;

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

use crate::process::event::CallbackRegistry;
use crate::process::lambda::{Lambda, LambdaFunction};
use crate::process::predicate::HasContainer;
use crate::process::traversal::Traversal;
use crate::process::traverser::Traverser;
use crate::process::traverser_set::TraverserSet;
use crate::storage::{Direction, ElementKind, Value};

pub use match_step::{
    CountMatchAlgorithm, GreedyMatchAlgorithm, MatchAlgorithm, MatchAlgorithmKind, MatchClause,
    MatchEmit, MatchStep,
};

/// Definition of a step
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    /// Passes injected start traversers through
    Start,
    /// Storage query over all vertices or edges, optionally by id
    Graph {
        returns: ElementKind,
        ids: Vec<String>,
        has_containers: Vec<HasContainer>,
    },
    /// Storage query for adjacent edges or vertices of a vertex
    Vertex {
        direction: Direction,
        edge_labels: Vec<String>,
        returns: ElementKind,
        has_containers: Vec<HasContainer>,
    },
    /// Endpoints of an edge
    EdgeVertex { direction: Direction },
    Has { containers: Vec<HasContainer> },
    Identity,
    Id,
    Label,
    /// Property values; all properties when `keys` is empty
    Values { keys: Vec<String> },
    Path,
    Select { labels: Vec<String> },
    Where(Box<Traversal>),
    Union(Vec<Traversal>),
    Limit(u64),
    Dedup,
    Lambda(Lambda),
    AddVertex {
        label: String,
        properties: BTreeMap<String, Value>,
        callbacks: CallbackRegistry,
    },
    NoOpBarrier { max: usize },
    Count,
    GroupCount,
    Match(Box<MatchStep>),
}

impl StepKind {
    /// Step name used in explanations and error messages
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Start => "StartStep",
            StepKind::Graph { .. } => "GraphStep",
            StepKind::Vertex { .. } => "VertexStep",
            StepKind::EdgeVertex { .. } => "EdgeVertexStep",
            StepKind::Has { .. } => "HasStep",
            StepKind::Identity => "IdentityStep",
            StepKind::Id => "IdStep",
            StepKind::Label => "LabelStep",
            StepKind::Values { .. } => "PropertiesStep",
            StepKind::Path => "PathStep",
            StepKind::Select { .. } => "SelectStep",
            StepKind::Where(_) => "WhereStep",
            StepKind::Union(_) => "UnionStep",
            StepKind::Limit(_) => "LimitStep",
            StepKind::Dedup => "DedupStep",
            StepKind::Lambda(_) => "LambdaStep",
            StepKind::AddVertex { .. } => "AddVertexStep",
            StepKind::NoOpBarrier { .. } => "NoOpBarrierStep",
            StepKind::Count => "CountStep",
            StepKind::GroupCount => "GroupCountStep",
            StepKind::Match(_) => "MatchStep",
        }
    }

    /// Steps that read the graph and can accept pushed-down predicates
    pub fn is_storage_query(&self) -> bool {
        matches!(self, StepKind::Graph { .. } | StepKind::Vertex { .. })
    }

    /// Vertex adjacency steps
    pub fn is_expansion(&self) -> bool {
        matches!(self, StepKind::Vertex { .. })
    }

    pub fn is_filter(&self) -> bool {
        match self {
            StepKind::Has { .. }
            | StepKind::Where(_)
            | StepKind::Limit(_)
            | StepKind::Dedup => true,
            StepKind::Lambda(lambda) => matches!(lambda.function(), LambdaFunction::Filter(_)),
            _ => false,
        }
    }

    /// One output per input
    pub fn is_map(&self) -> bool {
        match self {
            StepKind::Identity
            | StepKind::Id
            | StepKind::Label
            | StepKind::Path
            | StepKind::Select { .. } => true,
            StepKind::EdgeVertex { direction } => *direction != Direction::Both,
            StepKind::Lambda(lambda) => matches!(lambda.function(), LambdaFunction::Map(_)),
            _ => false,
        }
    }

    /// Zero or more outputs per input
    pub fn is_flat_map(&self) -> bool {
        match self {
            StepKind::Vertex { .. }
            | StepKind::Values { .. }
            | StepKind::Union(_)
            | StepKind::Match(_) => true,
            StepKind::EdgeVertex { direction } => *direction == Direction::Both,
            StepKind::Lambda(lambda) => matches!(lambda.function(), LambdaFunction::FlatMap(_)),
            _ => false,
        }
    }

    pub fn is_side_effect(&self) -> bool {
        match self {
            StepKind::AddVertex { .. } => true,
            StepKind::Lambda(lambda) => matches!(lambda.function(), LambdaFunction::SideEffect(_)),
            _ => false,
        }
    }

    pub fn is_barrier(&self) -> bool {
        matches!(
            self,
            StepKind::NoOpBarrier { .. } | StepKind::Count | StepKind::GroupCount
        )
    }

    /// Barriers that fold their whole input into one result
    pub fn is_reducing_barrier(&self) -> bool {
        matches!(self, StepKind::Count | StepKind::GroupCount)
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self, StepKind::Lambda(_))
    }

    /// Steps that read the traverser's path
    pub fn requires_path(&self) -> bool {
        matches!(self, StepKind::Path | StepKind::Select { .. })
    }

    /// Predicates attached to the step, if it carries any
    pub fn has_containers(&self) -> Option<&[HasContainer]> {
        match self {
            StepKind::Graph { has_containers, .. } | StepKind::Vertex { has_containers, .. } => {
                Some(has_containers)
            }
            StepKind::Has { containers } => Some(containers),
            _ => None,
        }
    }

    pub fn has_containers_mut(&mut self) -> Option<&mut Vec<HasContainer>> {
        match self {
            StepKind::Graph { has_containers, .. } | StepKind::Vertex { has_containers, .. } => {
                Some(has_containers)
            }
            StepKind::Has { containers } => Some(containers),
            _ => None,
        }
    }
}

/// Runtime data of a step, reset whenever its traversal is restarted
#[derive(Debug, Clone, Default)]
pub(crate) struct StepState {
    /// Buffered flat-map and barrier output
    pub output: VecDeque<Traverser>,
    pub barrier: TraverserSet,
    /// Dedup seen-set bucketed by value hash
    pub seen: HashMap<u64, Vec<Value>>,
    /// Emitted bulk for `limit`
    pub counter: u64,
    /// Set once a source or reducing step has produced everything
    pub done: bool,
    /// Union child currently being drained
    pub branch: Option<usize>,
}

/// A labeled pipeline stage
#[derive(Debug, Clone)]
pub struct Step {
    labels: Vec<String>,
    kind: StepKind,
    pub(crate) state: StepState,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        Self {
            labels: Vec::new(),
            kind,
            state: StepState::default(),
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut StepKind {
        &mut self.kind
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut Vec<String> {
        &mut self.labels
    }

    /// Add a label unless already present
    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Drop all runtime state, including buffered output
    pub fn reset(&mut self) {
        self.state = StepState::default();
    }

    /// Child traversals owned by this step
    pub fn children(&self) -> Vec<&Traversal> {
        match &self.kind {
            StepKind::Where(child) => vec![child.as_ref()],
            StepKind::Union(children) => children.iter().collect(),
            StepKind::Match(step) => step.clauses().iter().map(|c| c.traversal()).collect(),
            kind => kind
                .has_containers()
                .map(|containers| containers.iter().filter_map(|c| c.traversal()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut Traversal> {
        match &mut self.kind {
            StepKind::Where(child) => vec![child.as_mut()],
            StepKind::Union(children) => children.iter_mut().collect(),
            StepKind::Match(step) => step
                .clauses_mut()
                .iter_mut()
                .map(|c| c.traversal_mut())
                .collect(),
            kind => kind
                .has_containers_mut()
                .map(|containers| {
                    containers
                        .iter_mut()
                        .filter_map(|c| c.traversal_mut())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels && self.kind == other.kind
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

fn element_name(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Vertex => "vertex",
        ElementKind::Edge => "edge",
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match &self.kind {
            StepKind::Graph {
                returns,
                ids,
                has_containers,
            } => {
                write!(f, "({},", element_name(*returns))?;
                write_list(f, ids)?;
                if !has_containers.is_empty() {
                    write!(f, ",")?;
                    write_list(f, has_containers)?;
                }
                write!(f, ")")?;
            }
            StepKind::Vertex {
                direction,
                edge_labels,
                returns,
                has_containers,
            } => {
                write!(f, "({},", direction)?;
                if !edge_labels.is_empty() {
                    write_list(f, edge_labels)?;
                    write!(f, ",")?;
                }
                write!(f, "{}", element_name(*returns))?;
                if !has_containers.is_empty() {
                    write!(f, ",")?;
                    write_list(f, has_containers)?;
                }
                write!(f, ")")?;
            }
            StepKind::EdgeVertex { direction } => write!(f, "({})", direction)?,
            StepKind::Has { containers } => {
                write!(f, "(")?;
                write_list(f, containers)?;
                write!(f, ")")?;
            }
            StepKind::Values { keys } => {
                write!(f, "(")?;
                write_list(f, keys)?;
                write!(f, ",value)")?;
            }
            StepKind::Select { labels } => {
                write!(f, "(")?;
                write_list(f, labels)?;
                write!(f, ")")?;
            }
            StepKind::Where(child) => write!(f, "({})", child)?,
            StepKind::Union(children) => {
                write!(f, "(")?;
                write_list(f, children)?;
                write!(f, ")")?;
            }
            StepKind::Limit(n) => write!(f, "({})", n)?,
            StepKind::Lambda(lambda) => write!(f, "({})", lambda)?,
            StepKind::AddVertex { label, .. } => write!(f, "({})", label)?,
            StepKind::NoOpBarrier { max } => write!(f, "({})", max)?,
            StepKind::Match(step) => write!(f, "({})", step)?,
            StepKind::Start
            | StepKind::Identity
            | StepKind::Id
            | StepKind::Label
            | StepKind::Path
            | StepKind::Dedup
            | StepKind::Count
            | StepKind::GroupCount => {}
        }
        if !self.labels.is_empty() {
            write!(f, "@")?;
            write_list(f, &self.labels)?;
        }
        Ok(())
    }
}
