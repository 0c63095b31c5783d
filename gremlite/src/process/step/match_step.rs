// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Multi-clause pattern match
//!
//! A match step joins child traversals ("clauses") on shared variable
//! labels. Each clause starts at a labeled variable; a join clause binds
//! the variable its last step is labeled with, a predicate clause only
//! has to produce some result for its start binding. A pluggable
//! `MatchAlgorithm` picks which eligible join clause runs next.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::Result;
use crate::process::traversal::{ExecutionContext, Traversal};
use crate::process::traverser::Traverser;
use crate::storage::Value;

/// Clause ordering policy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchAlgorithmKind {
    /// Fewest executions first, ties by declaration order
    #[default]
    Count,
    /// Declaration order
    Greedy,
}

impl MatchAlgorithmKind {
    pub fn create(&self) -> Box<dyn MatchAlgorithm> {
        match self {
            MatchAlgorithmKind::Count => Box::new(CountMatchAlgorithm),
            MatchAlgorithmKind::Greedy => Box::new(GreedyMatchAlgorithm),
        }
    }
}

impl fmt::Display for MatchAlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchAlgorithmKind::Count => write!(f, "count"),
            MatchAlgorithmKind::Greedy => write!(f, "greedy"),
        }
    }
}

/// Chooses the next join clause to execute
pub trait MatchAlgorithm: fmt::Debug + Send + Sync {
    fn kind(&self) -> MatchAlgorithmKind;

    /// Pick one of `eligible` (clause indices in declaration order) given
    /// how often each clause has executed so far
    fn select(&self, eligible: &[usize], executions: &[u64]) -> Option<usize>;

    fn box_clone(&self) -> Box<dyn MatchAlgorithm>;
}

impl Clone for Box<dyn MatchAlgorithm> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CountMatchAlgorithm;

impl MatchAlgorithm for CountMatchAlgorithm {
    fn kind(&self) -> MatchAlgorithmKind {
        MatchAlgorithmKind::Count
    }

    fn select(&self, eligible: &[usize], executions: &[u64]) -> Option<usize> {
        eligible
            .iter()
            .copied()
            .min_by_key(|&clause| (executions.get(clause).copied().unwrap_or(0), clause))
    }

    fn box_clone(&self) -> Box<dyn MatchAlgorithm> {
        Box::new(*self)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMatchAlgorithm;

impl MatchAlgorithm for GreedyMatchAlgorithm {
    fn kind(&self) -> MatchAlgorithmKind {
        MatchAlgorithmKind::Greedy
    }

    fn select(&self, eligible: &[usize], _executions: &[u64]) -> Option<usize> {
        eligible.first().copied()
    }

    fn box_clone(&self) -> Box<dyn MatchAlgorithm> {
        Box::new(*self)
    }
}

/// What a match step emits per solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEmit {
    /// Value bound to the end label
    EndValue,
    /// Map of every bound variable
    Bindings,
}

/// One clause of a match step
#[derive(Debug, Clone, PartialEq)]
pub struct MatchClause {
    traversal: Traversal,
    start_label: Option<String>,
    end_label: Option<String>,
    start: Option<usize>,
    end: Option<usize>,
}

impl MatchClause {
    /// Split the variable labels off a clause traversal.
    ///
    /// The first label of the first step names the start variable; the last
    /// remaining label of the last step, if any, names the end variable.
    pub fn parse(mut traversal: Traversal) -> Self {
        let start_label = traversal
            .steps_mut()
            .first_mut()
            .and_then(|step| {
                let labels = step.labels_mut();
                (!labels.is_empty()).then(|| labels.remove(0))
            });
        let end_label = traversal
            .steps_mut()
            .last_mut()
            .and_then(|step| step.labels_mut().pop());
        Self {
            traversal,
            start_label,
            end_label,
            start: None,
            end: None,
        }
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    pub fn traversal_mut(&mut self) -> &mut Traversal {
        &mut self.traversal
    }

    pub fn start_label(&self) -> Option<&str> {
        self.start_label.as_deref()
    }

    pub fn end_label(&self) -> Option<&str> {
        self.end_label.as_deref()
    }

    /// A clause without an end variable only filters
    pub fn is_predicate(&self) -> bool {
        self.end_label.is_none()
    }
}

impl fmt::Display for MatchClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start_label.as_deref().unwrap_or("?"))?;
        write!(f, "{}", self.traversal)?;
        if let Some(end) = &self.end_label {
            write!(f, "{}", end)?;
        }
        Ok(())
    }
}

/// Variable bindings indexed by label handle
type Bindings = Vec<Option<Value>>;

/// Pattern match over a set of clauses
#[derive(Debug, Clone)]
pub struct MatchStep {
    start_label: String,
    end_label: Option<String>,
    clauses: Vec<MatchClause>,
    /// Label handle table: handle is the index
    variables: Vec<String>,
    start: usize,
    end: Option<usize>,
    algorithm: Box<dyn MatchAlgorithm>,
    executions: Vec<u64>,
}

impl MatchStep {
    /// Build a match step; labels are resolved into handles here
    pub fn new(start_label: &str, end_label: Option<&str>, clauses: Vec<Traversal>) -> Self {
        let mut variables: Vec<String> = vec![start_label.to_string()];
        let mut intern = |label: &str| -> usize {
            match variables.iter().position(|v| v == label) {
                Some(handle) => handle,
                None => {
                    variables.push(label.to_string());
                    variables.len() - 1
                }
            }
        };

        let mut parsed: Vec<MatchClause> = clauses.into_iter().map(MatchClause::parse).collect();
        for clause in &mut parsed {
            clause.start = clause.start_label.as_deref().map(&mut intern);
            clause.end = clause.end_label.as_deref().map(&mut intern);
        }
        let end = end_label.map(&mut intern);

        let executions = vec![0; parsed.len()];
        Self {
            start_label: start_label.to_string(),
            end_label: end_label.map(str::to_string),
            clauses: parsed,
            variables,
            start: 0,
            end,
            algorithm: MatchAlgorithmKind::default().create(),
            executions,
        }
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    pub fn end_label(&self) -> Option<&str> {
        self.end_label.as_deref()
    }

    pub fn clauses(&self) -> &[MatchClause] {
        &self.clauses
    }

    pub fn clauses_mut(&mut self) -> &mut [MatchClause] {
        &mut self.clauses
    }

    /// Every variable the step refers to
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn emit(&self) -> MatchEmit {
        if self.end.is_some() {
            MatchEmit::EndValue
        } else {
            MatchEmit::Bindings
        }
    }

    pub fn algorithm(&self) -> MatchAlgorithmKind {
        self.algorithm.kind()
    }

    pub fn set_algorithm(&mut self, kind: MatchAlgorithmKind) {
        if self.algorithm.kind() != kind {
            self.algorithm = kind.create();
        }
    }

    /// How often each clause has run, in declaration order
    pub fn executions(&self) -> &[u64] {
        &self.executions
    }

    /// Check that every clause can run, given the variables already
    /// bound on incoming paths
    pub fn validate(&self, path_labels: &HashSet<String>) -> std::result::Result<(), String> {
        if let Some(clause) = self.clauses.iter().find(|c| c.start.is_none()) {
            return Err(format!("clause {} has no start label", clause));
        }

        let mut bound: HashSet<usize> = HashSet::new();
        bound.insert(self.start);
        for (handle, name) in self.variables.iter().enumerate() {
            if path_labels.contains(name) {
                bound.insert(handle);
            }
        }
        loop {
            let mut progress = false;
            for clause in &self.clauses {
                if let (Some(start), Some(end)) = (clause.start, clause.end) {
                    if bound.contains(&start) && bound.insert(end) {
                        progress = true;
                    }
                }
            }
            if !progress {
                break;
            }
        }

        for clause in &self.clauses {
            if let Some(start) = clause.start {
                if !bound.contains(&start) {
                    return Err(format!(
                        "clause {} starts at '{}', which is unreachable from '{}'",
                        clause, self.variables[start], self.start_label
                    ));
                }
            }
        }
        if let Some(end) = self.end {
            if !bound.contains(&end) {
                return Err(format!(
                    "end label '{}' is never bound",
                    self.variables[end]
                ));
            }
        }
        Ok(())
    }

    /// Solve the pattern for one incoming traverser
    pub(crate) fn solve(
        &mut self,
        traverser: &Traverser,
        labels: &[String],
        ctx: &ExecutionContext,
    ) -> Result<Vec<Traverser>> {
        let mut bindings: Bindings = vec![None; self.variables.len()];
        bindings[self.start] = Some(traverser.value().clone());
        for (handle, name) in self.variables.iter().enumerate() {
            if handle != self.start {
                bindings[handle] = traverser.get(name).cloned();
            }
        }

        let mut solutions = Vec::new();
        let done = vec![false; self.clauses.len()];
        self.search(bindings, done, 1, ctx, &mut solutions)?;

        let mut results = Vec::with_capacity(solutions.len());
        for (bindings, bulk) in solutions {
            let value = match self.end {
                Some(end) => match &bindings[end] {
                    Some(value) => value.clone(),
                    None => continue,
                },
                None => Value::Map(
                    self.variables
                        .iter()
                        .zip(&bindings)
                        .filter_map(|(name, value)| value.clone().map(|v| (name.clone(), v)))
                        .collect::<BTreeMap<_, _>>(),
                ),
            };

            let mut base = traverser.clone();
            if let Some(path) = base.path_mut() {
                for (name, bound) in self.variables.iter().zip(&bindings) {
                    if let Some(bound) = bound {
                        path.extend(bound.clone(), std::slice::from_ref(name));
                    }
                }
            }
            let mut emitted = base.split(value, labels);
            emitted.set_bulk(traverser.bulk() * bulk);
            results.push(emitted);
        }
        Ok(results)
    }

    fn search(
        &mut self,
        bindings: Bindings,
        mut done: Vec<bool>,
        bulk: u64,
        ctx: &ExecutionContext,
        solutions: &mut Vec<(Bindings, u64)>,
    ) -> Result<()> {
        // Predicate clauses run as soon as their variable is bound
        for index in 0..self.clauses.len() {
            if done[index] || !self.clauses[index].is_predicate() {
                continue;
            }
            let Some(value) = self.clauses[index].start.and_then(|s| bindings[s].clone()) else {
                continue;
            };
            self.executions[index] += 1;
            let start = Traverser::new(value, ctx.mode, &[]);
            if self.clauses[index].traversal.first_from(start, ctx)?.is_none() {
                return Ok(());
            }
            done[index] = true;
        }

        let eligible: Vec<usize> = self
            .clauses
            .iter()
            .enumerate()
            .filter(|(index, clause)| {
                !done[*index]
                    && !clause.is_predicate()
                    && clause.start.is_some_and(|s| bindings[s].is_some())
            })
            .map(|(index, _)| index)
            .collect();

        let Some(chosen) = self.algorithm.select(&eligible, &self.executions) else {
            let complete = done.iter().all(|d| *d);
            let end_bound = self.end.map_or(true, |end| bindings[end].is_some());
            if complete && end_bound {
                solutions.push((bindings, bulk));
            }
            return Ok(());
        };

        let (Some(start), Some(end)) = (self.clauses[chosen].start, self.clauses[chosen].end)
        else {
            return Ok(());
        };
        let Some(value) = bindings[start].clone() else {
            return Ok(());
        };

        self.executions[chosen] += 1;
        let results = self.clauses[chosen]
            .traversal
            .all_from(Traverser::new(value, ctx.mode, &[]), ctx)?;
        done[chosen] = true;

        for result in results {
            let result_bulk = result.bulk();
            let value = result.into_value();
            match &bindings[end] {
                Some(bound) if *bound != value => continue,
                Some(_) => {
                    self.search(
                        bindings.clone(),
                        done.clone(),
                        bulk * result_bulk,
                        ctx,
                        solutions,
                    )?;
                }
                None => {
                    let mut next = bindings.clone();
                    next[end] = Some(value);
                    self.search(next, done.clone(), bulk * result_bulk, ctx, solutions)?;
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for MatchStep {
    fn eq(&self, other: &Self) -> bool {
        self.start_label == other.start_label
            && self.end_label == other.end_label
            && self.clauses == other.clauses
            && self.algorithm.kind() == other.algorithm.kind()
    }
}

impl fmt::Display for MatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},", self.start_label)?;
        if let Some(end) = &self.end_label {
            write!(f, "{},", end)?;
        }
        write!(f, "[")?;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", clause)?;
        }
        write!(f, "],{}", self.algorithm.kind())
    }
}
