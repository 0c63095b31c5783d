// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-kind step execution
//!
//! `process_next` follows one contract for every kind: drain buffered
//! output first, then pull upstream only as much as needed to produce the
//! next traverser.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::error::{Result, TraversalError};
use crate::process::event::Event;
use crate::process::lambda::LambdaFunction;
use crate::process::step::{Step, StepKind};
use crate::process::traversal::{ExecutionContext, Upstream};
use crate::process::traverser::Traverser;
use crate::storage::{ElementKind, GraphProvider, Value};

fn graph(ctx: &ExecutionContext) -> Result<&dyn GraphProvider> {
    ctx.graph.as_deref().ok_or_else(|| {
        TraversalError::Evaluation("traversal is not bound to a graph".to_string())
    })
}

fn unexpected(step: &str, expected: &str, value: &Value) -> TraversalError {
    TraversalError::Evaluation(format!(
        "{} expects {}, got {} {}",
        step,
        expected,
        value.type_name(),
        value
    ))
}

fn value_hash(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl Step {
    /// Produce the next output traverser, `Ok(None)` when exhausted
    pub(crate) fn process_next(&mut self, up: &mut Upstream<'_>) -> Result<Option<Traverser>> {
        let Step {
            labels,
            kind,
            state,
        } = self;
        let labels: &[String] = labels;
        let ctx = up.ctx();

        loop {
            if let Some(traverser) = state.output.pop_front() {
                return Ok(Some(traverser));
            }
            if state.done {
                return Ok(None);
            }

            match kind {
                StepKind::Start | StepKind::Identity => {
                    let Some(mut traverser) = up.next()? else {
                        return Ok(None);
                    };
                    traverser.add_labels(labels);
                    return Ok(Some(traverser));
                }

                StepKind::Graph {
                    returns,
                    ids,
                    has_containers,
                } => {
                    // Mid-traversal the query runs once per incoming traverser
                    let parent = if up.is_source() {
                        state.done = true;
                        None
                    } else {
                        match up.next()? {
                            Some(traverser) => Some(traverser),
                            None => return Ok(None),
                        }
                    };
                    let graph = graph(ctx)?;
                    let values = match returns {
                        ElementKind::Vertex => graph.vertices(ids, has_containers)?,
                        ElementKind::Edge => graph.edges(ids, has_containers)?,
                    };
                    for value in values {
                        state.output.push_back(match &parent {
                            Some(traverser) => traverser.split(value, labels),
                            None => Traverser::new(value, ctx.mode, labels),
                        });
                    }
                }

                StepKind::Vertex {
                    direction,
                    edge_labels,
                    returns,
                    has_containers,
                } => {
                    let Some(traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let vertex = traverser
                        .value()
                        .as_vertex()
                        .ok_or_else(|| unexpected("VertexStep", "a vertex", traverser.value()))?;
                    let adjacent = graph(ctx)?.adjacent(
                        vertex,
                        *direction,
                        edge_labels,
                        *returns,
                        has_containers,
                    )?;
                    for value in adjacent {
                        state.output.push_back(traverser.split(value, labels));
                    }
                }

                StepKind::EdgeVertex { direction } => {
                    let Some(traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let edge = traverser
                        .value()
                        .as_edge()
                        .ok_or_else(|| unexpected("EdgeVertexStep", "an edge", traverser.value()))?;
                    for value in graph(ctx)?.edge_vertices(edge, *direction)? {
                        state.output.push_back(traverser.split(value, labels));
                    }
                }

                StepKind::Has { containers } => {
                    let Some(mut traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let mut passed = true;
                    for container in containers.iter_mut() {
                        if !container.evaluate(traverser.value(), ctx)? {
                            passed = false;
                            break;
                        }
                    }
                    if passed {
                        traverser.add_labels(labels);
                        return Ok(Some(traverser));
                    }
                }

                StepKind::Id | StepKind::Label => {
                    let Some(traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let value = if matches!(kind, StepKind::Id) {
                        traverser.value().element_id()
                    } else {
                        traverser.value().element_label()
                    }
                    .map(|s| Value::String(s.to_string()))
                    .ok_or_else(|| unexpected("IdStep/LabelStep", "an element", traverser.value()))?;
                    return Ok(Some(traverser.split(value, labels)));
                }

                StepKind::Values { keys } => {
                    let Some(traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let properties = match traverser.value() {
                        Value::Vertex(vertex) => &vertex.properties,
                        Value::Edge(edge) => &edge.properties,
                        other => return Err(unexpected("PropertiesStep", "an element", other)),
                    };
                    let selected: Vec<Value> = if keys.is_empty() {
                        properties.values().cloned().collect()
                    } else {
                        keys.iter()
                            .filter_map(|key| properties.get(key).cloned())
                            .collect()
                    };
                    for value in selected {
                        state.output.push_back(traverser.split(value, labels));
                    }
                }

                StepKind::Path => {
                    let Some(traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let path = traverser.path().ok_or_else(|| {
                        TraversalError::Evaluation(
                            "PathStep requires path-tracking traversers".to_string(),
                        )
                    })?;
                    let value = Value::List(path.values());
                    return Ok(Some(traverser.split(value, labels)));
                }

                StepKind::Select { labels: keys } => {
                    let Some(traverser) = up.next()? else {
                        return Ok(None);
                    };
                    if !traverser.is_path_tracking() && traverser.value().as_map().is_none() {
                        return Err(TraversalError::Evaluation(
                            "SelectStep requires path-tracking traversers".to_string(),
                        ));
                    }
                    let resolve = |key: &String| -> Option<Value> {
                        traverser
                            .value()
                            .as_map()
                            .and_then(|map| map.get(key))
                            .or_else(|| traverser.get(key))
                            .cloned()
                    };
                    let selected = if let [key] = keys.as_slice() {
                        resolve(key)
                    } else {
                        keys.iter()
                            .map(|key| resolve(key).map(|value| (key.clone(), value)))
                            .collect::<Option<BTreeMap<_, _>>>()
                            .map(Value::Map)
                    };
                    if let Some(value) = selected {
                        return Ok(Some(traverser.split(value, labels)));
                    }
                }

                StepKind::Where(child) => {
                    let Some(mut traverser) = up.next()? else {
                        return Ok(None);
                    };
                    if child.first_from(traverser.fork(), ctx)?.is_some() {
                        traverser.add_labels(labels);
                        return Ok(Some(traverser));
                    }
                }

                StepKind::Union(children) => {
                    if let Some(index) = state.branch {
                        match children[index].pull_child(ctx)? {
                            Some(mut result) => {
                                result.add_labels(labels);
                                return Ok(Some(result));
                            }
                            None => {
                                state.branch = Some(index + 1).filter(|next| *next < children.len());
                            }
                        }
                        continue;
                    }
                    let Some(traverser) = up.next()? else {
                        return Ok(None);
                    };
                    // Every child is seeded up front and drained in order
                    for child in children.iter_mut() {
                        child.start_from(traverser.fork());
                    }
                    state.branch = (!children.is_empty()).then_some(0);
                }

                StepKind::Limit(max) => {
                    if state.counter >= *max {
                        state.done = true;
                        continue;
                    }
                    let Some(mut traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let remaining = *max - state.counter;
                    if traverser.bulk() > remaining {
                        traverser.set_bulk(remaining);
                    }
                    state.counter += traverser.bulk();
                    traverser.add_labels(labels);
                    return Ok(Some(traverser));
                }

                StepKind::Dedup => {
                    let Some(mut traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let bucket = state.seen.entry(value_hash(traverser.value())).or_default();
                    if !bucket.contains(traverser.value()) {
                        bucket.push(traverser.value().clone());
                        traverser.set_bulk(1);
                        traverser.add_labels(labels);
                        return Ok(Some(traverser));
                    }
                }

                StepKind::Lambda(lambda) => {
                    let Some(mut traverser) = up.next()? else {
                        return Ok(None);
                    };
                    match lambda.function() {
                        LambdaFunction::Map(f) => {
                            let value = f(traverser.value())?;
                            return Ok(Some(traverser.split(value, labels)));
                        }
                        LambdaFunction::Filter(f) => {
                            if f(traverser.value()) {
                                traverser.add_labels(labels);
                                return Ok(Some(traverser));
                            }
                        }
                        LambdaFunction::FlatMap(f) => {
                            for value in f(traverser.value()) {
                                state.output.push_back(traverser.split(value, labels));
                            }
                        }
                        LambdaFunction::SideEffect(f) => {
                            f(traverser.value());
                            traverser.add_labels(labels);
                            return Ok(Some(traverser));
                        }
                    }
                }

                StepKind::AddVertex {
                    label,
                    properties,
                    callbacks,
                } => {
                    let parent = if up.is_source() {
                        state.done = true;
                        None
                    } else {
                        match up.next()? {
                            Some(traverser) => Some(traverser),
                            None => return Ok(None),
                        }
                    };
                    let vertex = graph(ctx)?.add_vertex(label, properties.clone())?;
                    if !callbacks.is_empty() {
                        callbacks.notify(&Event::VertexAdded(vertex.clone()));
                    }
                    let value = Value::Vertex(vertex);
                    return Ok(Some(match parent {
                        Some(traverser) => traverser.split(value, labels),
                        None => Traverser::new(value, ctx.mode, labels),
                    }));
                }

                StepKind::NoOpBarrier { max } => {
                    if let Some(mut traverser) = state.barrier.remove_first() {
                        traverser.add_labels(labels);
                        return Ok(Some(traverser));
                    }
                    for _ in 0..*max {
                        match up.next()? {
                            Some(traverser) => state.barrier.add(traverser),
                            None => break,
                        }
                    }
                    if state.barrier.is_empty() {
                        return Ok(None);
                    }
                }

                StepKind::Count => {
                    let mut count: u64 = 0;
                    while let Some(traverser) = up.next()? {
                        count += traverser.bulk();
                    }
                    state.done = true;
                    state.output.push_back(Traverser::new(
                        Value::Number(count as f64),
                        ctx.mode,
                        labels,
                    ));
                }

                StepKind::GroupCount => {
                    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
                    while let Some(traverser) = up.next()? {
                        *counts.entry(traverser.value().key_string()).or_default() +=
                            traverser.bulk();
                    }
                    state.done = true;
                    let map = counts
                        .into_iter()
                        .map(|(key, count)| (key, Value::Number(count as f64)))
                        .collect();
                    state
                        .output
                        .push_back(Traverser::new(Value::Map(map), ctx.mode, labels));
                }

                StepKind::Match(step) => {
                    let Some(traverser) = up.next()? else {
                        return Ok(None);
                    };
                    let solutions = step.solve(&traverser, labels, ctx)?;
                    state.output.extend(solutions);
                }
            }
        }
    }
}
