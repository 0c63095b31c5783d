// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Property predicates carried by filter and storage-query steps

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::Result;
use crate::process::traversal::{ExecutionContext, Traversal};
use crate::process::traverser::Traverser;
use crate::storage::{Value, ID_KEY, LABEL_KEY};

/// Comparison applied between an element property and an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compare {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Operand is a list containing the property value
    Within,
    /// Operand is a list not containing the property value
    Without,
}

impl Compare {
    /// Apply the comparison. Range comparisons between incomparable values
    /// are false.
    pub fn test(&self, actual: &Value, operand: &Value) -> bool {
        match self {
            Compare::Eq => actual == operand,
            Compare::Neq => actual != operand,
            Compare::Lt => actual.compare(operand) == Some(Ordering::Less),
            Compare::Lte => matches!(
                actual.compare(operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Compare::Gt => actual.compare(operand) == Some(Ordering::Greater),
            Compare::Gte => matches!(
                actual.compare(operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Compare::Within => within(actual, operand),
            Compare::Without => !within(actual, operand),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compare::Eq => "eq",
            Compare::Neq => "neq",
            Compare::Lt => "lt",
            Compare::Lte => "lte",
            Compare::Gt => "gt",
            Compare::Gte => "gte",
            Compare::Within => "within",
            Compare::Without => "without",
        }
    }
}

fn within(actual: &Value, operand: &Value) -> bool {
    match operand {
        Value::List(items) => items.contains(actual),
        single => single == actual,
    }
}

impl fmt::Display for Compare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a `HasContainer`
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
    /// A constant; storage backends can evaluate these natively
    Literal(Value),
    /// A child traversal evaluated from the tested element; its first
    /// result is the operand
    Traversal(Box<Traversal>),
}

/// A (key, comparison, operand) triple tested against a graph element
#[derive(Debug, Clone, PartialEq)]
pub struct HasContainer {
    key: String,
    compare: Compare,
    value: PredicateValue,
}

impl HasContainer {
    /// Container with a literal operand
    pub fn new(key: impl Into<String>, compare: Compare, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            compare,
            value: PredicateValue::Literal(value.into()),
        }
    }

    /// Container whose operand is computed by a child traversal
    pub fn with_traversal(key: impl Into<String>, compare: Compare, traversal: Traversal) -> Self {
        Self {
            key: key.into(),
            compare,
            value: PredicateValue::Traversal(Box::new(traversal)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn compare(&self) -> Compare {
        self.compare
    }

    pub fn value(&self) -> &PredicateValue {
        &self.value
    }

    /// Literal operand, if any
    pub fn literal(&self) -> Option<&Value> {
        match &self.value {
            PredicateValue::Literal(value) => Some(value),
            PredicateValue::Traversal(_) => None,
        }
    }

    pub fn traversal(&self) -> Option<&Traversal> {
        match &self.value {
            PredicateValue::Traversal(traversal) => Some(traversal),
            PredicateValue::Literal(_) => None,
        }
    }

    pub fn traversal_mut(&mut self) -> Option<&mut Traversal> {
        match &mut self.value {
            PredicateValue::Traversal(traversal) => Some(traversal),
            PredicateValue::Literal(_) => None,
        }
    }

    /// Whether a storage backend can evaluate this container without
    /// running a traversal
    pub fn is_native(&self) -> bool {
        matches!(self.value, PredicateValue::Literal(_))
    }

    /// Test a natively evaluable container against an element.
    ///
    /// An element missing the property fails every comparison. Containers
    /// with a traversal operand always fail here; use `evaluate` for them.
    pub fn test(&self, element: &Value) -> bool {
        match (&self.value, element.element_property(&self.key)) {
            (PredicateValue::Literal(operand), Some(actual)) => self.compare.test(&actual, operand),
            _ => false,
        }
    }

    /// Test every container; true when all pass
    pub fn test_all(element: &Value, containers: &[HasContainer]) -> bool {
        containers.iter().all(|container| container.test(element))
    }

    /// Test against an element, running the operand traversal if needed
    pub fn evaluate(&mut self, element: &Value, ctx: &ExecutionContext) -> Result<bool> {
        let Some(actual) = element.element_property(&self.key) else {
            return Ok(false);
        };
        let compare = self.compare;
        match &mut self.value {
            PredicateValue::Literal(operand) => Ok(compare.test(&actual, operand)),
            PredicateValue::Traversal(traversal) => {
                let start = Traverser::new(element.clone(), ctx.mode, &[]);
                Ok(match traversal.first_from(start, ctx)? {
                    Some(operand) => compare.test(&actual, operand.value()),
                    None => false,
                })
            }
        }
    }
}

impl fmt::Display for HasContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            PredicateValue::Literal(value) => write!(f, "{}.{}({})", self.key, self.compare, value),
            PredicateValue::Traversal(traversal) => {
                write!(f, "{}.{}({})", self.key, self.compare, traversal)
            }
        }
    }
}

/// `has_label` shorthand
pub fn label_eq(label: &str) -> HasContainer {
    HasContainer::new(LABEL_KEY, Compare::Eq, label)
}

/// `has_id` shorthand
pub fn id_within(ids: &[&str]) -> HasContainer {
    if let [id] = ids {
        HasContainer::new(ID_KEY, Compare::Eq, *id)
    } else {
        HasContainer::new(ID_KEY, Compare::Within, ids.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Vertex;

    fn person(id: &str, age: i64) -> Value {
        let mut vertex = Vertex::new(id.to_string(), "person".to_string());
        vertex.set_property("age".to_string(), Value::from(age));
        Value::Vertex(vertex)
    }

    #[test]
    fn test_range_comparisons() {
        let marko = person("1", 29);
        assert!(HasContainer::new("age", Compare::Gt, 28).test(&marko));
        assert!(HasContainer::new("age", Compare::Lte, 29).test(&marko));
        assert!(!HasContainer::new("age", Compare::Lt, 29).test(&marko));
        assert!(!HasContainer::new("age", Compare::Gt, "28").test(&marko));
    }

    #[test]
    fn test_missing_property_fails_everything() {
        let marko = person("1", 29);
        assert!(!HasContainer::new("name", Compare::Neq, "x").test(&marko));
        assert!(!HasContainer::new("name", Compare::Without, vec!["x"]).test(&marko));
    }

    #[test]
    fn test_identity_keys() {
        let marko = person("1", 29);
        assert!(label_eq("person").test(&marko));
        assert!(id_within(&["1"]).test(&marko));
        assert!(id_within(&["2", "1"]).test(&marko));
        assert!(!id_within(&["2", "3"]).test(&marko));
    }

    #[test]
    fn test_native_and_display() {
        let literal = HasContainer::new("age", Compare::Gte, 32);
        assert!(literal.is_native());
        assert_eq!(literal.to_string(), "age.gte(32)");

        let nested = HasContainer::with_traversal("age", Compare::Eq, Traversal::new());
        assert!(!nested.is_native());
        assert!(!nested.test(&person("1", 29)));
        assert!(!HasContainer::test_all(&person("1", 29), &[literal, nested]));
    }
}
