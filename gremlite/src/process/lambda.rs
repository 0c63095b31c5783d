// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Opaque user functions embedded in a traversal

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::storage::Value;

pub type MapFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
pub type FilterFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type FlatMapFn = Arc<dyn Fn(&Value) -> Vec<Value> + Send + Sync>;
pub type SideEffectFn = Arc<dyn Fn(&Value) + Send + Sync>;

/// User function with the capability it is used for
#[derive(Clone)]
pub enum LambdaFunction {
    Map(MapFn),
    Filter(FilterFn),
    FlatMap(FlatMapFn),
    SideEffect(SideEffectFn),
}

impl LambdaFunction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            LambdaFunction::Map(_) => "map",
            LambdaFunction::Filter(_) => "filter",
            LambdaFunction::FlatMap(_) => "flatMap",
            LambdaFunction::SideEffect(_) => "sideEffect",
        }
    }

    fn address(&self) -> *const () {
        match self {
            LambdaFunction::Map(f) => Arc::as_ptr(f) as *const (),
            LambdaFunction::Filter(f) => Arc::as_ptr(f) as *const (),
            LambdaFunction::FlatMap(f) => Arc::as_ptr(f) as *const (),
            LambdaFunction::SideEffect(f) => Arc::as_ptr(f) as *const (),
        }
    }
}

/// A named lambda. Clones share the function; equality is identity.
#[derive(Clone)]
pub struct Lambda {
    name: String,
    function: LambdaFunction,
}

impl Lambda {
    pub fn new(name: impl Into<String>, function: LambdaFunction) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> &LambdaFunction {
        &self.function
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.function.address() == other.function.address()
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lambda({}:{})", self.function.kind_name(), self.name)
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.function.kind_name(), self.name)
    }
}
