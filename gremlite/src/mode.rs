// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution mode for compiled traversals

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target execution mode of a traversal
///
/// Determines which steps a traversal may contain and which rewrites are
/// sound for it.
///
/// # Modes
///
/// - **Local**: The traversal runs in this process, pulled by a single
///   caller. Steps defined by arbitrary user closures are permitted.
///
/// - **Distributed**: The compiled step graph is handed to a bulk-synchronous
///   runtime that re-runs it on many workers. Every step must be
///   re-constructible on a worker, so lambda steps are rejected, and lazy
///   barriers are not inserted because the runtime batches by superstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Single-process execution (default)
    #[default]
    Local,

    /// Bulk-synchronous execution across workers
    Distributed,
}

impl ExecutionMode {
    /// Returns true if this is Local mode
    pub fn is_local(&self) -> bool {
        matches!(self, ExecutionMode::Local)
    }

    /// Returns true if this is Distributed mode
    pub fn is_distributed(&self) -> bool {
        matches!(self, ExecutionMode::Distributed)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Local => write!(f, "local"),
            ExecutionMode::Distributed => write!(f, "distributed"),
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "standard" => Ok(ExecutionMode::Local),
            "distributed" | "computer" => Ok(ExecutionMode::Distributed),
            other => Err(format!("Unknown execution mode: {}", other)),
        }
    }
}
