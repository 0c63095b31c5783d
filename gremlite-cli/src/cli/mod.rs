// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for Gremlite
//!
//! Loads a JSON graph and a JSON traversal description, compiles the
//! traversal and prints either its results or its explanation.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_explain, handle_run};
