// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use gremlite::ExecutionMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gremlite",
    version,
    about = "Run and explain graph traversals",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<log::Level>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a traversal and print its results
    Run {
        #[command(flatten)]
        input: TraversalInput,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print bulked traversers instead of expanding them
        #[arg(long)]
        bulk: bool,
    },

    /// Show the traversal after each strategy
    Explain {
        #[command(flatten)]
        input: TraversalInput,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

/// Files and options shared by `run` and `explain`
#[derive(Args, Debug, Clone)]
pub struct TraversalInput {
    /// Graph document (JSON with `vertices` and `edges`)
    #[arg(long)]
    pub graph: PathBuf,

    /// Traversal description (JSON list of steps)
    #[arg(long)]
    pub query: PathBuf,

    /// Execution mode: local or distributed. Defaults to the config's mode.
    #[arg(long)]
    pub mode: Option<ExecutionMode>,

    /// Engine configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
