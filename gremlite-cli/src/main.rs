// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Gremlite CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // -v wins over --log-level; RUST_LOG still applies when neither is given
    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{} {}", "Gremlite".bold().green(), gremlite::VERSION);
            println!("Lazy, strategy-compiled graph traversals");
            Ok(())
        }

        Commands::Run {
            input,
            format,
            bulk,
        } => cli::handle_run(input, format, bulk),

        Commands::Explain { input, format } => cli::handle_explain(input, format),
    }
}
