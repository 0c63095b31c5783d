// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers

use colored::Colorize;
use std::sync::Arc;
use std::time::Instant;

use gremlite::{
    EngineConfig, ExecutionMode, GraphCache, Traversal, TraversalDescription, TraversalEngine,
    TraversalSource,
};

use super::commands::{OutputFormat, TraversalInput};
use super::output::ResultFormatter;

/// Everything a command needs once its input files are loaded
struct Loaded {
    engine: TraversalEngine,
    traversal: Traversal,
    mode: ExecutionMode,
}

fn load(input: TraversalInput) -> Result<Loaded, Box<dyn std::error::Error>> {
    let config = match &input.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let mode = input.mode.unwrap_or(config.execution_mode);

    let graph = GraphCache::from_file(&input.graph)?;
    log::info!(
        "Loaded graph {} ({} vertices, {} edges)",
        input.graph.display(),
        graph.vertex_count(),
        graph.edge_count()
    );

    let description = TraversalDescription::from_file(&input.query)?;
    let traversal = description.build_with(&TraversalSource::new(Arc::new(graph)));
    let engine = TraversalEngine::with_config(config)?;

    Ok(Loaded {
        engine,
        traversal,
        mode,
    })
}

/// Handle the run command
pub fn handle_run(
    input: TraversalInput,
    format: OutputFormat,
    bulk: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Loaded {
        engine,
        traversal,
        mode,
    } = load(input)?;

    let start = Instant::now();
    let mut compiled = match engine.compile(traversal, mode) {
        Ok(compiled) => compiled,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            return Err(e.into());
        }
    };

    let result = if bulk {
        compiled.to_traversers().map(|traversers| {
            traversers
                .into_iter()
                .map(|t| {
                    let bulk = t.bulk();
                    (t.into_value(), bulk)
                })
                .collect::<Vec<_>>()
        })
    } else {
        compiled
            .to_list()
            .map(|values| values.into_iter().map(|v| (v, 1)).collect())
    };

    match result {
        Ok(rows) => {
            let elapsed = start.elapsed().as_secs_f64() * 1000.0;
            println!(
                "{}",
                ResultFormatter::format_results(&rows, mode, elapsed, format)?
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            Err(e.into())
        }
    }
}

/// Handle the explain command
pub fn handle_explain(
    input: TraversalInput,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let Loaded {
        engine,
        traversal,
        mode,
    } = load(input)?;

    match engine.explain(&traversal, mode) {
        Ok(explanation) => {
            println!("{}", ResultFormatter::format_explanation(&explanation, format)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            Err(e.into())
        }
    }
}
