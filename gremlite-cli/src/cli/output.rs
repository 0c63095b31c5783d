// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use gremlite::{ExecutionMode, TraversalExplanation, Value};

use super::commands::OutputFormat;

/// Formats traversal results and explanations
pub struct ResultFormatter;

impl ResultFormatter {
    /// Format `(value, bulk)` rows in the requested format
    pub fn format_results(
        rows: &[(Value, u64)],
        mode: ExecutionMode,
        elapsed_ms: f64,
        format: OutputFormat,
    ) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Table => Ok(Self::format_table(rows, mode, elapsed_ms)),
            OutputFormat::Json => Self::format_json(rows),
        }
    }

    pub fn format_explanation(
        explanation: &TraversalExplanation,
        format: OutputFormat,
    ) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Table => Ok(explanation.format_explanation()),
            OutputFormat::Json => serde_json::to_string_pretty(explanation),
        }
    }

    fn format_table(rows: &[(Value, u64)], mode: ExecutionMode, elapsed_ms: f64) -> String {
        if rows.is_empty() {
            return format!("{}\n", "No results found".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Traversal Results".bold().green()));
        output.push_str(&format!("Mode: {} | Execution time: {:.3} ms\n", mode, elapsed_ms));
        output.push_str(&format!("Rows returned: {}\n\n", rows.len()));

        let show_bulk = rows.iter().any(|(_, bulk)| *bulk > 1);
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        let mut header = vec![
            Cell::new("#").fg(Color::Green),
            Cell::new("value").fg(Color::Green),
            Cell::new("type").fg(Color::Green),
        ];
        if show_bulk {
            header.push(Cell::new("bulk").fg(Color::Green));
        }
        table.set_header(header);

        for (i, (value, bulk)) in rows.iter().enumerate() {
            let mut row = vec![
                (i + 1).to_string(),
                Self::value_to_string(value),
                value.type_name().to_string(),
            ];
            if show_bulk {
                row.push(bulk.to_string());
            }
            table.add_row(row);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    fn format_json(rows: &[(Value, u64)]) -> Result<String, serde_json::Error> {
        let results: Vec<serde_json::Value> = rows
            .iter()
            .map(|(value, bulk)| {
                if *bulk == 1 {
                    serde_json::to_value(value)
                } else {
                    Ok(serde_json::json!({ "value": value, "bulk": bulk }))
                }
            })
            .collect::<Result<_, _>>()?;
        serde_json::to_string_pretty(&results)
    }

    /// Elements print as `label[id]`; everything else uses its own display
    fn value_to_string(value: &Value) -> String {
        match value {
            Value::Vertex(vertex) => format!("v[{}] {}", vertex.id, vertex.label),
            Value::Edge(edge) => format!(
                "e[{}][{}-{}->{}]",
                edge.id, edge.out_vertex, edge.label, edge.in_vertex
            ),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
