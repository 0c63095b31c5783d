// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Strategy-by-strategy traversal explanation
//!
//! Captures the rendering of a traversal after every strategy of a registry
//! for debugging and `explain` output.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::process::TraverserMode;
use crate::strategy::StrategyCategory;

/// Result of [`TraversalStrategies::explain`](crate::strategy::TraversalStrategies::explain)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalExplanation {
    pub original: String,
    pub steps: Vec<ExplanationStep>,
    pub final_traversal: String,
    pub traverser_mode: TraverserMode,
    pub total_duration: Duration,
}

/// One strategy application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationStep {
    pub strategy: String,
    pub category: StrategyCategory,
    pub duration: Duration,
    /// False when the strategy left the traversal as it found it
    pub changed: bool,
    /// Rendering after the strategy ran
    pub traversal: String,
}

impl TraversalExplanation {
    /// Strategies that rewrote the traversal
    pub fn applied(&self) -> impl Iterator<Item = &ExplanationStep> {
        self.steps.iter().filter(|s| s.changed)
    }

    /// Format the explanation as a text report
    pub fn format_explanation(&self) -> String {
        let mut output = String::new();
        let width = self
            .steps
            .iter()
            .map(|s| s.strategy.len() + s.category.to_string().len() + 3)
            .max()
            .unwrap_or(0)
            .max("Original (unoptimized)".len());

        output.push_str("Traversal Explanation\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "{:<width$}  {}\n\n",
            "Original (unoptimized)",
            self.original,
            width = width
        ));

        for step in &self.steps {
            let name = format!("{} [{}]", step.strategy, step.category);
            let marker = if step.changed { "*" } else { " " };
            output.push_str(&format!(
                "{:<width$} {} {}\n",
                name,
                marker,
                step.traversal,
                width = width
            ));
        }

        output.push('\n');
        output.push_str(&format!(
            "{:<width$}  {}\n",
            "Final Traversal",
            self.final_traversal,
            width = width
        ));
        output.push_str(&"-".repeat(30));
        output.push('\n');
        output.push_str(&format!(
            "Traverser: {:?} | Rewrites: {} | Compile Time: {:.1}ms\n",
            self.traverser_mode,
            self.applied().count(),
            self.total_duration.as_secs_f64() * 1000.0
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explanation() -> TraversalExplanation {
        TraversalExplanation {
            original: "[VertexStep(OUT,[],vertex), IdentityStep]".to_string(),
            steps: vec![
                ExplanationStep {
                    strategy: "IdentityRemovalStrategy".to_string(),
                    category: StrategyCategory::Optimization,
                    duration: Duration::from_micros(3),
                    changed: true,
                    traversal: "[VertexStep(OUT,[],vertex)]".to_string(),
                },
                ExplanationStep {
                    strategy: "DistributedVerificationStrategy".to_string(),
                    category: StrategyCategory::Verification,
                    duration: Duration::from_micros(1),
                    changed: false,
                    traversal: "[VertexStep(OUT,[],vertex)]".to_string(),
                },
            ],
            final_traversal: "[VertexStep(OUT,[],vertex)]".to_string(),
            traverser_mode: TraverserMode::Simple,
            total_duration: Duration::from_micros(10),
        }
    }

    #[test]
    fn test_format_lists_every_strategy() {
        let text = explanation().format_explanation();
        assert!(text.starts_with("Traversal Explanation"));
        assert!(text.contains("IdentityRemovalStrategy [optimization]"));
        assert!(text.contains("DistributedVerificationStrategy [verification]"));
        assert!(text.contains("Rewrites: 1"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(explanation()).unwrap();
        assert_eq!(json["steps"][0]["category"], "Optimization");
        assert_eq!(json["steps"][1]["changed"], false);
    }
}
