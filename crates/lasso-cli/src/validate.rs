//! Validate command - check a descriptor before resolving against it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;

use lasso_order::{CapabilityGraph, MatchCache};

use crate::load_descriptor;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Descriptor file
    #[arg(short = 'c', long, default_value = "config.json")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub format_json: bool,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    modules: usize,
    errors: Vec<String>,
}

pub fn execute(args: ValidateArgs) -> Result<i32> {
    let (_, graph) = load_descriptor(&args.config)?;
    let errors = collect_errors(&graph);

    if args.format_json {
        let report = ValidationReport {
            modules: graph.len(),
            errors,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(if report.errors.is_empty() { 0 } else { 1 });
    }

    if errors.is_empty() {
        println!(
            "{} {} is valid ({} modules)",
            style("OK").green().bold(),
            args.config.display(),
            graph.len()
        );
        return Ok(0);
    }

    for error in &errors {
        eprintln!("{} {}", style("Error:").red().bold(), error);
    }
    Ok(1)
}

fn collect_errors(graph: &CapabilityGraph) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some((module, other)) = graph.find_circular_reference() {
        errors.push(format!(
            "Circular reference: {} requires {} which {} provides while requiring {}",
            module.source(),
            module.requires(),
            other.source(),
            other.requires()
        ));
    }

    let cache = MatchCache::new(graph);
    for module in graph.modules().filter(|m| m.is_complex()) {
        let missing = cache.unsatisfiable(module.requires());
        if !missing.is_empty() {
            errors.push(format!(
                "{} requires {} but no registered module provides it",
                module.source(),
                missing
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_graph_has_no_errors() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["a"], Vec::<String>::new());
        graph.register("b.js", ["b"], ["a"]);
        assert!(collect_errors(&graph).is_empty());
    }

    #[test]
    fn test_reports_cycle_and_missing_requirement() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["x"], ["y"]);
        graph.register("b.js", ["y"], ["x"]);
        graph.register("c.js", ["c"], ["nowhere"]);

        let errors = collect_errors(&graph);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("a.js"));
        assert!(errors[1].contains("nowhere"));
    }
}
