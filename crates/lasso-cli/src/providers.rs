//! Providers command - show which modules provide an id.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;

use crate::load_descriptor;

#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Capability id to look up
    #[arg(value_name = "ID")]
    pub id: String,

    /// Descriptor file
    #[arg(short = 'c', long, default_value = "config.json")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub format_json: bool,
}

#[derive(Debug, Serialize)]
struct ProviderInfo<'a> {
    module: &'a str,
    compound: bool,
    provides: &'a [String],
    requires: &'a [String],
}

pub fn execute(args: ProvidersArgs) -> Result<i32> {
    let (_, graph) = load_descriptor(&args.config)?;
    let providers = graph.providers_of(&args.id);

    if providers.is_empty() {
        eprintln!(
            "{} No registered module provides '{}'",
            style("Error:").red().bold(),
            args.id
        );
        return Ok(1);
    }

    if args.format_json {
        let infos: Vec<ProviderInfo<'_>> = providers
            .iter()
            .map(|module| ProviderInfo {
                module: module.source(),
                compound: module.is_compound(),
                provides: module.provides().as_slice(),
                requires: module.requires().as_slice(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(0);
    }

    println!("Modules providing {}:", style(&args.id).cyan().bold());
    for module in providers {
        let kind = if module.is_compound() { " (bundle)" } else { "" };
        if module.requires().is_empty() {
            println!("  {}{} provides {}", style(module.source()).green(), kind, module.provides());
        } else {
            println!(
                "  {}{} provides {}, requires {}",
                style(module.source()).green(),
                kind,
                module.provides(),
                module.requires()
            );
        }
    }

    Ok(0)
}
