//! lasso - compute module load orders from a capability descriptor.

mod providers;
mod resolve;
mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use log::LevelFilter;

use lasso_order::{CapabilityGraph, Descriptor};

use crate::providers::ProvidersArgs;
use crate::resolve::ResolveArgs;
use crate::validate::ValidateArgs;

#[derive(Parser, Debug)]
#[command(name = "lasso", version, about = "Resolve module load orders from capability descriptors")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve requested ids into a load order
    Resolve(ResolveArgs),

    /// Check the descriptor for cycles and unsatisfiable requirements
    Validate(ValidateArgs),

    /// List the modules providing an id
    Providers(ProvidersArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Resolve(args) => resolve::execute(args),
        Commands::Validate(args) => validate::execute(args),
        Commands::Providers(args) => providers::execute(args),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            1
        }
    };
    std::process::exit(code);
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Load a descriptor file and build its graph
pub(crate) fn load_descriptor(path: &Path) -> Result<(Descriptor, CapabilityGraph)> {
    let descriptor = Descriptor::from_path(path)
        .with_context(|| format!("Failed to load descriptor {}", path.display()))?;
    let graph = descriptor.to_graph();
    log::info!("Registered {} modules from {}", graph.len(), path.display());
    Ok((descriptor, graph))
}
