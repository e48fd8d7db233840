//! Resolve command - compute the load order for requested ids.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;

use lasso_order::{Policy, Position, Request, Resolver};

use crate::load_descriptor;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Ids to resolve in the bottom group (defaults to the descriptor queue)
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,

    /// Ids to resolve in the head group, before all others
    #[arg(long = "head", value_name = "ID")]
    pub head: Vec<String>,

    /// Descriptor file
    #[arg(short = 'c', long, default_value = "config.json")]
    pub config: PathBuf,

    /// Let compound bundles compete during resolution
    #[arg(long)]
    pub greedy: bool,

    /// Skip the bundle optimization pass
    #[arg(long)]
    pub no_optimize: bool,

    /// Output as JSON
    #[arg(long)]
    pub format_json: bool,
}

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    modules: &'a [String],
    elapsed_ms: f64,
}

pub fn execute(args: ResolveArgs) -> Result<i32> {
    let (descriptor, graph) = load_descriptor(&args.config)?;

    let mut request = Request::new(&graph);
    if args.ids.is_empty() && args.head.is_empty() {
        descriptor.queue_into(&mut request)?;
    } else {
        for id in &args.head {
            request.queue_at(id, Position::Head)?;
        }
        for id in &args.ids {
            request.queue(id)?;
        }
    }

    if request.is_empty() {
        eprintln!("{} Nothing to resolve.", style("Info:").cyan());
        return Ok(0);
    }

    let policy = Policy::new()
        .prefer_simple(!args.greedy)
        .optimize(!args.no_optimize);
    let resolver = Resolver::with_policy(&graph, policy);

    let start = Instant::now();
    let modules = resolver.resolve_request(&request)?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    if args.format_json {
        let output = ResolveOutput {
            modules: &modules,
            elapsed_ms,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(0);
    }

    for (n, module) in modules.iter().enumerate() {
        println!("{}: {}", n, style(module).green());
    }
    println!("executed in {:.5} milliseconds", elapsed_ms);

    Ok(0)
}
