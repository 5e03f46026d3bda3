//! Graph validation command.

use clap::Args;
use patchbay_config::validate_graph;

use super::common::load_graph;

#[derive(Args)]
pub struct ValidateArgs {
    /// Factory patch name or graph file (.json or .toml)
    #[arg(value_name = "GRAPH")]
    graph: String,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph)?;
    let warnings = validate_graph(&graph)?;

    println!(
        "{}: {} modules, {} connections",
        args.graph,
        graph.modules.len(),
        graph.connections.len()
    );

    if warnings.is_empty() {
        println!("OK");
        return Ok(());
    }

    for warning in &warnings {
        println!("  warning: {warning}");
    }
    println!("{} warning(s)", warnings.len());

    if args.strict {
        anyhow::bail!("{} warning(s) in strict mode", warnings.len());
    }
    Ok(())
}
