//! Patchbay CLI - offline host for the patchbay modular signal engine.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patchbay")]
#[command(author, version, about = "Patchbay modular signal engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a graph to a stereo WAV file
    Render(commands::render::RenderArgs),

    /// Show the compiled execution schedule of a graph
    Inspect(commands::inspect::InspectArgs),

    /// Check a graph for errors and suspicious wiring
    Validate(commands::validate::ValidateArgs),

    /// List unit kinds with their ports and parameters
    Kinds(commands::kinds::KindsArgs),

    /// List and show factory patches
    Patches(commands::patches::PatchesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Kinds(args) => commands::kinds::run(args),
        Commands::Patches(args) => commands::patches::run(args),
    }
}
