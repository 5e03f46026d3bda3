//! Factory patch commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use patchbay_config::{FACTORY_PATCHES, get_factory_patch, save_graph};

#[derive(Args)]
pub struct PatchesArgs {
    #[command(subcommand)]
    command: Option<PatchesCommand>,
}

#[derive(Subcommand)]
enum PatchesCommand {
    /// List factory patches
    List,

    /// Print a factory patch document
    Show {
        /// Factory patch name
        name: String,
    },

    /// Write a factory patch to a .json or .toml file for editing
    Export {
        /// Factory patch name
        name: String,

        /// Destination file
        output: PathBuf,
    },
}

pub fn run(args: PatchesArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(PatchesCommand::List) {
        PatchesCommand::List => {
            list_patches();
            Ok(())
        }
        PatchesCommand::Show { name } => show_patch(&name),
        PatchesCommand::Export { name, output } => export_patch(&name, &output),
    }
}

fn list_patches() {
    println!("Factory Patches:");
    println!("================");
    for patch in FACTORY_PATCHES {
        println!("  {:14} - {}", patch.name, patch.description);
    }
    println!();
    println!("Render one with: patchbay render <name> out.wav");
}

fn show_patch(name: &str) -> anyhow::Result<()> {
    let patch = get_factory_patch(name)
        .ok_or_else(|| anyhow::anyhow!("Factory patch '{}' not found", name))?;
    println!("# {} - {}", patch.name, patch.description);
    print!("{}", patch.source());
    Ok(())
}

fn export_patch(name: &str, output: &std::path::Path) -> anyhow::Result<()> {
    let patch = get_factory_patch(name)
        .ok_or_else(|| anyhow::anyhow!("Factory patch '{}' not found", name))?;
    save_graph(&patch.graph()?, output)?;
    println!("Wrote {} to {}", patch.name, output.display());
    Ok(())
}
