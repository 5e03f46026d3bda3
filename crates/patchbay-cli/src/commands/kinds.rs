//! Unit kind listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use patchbay_core::{ParamDefault, UnitKind};

#[derive(Args)]
pub struct KindsArgs {
    /// Show details for a specific kind
    #[arg(value_name = "KIND")]
    kind: Option<String>,
}

pub fn run(args: KindsArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.kind {
        let kind: UnitKind = name
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown kind: {}", name))?;
        show_kind(kind);
        return Ok(());
    }

    println!("Unit Kinds");
    println!("==========");
    println!();
    println!("  {:10}  {:26}  {:12}  {}", "Kind", "Inputs", "Outputs", "Description");
    println!("  {:10}  {:26}  {:12}  {}", "----", "------", "-------", "-----------");
    for kind in UnitKind::ALL {
        println!(
            "  {:10}  {:26}  {:12}  {}",
            kind.name(),
            kind.input_ports().join(", "),
            kind.output_ports().join(", "),
            kind.description()
        );
    }
    println!();
    println!("Use 'patchbay kinds <KIND>' for parameters.");
    Ok(())
}

fn show_kind(kind: UnitKind) {
    println!("{}", kind.name());
    println!("{}", "=".repeat(kind.name().len()));
    println!();
    println!("{}", kind.description());
    println!();
    println!("Inputs:  {}", kind.input_ports().join(", "));
    println!("Outputs: {}", kind.output_ports().join(", "));
    println!();

    if kind.params().is_empty() {
        println!("Parameters: none");
        return;
    }

    println!("Parameters:");
    println!();
    println!("  {:14}  {:10}  {:6}  {}", "Name", "Default", "Unit", "Description");
    println!("  {:14}  {:10}  {:6}  {}", "----", "-------", "----", "-----------");
    for param in kind.params() {
        let description = match param.default {
            ParamDefault::Choice { options, .. } => {
                format!("{} ({})", param.description, options.join(", "))
            }
            ParamDefault::Number(_) => param.description.to_string(),
        };
        println!(
            "  {:14}  {:10}  {:6}  {}",
            param.key,
            param.default.to_string(),
            param.unit,
            description
        );
    }
}
