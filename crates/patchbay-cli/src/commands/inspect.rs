//! Compiled schedule inspection command.

use clap::Args;
use patchbay_core::{Rack, compile};
use patchbay_engine::DEFAULT_SAMPLE_RATE;
use serde_json::json;

use super::common::load_graph;

#[derive(Args)]
pub struct InspectArgs {
    /// Factory patch name or graph file (.json or .toml)
    #[arg(value_name = "GRAPH")]
    graph: String,

    /// Sample rate to compile for
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE as u32)]
    sample_rate: u32,

    /// Print the schedule as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph)?;
    let rack = compile(&graph, args.sample_rate as f32)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule_json(&rack))?);
    } else {
        print_schedule(&args.graph, &rack);
    }
    Ok(())
}

fn print_schedule(name: &str, rack: &Rack) {
    let title = format!("Schedule: {name}");
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!();

    println!("Execution order:");
    for (i, unit) in rack.units().iter().enumerate() {
        let marker = if i < rack.acyclic_len() { "" } else { "  [cycle]" };
        println!("  {:3}. {:16} {}{}", i + 1, unit.id(), unit.kind(), marker);

        for port in unit.inputs().iter().filter(|p| p.is_connected()) {
            let sources: Vec<String> = port
                .sources()
                .iter()
                .map(|s| {
                    if s.is_feedback() {
                        format!("{} (previous block)", s.source())
                    } else {
                        s.source().to_string()
                    }
                })
                .collect();
            println!("         {:8} <- {}", port.name(), sources.join(" + "));
        }
        for (port, buffer) in unit.output_buffers() {
            println!("         {:8} -> buffer {}", port, buffer);
        }
    }
    println!();

    if rack.feedback_edges().is_empty() {
        println!("Feedback edges: none");
    } else {
        println!("Feedback edges (one block delay):");
        for edge in rack.feedback_edges() {
            println!("  {edge}");
        }
    }
    println!();

    println!("Units:     {}", rack.len());
    println!("Sorted:    {}", rack.acyclic_len());
    println!("Buffers:   {}", rack.buffer_count());
    println!("Sink:      {}", rack.sink_id().unwrap_or("(none, renders silence)"));
}

fn schedule_json(rack: &Rack) -> serde_json::Value {
    let units: Vec<_> = rack
        .units()
        .iter()
        .map(|unit| {
            let inputs: serde_json::Map<String, serde_json::Value> = unit
                .inputs()
                .iter()
                .filter(|p| p.is_connected())
                .map(|port| {
                    let sources: Vec<_> = port
                        .sources()
                        .iter()
                        .map(|s| json!({ "from": s.source().to_string(), "feedback": s.is_feedback() }))
                        .collect();
                    (port.name().to_string(), json!(sources))
                })
                .collect();
            let outputs: Vec<_> = unit
                .output_buffers()
                .map(|(port, _)| format!("{}.{}", unit.id(), port))
                .collect();
            json!({
                "id": unit.id(),
                "kind": unit.kind().name(),
                "inputs": inputs,
                "outputs": outputs,
            })
        })
        .collect();

    json!({
        "order": rack.order().collect::<Vec<_>>(),
        "acyclicLen": rack.acyclic_len(),
        "feedbackEdges": rack.feedback_edges().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "bufferCount": rack.buffer_count(),
        "sink": rack.sink_id(),
        "units": units,
    })
}
