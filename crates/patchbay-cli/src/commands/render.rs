//! Offline rendering command.
//!
//! Drives the engine exactly like an audio host: the graph goes through the
//! control channel, then the engine is pulled one block at a time.

use std::path::PathBuf;

use clap::Args;
use hound::{SampleFormat, WavSpec, WavWriter};
use indicatif::{ProgressBar, ProgressStyle};
use patchbay_config::Settings;
use patchbay_core::BLOCK_SIZE;
use patchbay_engine::{Engine, EngineConfig, EngineMessage};

use super::common::{linear_to_db, load_graph, peak, rms};

#[derive(Args)]
pub struct RenderArgs {
    /// Factory patch name or graph file (.json or .toml)
    #[arg(value_name = "GRAPH")]
    graph: String,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(short, long, default_value = "5.0")]
    duration: f32,

    /// Sample rate (overrides the settings file)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Engine settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("Duration must be a positive number of seconds");
    }

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut config: EngineConfig = settings.engine_config();
    if let Some(rate) = args.sample_rate {
        if rate == 0 {
            anyhow::bail!("Sample rate must be positive");
        }
        config.sample_rate = rate as f32;
    }
    let sample_rate = config.sample_rate;

    let graph = load_graph(&args.graph)?;
    let (mut engine, controller) = Engine::new(config);
    controller.load_graph(graph)?;

    let total = (f64::from(args.duration) * f64::from(sample_rate)).round() as usize;
    tracing::info!(
        graph = %args.graph,
        sample_rate,
        samples = total,
        "rendering"
    );

    let spec = WavSpec {
        channels: 2,
        sample_rate: sample_rate as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&args.output, spec)?;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut left = [0.0f32; BLOCK_SIZE];
    let mut right = [0.0f32; BLOCK_SIZE];
    let mut rendered_left = Vec::with_capacity(total);
    let mut rendered_right = Vec::with_capacity(total);
    let mut written = 0;

    while written < total {
        engine.process_block(sample_rate, &mut left, &mut right);

        for message in controller.drain() {
            match message {
                EngineMessage::Error { message } => {
                    pb.abandon();
                    anyhow::bail!("Graph failed to load: {}", message);
                }
                EngineMessage::GraphLoaded { .. } => tracing::debug!("graph loaded"),
                EngineMessage::ScopeData { .. } => {}
            }
        }

        let n = BLOCK_SIZE.min(total - written);
        for (&l, &r) in left[..n].iter().zip(&right[..n]) {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
        rendered_left.extend_from_slice(&left[..n]);
        rendered_right.extend_from_slice(&right[..n]);
        written += n;
        pb.set_position(written as u64);
    }

    writer.finalize()?;
    pb.finish_with_message("done");

    println!(
        "Rendered {:.2}s ({} blocks) to {}",
        total as f32 / sample_rate,
        engine.blocks_processed(),
        args.output.display()
    );
    println!("\nStats:");
    for (name, samples) in [("Left", &rendered_left), ("Right", &rendered_right)] {
        println!(
            "  {:6} RMS {:.1} dB, Peak {:.1} dB",
            format!("{name}:"),
            linear_to_db(rms(samples)),
            linear_to_db(peak(samples))
        );
    }

    Ok(())
}
