//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use patchbay_config::{get_factory_patch, load_graph as load_graph_file};
use patchbay_core::GraphDef;

/// Load a graph by factory patch name or path.
///
/// Factory patch names win over relative paths of the same spelling.
pub fn load_graph(name: &str) -> anyhow::Result<GraphDef> {
    if let Some(patch) = get_factory_patch(name) {
        tracing::debug!(patch = patch.name, "using factory patch");
        return Ok(patch.graph()?);
    }

    let path = Path::new(name);
    if path.exists() {
        return Ok(load_graph_file(path)?);
    }

    anyhow::bail!(
        "Graph '{}' not found. Use 'patchbay patches' to see factory patches.",
        name
    )
}

/// Peak absolute value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Root mean square.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Convert linear amplitude to decibels, floored at -120 dB.
pub fn linear_to_db(value: f32) -> f32 {
    if value <= 1e-6 {
        -120.0
    } else {
        20.0 * value.log10()
    }
}
