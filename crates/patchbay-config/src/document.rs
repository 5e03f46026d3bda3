//! Graph documents on disk.
//!
//! JSON documents use the shape the control channel carries. TOML documents
//! have the same fields; either connection endpoint may be written as an
//! `"id.port"` string:
//!
//! ```toml
//! [[modules]]
//! id = "vco1"
//! kind = "VCO"
//! params = { freq = 6, shape = "square" }
//!
//! [[modules]]
//! id = "out"
//! kind = "OUTPUT"
//!
//! [[connections]]
//! from = "vco1.out"
//! to = "out.in"
//! ```

use std::path::Path;

use patchbay_core::GraphDef;

use crate::ConfigError;

/// On-disk encoding of a graph document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphFormat {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl GraphFormat {
    /// Picks the format from a file extension (case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

/// Parses a graph document from a string.
pub fn parse_graph(text: &str, format: GraphFormat) -> Result<GraphDef, ConfigError> {
    let graph = match format {
        GraphFormat::Json => serde_json::from_str(text)?,
        GraphFormat::Toml => toml::from_str(text)?,
    };
    Ok(graph)
}

/// Serializes a graph document. JSON output is pretty-printed.
pub fn graph_to_string(graph: &GraphDef, format: GraphFormat) -> Result<String, ConfigError> {
    let text = match format {
        GraphFormat::Json => serde_json::to_string_pretty(graph)?,
        GraphFormat::Toml => toml::to_string_pretty(graph)?,
    };
    Ok(text)
}

/// Loads a graph document, choosing the format from the extension.
pub fn load_graph(path: impl AsRef<Path>) -> Result<GraphDef, ConfigError> {
    let path = path.as_ref();
    let format = GraphFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let graph = parse_graph(&text, format)?;
    tracing::debug!(
        path = %path.display(),
        modules = graph.modules.len(),
        connections = graph.connections.len(),
        "graph loaded"
    );
    Ok(graph)
}

/// Saves a graph document, choosing the format from the extension.
///
/// Parent directories are not created.
pub fn save_graph(graph: &GraphDef, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let format = GraphFormat::from_path(path)?;
    let text = graph_to_string(graph, format)?;
    std::fs::write(path, text).map_err(|e| ConfigError::write_file(path, e))?;
    tracing::debug!(path = %path.display(), "graph saved");
    Ok(())
}
