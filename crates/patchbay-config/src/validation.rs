//! Pre-flight checks for graph documents.
//!
//! Validation compiles the graph (so everything the engine would reject is
//! reported as an error) and then looks for things that load fine but are
//! probably mistakes. Warnings never stop a graph from running.
//!
//! # Example
//!
//! ```rust
//! use patchbay_config::validate_graph;
//! use patchbay_core::{GraphDef, ModuleDef};
//!
//! let graph = GraphDef::new()
//!     .module(ModuleDef::new("osc", "VCO").with_param("frequency", 3.0f32))
//!     .module(ModuleDef::new("out", "OUTPUT"))
//!     .connect("osc.out", "out.in");
//!
//! let warnings = validate_graph(&graph).unwrap();
//! assert_eq!(warnings.len(), 1);
//! assert!(warnings[0].to_string().contains("frequency"));
//! ```

use patchbay_core::{
    GraphDef, ModuleDef, Oscillator, ParamDefault, ParamValue, UnitKind, Waveform,
};
use patchbay_engine::DEFAULT_SAMPLE_RATE;
use thiserror::Error;

use crate::ConfigError;

/// Something suspicious about a graph that still compiles.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationWarning {
    /// A parameter key the unit kind does not read.
    #[error("module '{module}' ({kind}) ignores unknown parameter '{key}'")]
    UnknownParameter {
        /// Module id.
        module: String,
        /// Unit kind.
        kind: UnitKind,
        /// Key as written.
        key: String,
    },

    /// A known key whose value cannot be used, so the default applies.
    #[error("module '{module}' parameter '{key}' = {value} is not usable, default {default} applies")]
    InvalidValue {
        /// Module id.
        module: String,
        /// Parameter key.
        key: String,
        /// Value as written.
        value: String,
        /// Default used instead.
        default: ParamDefault,
    },

    /// The graph declares no OUTPUT module and will render silence.
    #[error("graph has no OUTPUT module and renders silence")]
    NoSink,

    /// The public sink has nothing connected to any input.
    #[error("output module '{0}' has no inputs connected")]
    UnconnectedSink(String),

    /// An OUTPUT module that is not the public sink (a later one wins).
    #[error("output module '{module}' is ignored, '{active}' is the active sink")]
    ShadowedSink {
        /// Ignored sink id.
        module: String,
        /// Sink that is actually mixed.
        active: String,
    },

    /// None of a module's outputs feed anything.
    #[error("module '{0}' has no outgoing connections")]
    UnusedOutputs(String),
}

/// Compiles `graph` and returns warnings in module declaration order.
///
/// Graph-level warnings (no sink) come last.
pub fn validate_graph(graph: &GraphDef) -> Result<Vec<ValidationWarning>, ConfigError> {
    let rack = graph.compile(DEFAULT_SAMPLE_RATE)?;
    let active_sink = rack.sink_id();
    let mut warnings = Vec::new();

    for module in &graph.modules {
        let Ok(kind) = module.kind.parse::<UnitKind>() else {
            continue;
        };
        check_params(module, kind, &mut warnings);

        if kind.is_sink() {
            match active_sink {
                Some(active) if active == module.id => {
                    let connected = rack
                        .unit(active)
                        .is_some_and(|unit| unit.inputs().iter().any(|p| p.is_connected()));
                    if !connected {
                        warnings.push(ValidationWarning::UnconnectedSink(module.id.clone()));
                    }
                }
                Some(active) => warnings.push(ValidationWarning::ShadowedSink {
                    module: module.id.clone(),
                    active: active.to_string(),
                }),
                None => {}
            }
        } else if !graph.connections.iter().any(|c| c.from.id == module.id) {
            warnings.push(ValidationWarning::UnusedOutputs(module.id.clone()));
        }
    }

    if active_sink.is_none() {
        warnings.push(ValidationWarning::NoSink);
    }

    for warning in &warnings {
        tracing::debug!(%warning, "validation");
    }
    Ok(warnings)
}

fn check_params(module: &ModuleDef, kind: UnitKind, warnings: &mut Vec<ValidationWarning>) {
    for (key, value) in module.params.iter() {
        if !kind.knows_param(key) {
            warnings.push(ValidationWarning::UnknownParameter {
                module: module.id.clone(),
                kind,
                key: key.to_string(),
            });
            continue;
        }
        let lookup = if key == Oscillator::LEGACY_SHAPE_KEY {
            "shape"
        } else {
            key
        };
        let Some(spec) = kind.params().iter().find(|spec| spec.key == lookup) else {
            continue;
        };
        let usable = match spec.default {
            ParamDefault::Number(_) => value.as_number().is_some(),
            ParamDefault::Choice { .. } => value
                .as_text()
                .and_then(Waveform::from_name)
                .is_some(),
        };
        if !usable {
            warnings.push(ValidationWarning::InvalidValue {
                module: module.id.clone(),
                key: key.to_string(),
                value: display_value(value),
                default: spec.default,
            });
        }
    }
}

fn display_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Text(s) => format!("{s:?}"),
        ParamValue::Number(n) => n.to_string(),
    }
}
