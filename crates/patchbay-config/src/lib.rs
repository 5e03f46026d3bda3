//! Configuration and patch management for patchbay.
//!
//! This crate sits between the signal engine and anything that reads files:
//! graph documents, engine settings, pre-flight validation and the patches
//! that ship with the library.
//!
//! # Features
//!
//! - **Graph Documents**: Load and save graphs as JSON or TOML, picked by extension
//! - **Settings**: Engine and scope settings from a TOML file, every key optional
//! - **Validation**: Warnings for suspicious but loadable graphs
//! - **Factory Patches**: Built-in graphs, addressable by name
//!
//! # Example
//!
//! ```rust,no_run
//! use patchbay_config::{load_graph, save_graph, factory_patch, validate_graph};
//!
//! // Load a graph from file
//! let graph = load_graph("my_patch.toml").unwrap();
//!
//! // Check it before handing it to an engine
//! for warning in validate_graph(&graph).unwrap() {
//!     println!("warning: {warning}");
//! }
//!
//! // Save a factory patch as JSON
//! let graph = factory_patch("dub_delay").unwrap();
//! save_graph(&graph, "dub_delay.json").unwrap();
//! ```

mod document;
mod error;
mod settings;

/// Pre-flight graph validation.
pub mod validation;

/// Factory patches bundled with the library.
pub mod factory_patches;

pub use document::{GraphFormat, graph_to_string, load_graph, parse_graph, save_graph};
pub use error::ConfigError;
pub use factory_patches::{
    FACTORY_PATCH_NAMES, FACTORY_PATCHES, FactoryPatch, factory_patch, get_factory_patch,
    is_factory_patch,
};
pub use settings::{EngineSettings, Settings};
pub use validation::{ValidationWarning, validate_graph};
