//! Patchbay Engine - host-facing wrapper around the patchbay-core scheduler
//!
//! [`Engine`] runs on the audio thread and is driven once per block by the
//! host. A [`Controller`] on any other thread replaces the graph through a
//! bounded command queue and receives status replies and optional scope
//! snapshots.
//!
//! # Threading
//!
//! | Side | Type | Blocks? |
//! |------|------|---------|
//! | audio thread | [`Engine`] | never |
//! | controller | [`Controller`] | only in `*_blocking` / `recv_timeout` |
//!
//! Graph compilation happens on the audio thread between blocks, so no block
//! is ever processed against a half-built graph and no lock is needed.
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::{BLOCK_SIZE, GraphDef};
//! use patchbay_engine::{Engine, EngineConfig, EngineMessage};
//!
//! let (mut engine, controller) = Engine::new(EngineConfig::default());
//! controller.load_graph(GraphDef::reference()).unwrap();
//!
//! let mut left = [0.0; BLOCK_SIZE];
//! let mut right = [0.0; BLOCK_SIZE];
//! engine.process_block(48000.0, &mut left, &mut right);
//!
//! assert_eq!(controller.try_recv(), Some(EngineMessage::GraphLoaded { success: true }));
//! ```

mod channel;
mod config;
mod engine;
mod error;
mod message;
mod scope;

pub use channel::Controller;
pub use config::{DEFAULT_SAMPLE_RATE, EngineConfig, ScopeConfig};
pub use engine::Engine;
pub use error::ControlError;
pub use message::{ControlMessage, EngineMessage, ScopeFrame};
pub use scope::snapshot;
