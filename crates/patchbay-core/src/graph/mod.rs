//! Graph definitions, compilation and block execution.
//!
//! A [`GraphDef`] is the declarative document: modules plus port-to-port
//! connections. [`compile`] turns it into a [`Rack`], the executable
//! schedule. The rack is immutable in shape: a new graph means a new rack.
//!
//! # Feedback
//!
//! Cycles are allowed. Units that Kahn's algorithm cannot order are
//! appended after the acyclic prefix in declaration order, and every
//! connection inside a cycle reads its source's output from the previous
//! block. A cycle therefore costs exactly one block (128 samples) of delay.
//!
//! Other connections between tail units read the live output block. The
//! consumer sees the current block only if it is declared after the
//! producer; a consumer declared earlier runs first and sees the previous
//! block. Such connections are not listed as feedback edges.
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::graph::{GraphDef, ModuleDef};
//! use patchbay_core::BLOCK_SIZE;
//!
//! let graph = GraphDef::new()
//!     .module(ModuleDef::new("osc", "VCO").with_param("freq", 4.0f32))
//!     .module(ModuleDef::new("out", "OUTPUT"))
//!     .connect("osc.out", "out.in");
//!
//! let mut rack = graph.compile(48000.0)?;
//! let mut left = [0.0; BLOCK_SIZE];
//! let mut right = [0.0; BLOCK_SIZE];
//! rack.process_block(&mut left, &mut right);
//! assert!(left.iter().all(|s| s.abs() < 1.0));
//! # Ok::<(), patchbay_core::GraphError>(())
//! ```

mod compiler;
mod definition;
mod error;
mod rack;
mod schedule;

pub use compiler::compile;
pub use definition::{Connection, GraphDef, ModuleDef, PortRef};
pub use error::{GraphError, PortAddressError};
pub use rack::Rack;
pub use schedule::CompiledUnit;
