//! Patchbay Core - block-based modular signal processing
//!
//! Compiles a declarative patch (units plus port-to-port connections) into an
//! executable schedule and runs it one 128-sample block at a time.
//!
//! # Core Abstractions
//!
//! ## Units
//!
//! - [`Unit`] - Closed enum over every unit kind, one compute call per block
//! - [`UnitKind`] - Kind tags with static port and parameter tables
//! - [`Oscillator`], [`Lfo`], [`Amplifier`], [`Slew`], [`Panner`],
//!   [`Rectifier`], [`Delay`], [`Sink`] - Per-kind state and kernels
//!
//! ## Port Buffers
//!
//! - [`BufferArena`] - Flat pool of blocks, one per output port
//! - [`InputPort`] - Fan-in list plus the aggregated (summed) input block
//!
//! ## Graphs
//!
//! - [`GraphDef`] - Serde-friendly graph document
//! - [`compile`] - Graph compiler (Kahn order, cyclic tail, feedback edges)
//! - [`Rack`] - Block scheduler and soft-limited stereo mixer
//!
//! # Signal Convention
//!
//! Everything is in "volts": ±5 V is nominal full scale, pitch is 1 V/octave
//! around 32.703 Hz. See [`math`].
//!
//! # Features
//!
//! - `tracing` - compile-time diagnostics (sort result, feedback edges,
//!   buffer count) through the `tracing` crate. The block path never logs.

pub mod buffer;
pub mod graph;
pub mod math;
pub mod params;
pub mod port;
pub mod unit;

pub use buffer::{BLOCK_SIZE, Block, BufferArena, BufferId, SILENCE};
pub use graph::{
    CompiledUnit, Connection, GraphDef, GraphError, ModuleDef, PortAddressError, PortRef, Rack,
    compile,
};
pub use params::{ParamValue, Params};
pub use port::{FanIn, InputPort};
pub use unit::{
    Amplifier, Delay, Lfo, Oscillator, ParamDefault, ParamSpec, Panner, ParseKindError,
    Rectifier, Sink, Slew, Unit, UnitKind, Waveform,
};
