//! The host-facing engine.
//!
//! [`Engine`] lives on the audio thread. Each call to
//! [`process_block`](Engine::process_block) first drains every pending
//! command from the [`Controller`], answering each one, then runs the
//! current [`Rack`] for one block. Graph swaps therefore only ever happen
//! between blocks.
//!
//! A load that fails to compile leaves the running rack in place.

use patchbay_core::{BLOCK_SIZE, GraphDef, GraphError, Rack, compile};

use crate::channel::{Controller, EngineEndpoint, pair};
use crate::config::EngineConfig;
use crate::message::{ControlMessage, EngineMessage};
use crate::scope::{ScopeTap, snapshot};

/// Real-time engine: owns the running rack and the engine side of the
/// control channel.
#[derive(Debug)]
pub struct Engine {
    rack: Option<Rack>,
    /// Last graph that compiled, kept for sample-rate changes.
    graph: Option<GraphDef>,
    sample_rate: f32,
    endpoint: EngineEndpoint,
    scope: ScopeTap,
    blocks: u64,
}

impl Engine {
    /// Creates an engine with no graph loaded, plus its controller.
    pub fn new(config: EngineConfig) -> (Self, Controller) {
        let (controller, endpoint) = pair(&config);
        let engine = Self {
            rack: None,
            graph: None,
            sample_rate: config.sample_rate,
            endpoint,
            scope: ScopeTap::new(config.scope),
            blocks: 0,
        };
        (engine, controller)
    }

    /// Handles pending commands, then renders one stereo block.
    ///
    /// Both channels are always written: up to [`BLOCK_SIZE`] samples of
    /// limited output, zero beyond that, and silence when no graph is loaded
    /// or `sample_rate` is not a positive finite number.
    pub fn process_block(&mut self, sample_rate: f32, left: &mut [f32], right: &mut [f32]) {
        let rate_ok = sample_rate.is_finite() && sample_rate > 0.0;
        if rate_ok {
            self.set_sample_rate(sample_rate);
        }
        self.poll_commands();

        match self.rack.as_mut() {
            Some(rack) if rate_ok => {
                rack.process_block(left, right);
                self.blocks += 1;
                if self.scope.tick() {
                    let frames = snapshot(rack);
                    if self
                        .endpoint
                        .scope
                        .try_send(EngineMessage::ScopeData { frames })
                        .is_err()
                    {
                        tracing::trace!("scope channel full, snapshot dropped");
                    }
                }
            }
            _ => {
                left.fill(0.0);
                right.fill(0.0);
            }
        }
    }

    /// Renders one block into a mono host buffer (mean of both channels).
    pub fn process_block_mono(&mut self, sample_rate: f32, out: &mut [f32]) {
        let mut right = [0.0; BLOCK_SIZE];
        let n = out.len().min(BLOCK_SIZE);
        self.process_block(sample_rate, out, &mut right[..n]);
        for (o, r) in out.iter_mut().zip(right.iter()) {
            *o = 0.5 * (*o + *r);
        }
    }

    /// Drains and answers every pending command. Returns how many were handled.
    pub fn poll_commands(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.endpoint.commands.try_recv() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    fn handle(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::LoadGraph { graph } => {
                let reply = match self.load_graph(graph) {
                    Ok(()) => EngineMessage::GraphLoaded { success: true },
                    Err(e) => EngineMessage::Error {
                        message: e.to_string(),
                    },
                };
                self.reply(reply);
            }
        }
    }

    fn reply(&self, message: EngineMessage) {
        if let Err(e) = self.endpoint.status.try_send(message) {
            tracing::warn!(reply = e.into_inner().kind(), "status channel full, reply dropped");
        }
    }

    /// Compiles and installs `graph` directly, bypassing the channel.
    ///
    /// On error the previous rack (or silence) stays in place.
    pub fn load_graph(&mut self, graph: GraphDef) -> Result<(), GraphError> {
        match compile(&graph, self.sample_rate) {
            Ok(rack) => {
                tracing::info!(
                    units = rack.len(),
                    cyclic = rack.len() - rack.acyclic_len(),
                    feedback_edges = rack.feedback_edges().len(),
                    buffers = rack.buffer_count(),
                    "graph loaded"
                );
                self.rack = Some(rack);
                self.graph = Some(graph);
                self.scope.restart();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    keeping_previous = self.rack.is_some(),
                    "graph load failed"
                );
                Err(e)
            }
        }
    }

    /// Unloads the graph; the engine emits silence until the next load.
    pub fn clear(&mut self) {
        self.rack = None;
        self.graph = None;
    }

    /// Switches to a new sample rate, recompiling the current graph.
    ///
    /// Unit state (phases, delay lines) restarts. Ignored for non-positive or
    /// non-finite rates.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate == self.sample_rate || !sample_rate.is_finite() || sample_rate <= 0.0 {
            return;
        }
        tracing::info!(from = self.sample_rate, to = sample_rate, "sample rate changed");
        self.sample_rate = sample_rate;

        let Some(graph) = self.graph.as_ref() else {
            return;
        };
        match compile(graph, sample_rate) {
            Ok(rack) => self.rack = Some(rack),
            Err(e) => tracing::warn!(error = %e, "recompile after sample rate change failed"),
        }
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Returns true if a graph is running.
    pub fn is_loaded(&self) -> bool {
        self.rack.is_some()
    }

    /// The running rack, if any.
    pub fn rack(&self) -> Option<&Rack> {
        self.rack.as_ref()
    }

    /// The running graph definition, if any.
    pub fn graph(&self) -> Option<&GraphDef> {
        self.graph.as_ref()
    }

    /// Blocks rendered with a graph loaded.
    pub fn blocks_processed(&self) -> u64 {
        self.blocks
    }
}
