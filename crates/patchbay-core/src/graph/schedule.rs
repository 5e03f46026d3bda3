//! Compiled units: the per-module runtime records a [`Rack`](super::Rack) executes.

use crate::buffer::BufferId;
use crate::params::Params;
use crate::port::InputPort;
use crate::unit::{Unit, UnitKind};

/// Runtime record for one module of a compiled graph.
///
/// Owns the unit state, a snapshot of the parameters it was built from, its
/// input ports (with fan-in sets) and a contiguous run of output blocks in
/// the rack's arena.
#[derive(Clone, Debug)]
pub struct CompiledUnit {
    pub(crate) id: String,
    pub(crate) unit: Unit,
    pub(crate) params: Params,
    pub(crate) inputs: Vec<InputPort>,
    pub(crate) outputs: BufferId,
}

impl CompiledUnit {
    pub(crate) fn new(id: String, unit: Unit, params: Params, outputs: BufferId) -> Self {
        let inputs = unit
            .kind()
            .input_ports()
            .iter()
            .map(|&name| InputPort::new(name))
            .collect();
        Self {
            id,
            unit,
            params,
            inputs,
            outputs,
        }
    }

    /// Module id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Unit kind.
    pub fn kind(&self) -> UnitKind {
        self.unit.kind()
    }

    /// Unit state.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Parameters the unit was built from.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Input ports in port-table order.
    pub fn inputs(&self) -> &[InputPort] {
        &self.inputs
    }

    /// Looks up an input port by name.
    pub fn input(&self, port: &str) -> Option<&InputPort> {
        self.inputs.iter().find(|p| p.name() == port)
    }

    /// Number of output ports.
    pub fn output_count(&self) -> usize {
        self.kind().output_ports().len()
    }

    /// Arena handle of the first output port.
    pub fn first_output(&self) -> BufferId {
        self.outputs
    }

    /// Arena handle owned by an output port.
    pub fn output_buffer(&self, port: &str) -> Option<BufferId> {
        let index = self.kind().output_index(port)?;
        Some(BufferId(self.outputs.0 + index as u32))
    }

    /// Output ports with their arena handles.
    pub fn output_buffers(&self) -> impl Iterator<Item = (&'static str, BufferId)> + '_ {
        self.kind()
            .output_ports()
            .iter()
            .enumerate()
            .map(|(i, &name)| (name, BufferId(self.outputs.0 + i as u32)))
    }

    /// Returns true if any input reads a one-block-delayed feedback source.
    pub fn has_feedback_input(&self) -> bool {
        self.inputs
            .iter()
            .flat_map(InputPort::sources)
            .any(|source| source.is_feedback())
    }
}
