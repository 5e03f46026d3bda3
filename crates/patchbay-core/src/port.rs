//! Input ports and their fan-in sets.
//!
//! An [`InputPort`] owns a unit-local block that is rebuilt every block from
//! its fan-in list ("stacking"):
//!
//! | Fan-in | Resulting input |
//! |--------|-----------------|
//! | empty | silence (0 V) |
//! | one source | sample-for-sample copy |
//! | several sources | elementwise **sum** (never an average) |
//!
//! Fan-in entries hold [`BufferId`] handles into the arena, never copies and
//! never ownership.

use crate::buffer::{Block, BufferArena, BufferId, SILENCE, accumulate};
use crate::graph::PortRef;

/// One source feeding an input port.
#[derive(Clone, Debug, PartialEq)]
pub struct FanIn {
    /// Arena block read at aggregation time.
    pub(crate) buffer: BufferId,
    /// Output port the signal comes from.
    pub(crate) source: PortRef,
    /// True when the connection closes a cycle and reads last block's output.
    pub(crate) feedback: bool,
}

impl FanIn {
    /// Returns the arena handle this entry reads.
    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    /// Returns the source unit and port.
    pub fn source(&self) -> &PortRef {
        &self.source
    }

    /// Returns true if this entry is a one-block-delayed feedback read.
    pub fn is_feedback(&self) -> bool {
        self.feedback
    }
}

/// A named input port with its aggregated block and fan-in list.
#[derive(Clone, Debug)]
pub struct InputPort {
    name: &'static str,
    block: Block,
    sources: Vec<FanIn>,
}

impl InputPort {
    /// Creates an unconnected port.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            block: SILENCE,
            sources: Vec::new(),
        }
    }

    /// Returns the port name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the block computed by the last [`gather`](Self::gather).
    pub fn block(&self) -> &Block {
        &self.block
    }

    /// Returns the fan-in set in connection order.
    pub fn sources(&self) -> &[FanIn] {
        &self.sources
    }

    /// Returns true if at least one source feeds this port.
    pub fn is_connected(&self) -> bool {
        !self.sources.is_empty()
    }

    pub(crate) fn push_source(&mut self, source: FanIn) {
        self.sources.push(source);
    }

    pub(crate) fn sources_mut(&mut self) -> &mut [FanIn] {
        &mut self.sources
    }

    /// Rebuilds the port's block from its fan-in set.
    #[inline]
    pub fn gather(&mut self, arena: &BufferArena) {
        match self.sources.as_slice() {
            [] => self.block.fill(0.0),
            [only] => self.block.copy_from_slice(arena.get(only.buffer)),
            [first, rest @ ..] => {
                self.block.copy_from_slice(arena.get(first.buffer));
                for source in rest {
                    accumulate(&mut self.block, arena.get(source.buffer));
                }
            }
        }
    }
}
