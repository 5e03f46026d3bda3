//! Controller ⇄ engine channels.
//!
//! Three crossbeam channels connect the two sides:
//!
//! | Channel | Direction | Kind | Full behaviour |
//! |---------|-----------|------|----------------|
//! | commands | controller → engine | bounded (default 1 slot) | [`Controller::load_graph`] fails, [`Controller::load_graph_blocking`] waits |
//! | status | engine → controller | bounded | reply dropped and logged |
//! | scope | engine → controller | bounded | snapshot dropped |
//!
//! The engine never blocks on any of them.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError, bounded};
use patchbay_core::GraphDef;

use crate::config::EngineConfig;
use crate::error::ControlError;
use crate::message::{ControlMessage, EngineMessage, ScopeFrame};

/// Controller side: sends commands, receives replies and scope snapshots.
#[derive(Debug)]
pub struct Controller {
    commands: Sender<ControlMessage>,
    status: Receiver<EngineMessage>,
    scope: Receiver<EngineMessage>,
}

/// Engine side of the channels.
#[derive(Debug)]
pub(crate) struct EngineEndpoint {
    pub(crate) commands: Receiver<ControlMessage>,
    pub(crate) status: Sender<EngineMessage>,
    pub(crate) scope: Sender<EngineMessage>,
}

/// Creates a connected controller/engine pair sized from `config`.
pub(crate) fn pair(config: &EngineConfig) -> (Controller, EngineEndpoint) {
    let (command_tx, command_rx) = bounded(config.command_capacity.max(1));
    let (status_tx, status_rx) = bounded(config.status_capacity.max(1));
    let (scope_tx, scope_rx) = bounded(config.scope.capacity.max(1));
    (
        Controller {
            commands: command_tx,
            status: status_rx,
            scope: scope_rx,
        },
        EngineEndpoint {
            commands: command_rx,
            status: status_tx,
            scope: scope_tx,
        },
    )
}

impl Controller {
    /// Queues a command without blocking.
    pub fn send(&self, message: ControlMessage) -> Result<(), ControlError> {
        self.commands.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => ControlError::QueueFull,
            TrySendError::Disconnected(_) => ControlError::Disconnected,
        })
    }

    /// Queues a command, waiting for a free slot.
    pub fn send_blocking(&self, message: ControlMessage) -> Result<(), ControlError> {
        self.commands
            .send(message)
            .map_err(|_| ControlError::Disconnected)
    }

    /// Queues a graph replacement without blocking.
    ///
    /// Fails with [`ControlError::QueueFull`] if an earlier load is still
    /// pending.
    pub fn load_graph(&self, graph: GraphDef) -> Result<(), ControlError> {
        self.send(ControlMessage::LoadGraph { graph })
    }

    /// Queues a graph replacement, waiting for the engine to free the slot.
    pub fn load_graph_blocking(&self, graph: GraphDef) -> Result<(), ControlError> {
        self.send_blocking(ControlMessage::LoadGraph { graph })
    }

    /// Returns the next status reply, if one is waiting.
    pub fn try_recv(&self) -> Option<EngineMessage> {
        self.status.try_recv().ok()
    }

    /// Waits up to `timeout` for the next status reply.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineMessage, ControlError> {
        self.status.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => ControlError::Timeout(timeout),
            RecvTimeoutError::Disconnected => ControlError::Disconnected,
        })
    }

    /// Drains every waiting status reply.
    pub fn drain(&self) -> Vec<EngineMessage> {
        self.status.try_iter().collect()
    }

    /// Returns the most recent scope snapshot, discarding older ones.
    pub fn latest_scope(&self) -> Option<Vec<ScopeFrame>> {
        let mut latest = None;
        loop {
            match self.scope.try_recv() {
                Ok(EngineMessage::ScopeData { frames }) => latest = Some(frames),
                Ok(_) => {}
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return latest,
            }
        }
    }
}
