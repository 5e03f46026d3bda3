//! Errors on the controller side of the control channel.

use std::time::Duration;

/// Error sending a command or waiting for a reply.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The command queue is full; the engine has not drained it yet.
    #[error("command queue is full")]
    QueueFull,
    /// The engine has been dropped.
    #[error("engine disconnected")]
    Disconnected,
    /// No reply arrived in time.
    #[error("no reply from engine within {0:?}")]
    Timeout(Duration),
}
