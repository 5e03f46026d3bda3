//! Engine construction settings.

use serde::{Deserialize, Serialize};

/// Default host sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// Sizes and rates fixed when the engine is built.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Sample rate graphs are compiled for until the host reports another.
    pub sample_rate: f32,
    /// Pending `loadGraph` commands the queue holds (1 = single slot).
    pub command_capacity: usize,
    /// Status replies buffered for the controller before new ones are dropped.
    pub status_capacity: usize,
    /// Scope tap settings.
    pub scope: ScopeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            command_capacity: 1,
            status_capacity: 16,
            scope: ScopeConfig::default(),
        }
    }
}

/// Scope tap: periodic snapshots of every unit's first output.
///
/// Building a snapshot allocates, so the tap is off unless enabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
    /// Emit `scopeData` messages.
    pub enabled: bool,
    /// Blocks between snapshots.
    pub interval_blocks: u32,
    /// Snapshots buffered for the controller before new ones are dropped.
    pub capacity: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_blocks: 8,
            capacity: 4,
        }
    }
}
