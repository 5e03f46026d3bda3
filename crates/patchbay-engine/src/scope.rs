//! Periodic snapshots of unit outputs for visualisation.

use patchbay_core::Rack;

use crate::config::ScopeConfig;
use crate::message::ScopeFrame;

/// Counts blocks and decides when a snapshot is due.
#[derive(Clone, Debug)]
pub(crate) struct ScopeTap {
    config: ScopeConfig,
    elapsed: u32,
}

impl ScopeTap {
    pub(crate) fn new(config: ScopeConfig) -> Self {
        Self { config, elapsed: 0 }
    }

    /// Advances one block; true every `interval_blocks` blocks while enabled.
    pub(crate) fn tick(&mut self) -> bool {
        if !self.config.enabled {
            return false;
        }
        self.elapsed += 1;
        if self.elapsed >= self.config.interval_blocks.max(1) {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    /// Restarts the interval, used when a new graph is loaded.
    pub(crate) fn restart(&mut self) {
        self.elapsed = 0;
    }
}

/// Copies the first output block of every unit, in execution order.
pub fn snapshot(rack: &Rack) -> Vec<ScopeFrame> {
    rack.probes()
        .map(|(id, block)| ScopeFrame {
            id: id.to_string(),
            samples: block.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::{BLOCK_SIZE, GraphDef};

    #[test]
    fn disabled_tap_never_fires() {
        let mut tap = ScopeTap::new(ScopeConfig::default());
        assert!((0..100).all(|_| !tap.tick()));
    }

    #[test]
    fn fires_every_interval() {
        let mut tap = ScopeTap::new(ScopeConfig {
            enabled: true,
            interval_blocks: 3,
            capacity: 1,
        });
        let fired: Vec<bool> = (0..7).map(|_| tap.tick()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true, false]);
    }

    #[test]
    fn zero_interval_fires_every_block() {
        let mut tap = ScopeTap::new(ScopeConfig {
            enabled: true,
            interval_blocks: 0,
            capacity: 1,
        });
        assert!(tap.tick() && tap.tick());
    }

    #[test]
    fn snapshot_covers_every_unit() {
        let mut rack = GraphDef::reference().compile(48000.0).unwrap();
        rack.run();
        let frames = snapshot(&rack);
        assert_eq!(frames.len(), 5);
        assert!(frames.iter().all(|f| f.samples.len() == BLOCK_SIZE));
        assert_eq!(
            frames.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
            rack.order().collect::<Vec<_>>()
        );
    }
}
