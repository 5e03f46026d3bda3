//! Final output unit.

use crate::buffer::Block;

/// The sink: passes its mono `in` port through to `out`.
///
/// Stereo selection between `in`, `inL` and `inR` plus the soft limiter are
/// done by the rack's mixer after the whole schedule has run, not here.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sink;

impl Sink {
    /// Renders one block.
    #[inline]
    pub fn process(&self, mono: &Block, out: &mut Block) {
        out.copy_from_slice(mono);
    }
}
