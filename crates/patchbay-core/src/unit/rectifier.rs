//! Full-wave rectifier.

use crate::buffer::Block;

/// Full-wave rectifier: `out = |in|`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rectifier;

impl Rectifier {
    /// Renders one block.
    #[inline]
    pub fn process(&self, input: &Block, out: &mut Block) {
        for (o, &x) in out.iter_mut().zip(input.iter()) {
            *o = x.abs();
        }
    }
}
