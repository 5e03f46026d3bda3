//! Voltage-controlled amplifier.

use crate::buffer::Block;
use crate::math::FULL_SCALE_VOLTS;

/// Voltage-controlled amplifier.
///
/// `out = in * cv / 5`. Five volts of control is unity gain; negative control
/// inverts. The result is not clamped.
#[derive(Clone, Copy, Debug, Default)]
pub struct Amplifier;

impl Amplifier {
    /// Renders one block.
    #[inline]
    pub fn process(&self, input: &Block, cv: &Block, out: &mut Block) {
        for ((o, &x), &c) in out.iter_mut().zip(input.iter()).zip(cv.iter()) {
            *o = x * (c / FULL_SCALE_VOLTS);
        }
    }
}
