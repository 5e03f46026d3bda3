//! Equal-power panner.

use core::f32::consts::FRAC_PI_4;

use libm::{cosf, sinf};

use crate::buffer::Block;
use crate::math::FULL_SCALE_VOLTS;
use crate::params::Params;

/// Mono to stereo equal-power panner.
///
/// ```text
/// p     = clamp(bias + pan_in / 5, -1, 1)
/// angle = (p + 1) * π/4
/// L     = in * cos(angle)
/// R     = in * sin(angle)
/// ```
#[derive(Clone, Debug)]
pub struct Panner {
    bias: f32,
}

impl Panner {
    /// Creates a panner with the given bias, clamped to `[-1, 1]`.
    pub fn new(bias: f32) -> Self {
        Self {
            bias: bias.clamp(-1.0, 1.0),
        }
    }

    /// Builds from `pan`.
    pub fn from_params(params: &Params) -> Self {
        Self::new(params.number_or("pan", 0.0))
    }

    /// Pan bias in `[-1, 1]`.
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Renders one block.
    pub fn process(&self, input: &Block, cv: &Block, left: &mut Block, right: &mut Block) {
        for (i, (&x, &c)) in input.iter().zip(cv.iter()).enumerate() {
            let pan = (self.bias + c / FULL_SCALE_VOLTS).clamp(-1.0, 1.0);
            let angle = (pan + 1.0) * FRAC_PI_4;
            left[i] = x * cosf(angle);
            right[i] = x * sinf(angle);
        }
    }
}
