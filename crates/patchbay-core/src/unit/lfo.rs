//! Low-frequency oscillator.

use crate::buffer::Block;
use crate::math::{FULL_SCALE_VOLTS, volts_to_hz, wrap_phase};
use crate::params::Params;

use super::Waveform;

/// Low-frequency oscillator.
///
/// Same phase accumulator as the [`Oscillator`](super::Oscillator) without FM.
/// The `rate` input is added to the pitch in volts before the exponential
/// mapping, so +1 V on `rate` doubles the speed. The frequency never drops
/// below [`Lfo::MIN_FREQ`].
#[derive(Clone, Debug)]
pub struct Lfo {
    phase: f32,
    pitch: f32,
    waveform: Waveform,
}

impl Lfo {
    /// Default pitch in volts (about 1 Hz).
    pub const DEFAULT_PITCH: f32 = -5.0;
    /// Lowest frequency in Hz.
    pub const MIN_FREQ: f32 = 0.001;

    /// Creates an LFO at phase 0.
    pub fn new(pitch: f32, waveform: Waveform) -> Self {
        Self {
            phase: 0.0,
            pitch,
            waveform,
        }
    }

    /// Builds from `freq` and `shape`.
    pub fn from_params(params: &Params) -> Self {
        Self::new(
            params.number_or("freq", Self::DEFAULT_PITCH),
            Waveform::from_params(params, None, Waveform::Sine),
        )
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Selected waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Renders one block.
    pub fn process(&mut self, rate: &Block, out: &mut Block, sample_rate: f32) {
        for (o, &r) in out.iter_mut().zip(rate.iter()) {
            let freq = volts_to_hz(self.pitch + r).max(Self::MIN_FREQ);
            *o = self.waveform.sample(self.phase) * FULL_SCALE_VOLTS;
            self.phase = wrap_phase(self.phase + freq / sample_rate);
        }
    }
}
