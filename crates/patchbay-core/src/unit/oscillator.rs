//! Audio-rate oscillator with exponential pitch and linear FM.
//!
//! Naive (non-band-limited) waveforms on a phase accumulator. The sample is
//! emitted from the current phase before the phase advances, so a freshly
//! built oscillator starts every waveform at phase 0.

use core::f32::consts::TAU;

use libm::sinf;

use crate::buffer::Block;
use crate::math::{FULL_SCALE_VOLTS, volts_to_hz, wrap_phase};
use crate::params::Params;

/// Oscillator waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// Sine.
    Sine,
    /// Triangle, starting at the negative peak.
    Triangle,
    /// Rising sawtooth.
    #[default]
    Saw,
    /// Square, low for the first half-cycle.
    Square,
}

impl Waveform {
    /// Accepted names, canonical spelling first.
    pub const NAMES: &'static [&'static str] = &["sine", "tri", "saw", "square"];

    /// Parses a waveform name. `"triangle"` is accepted as an alias of `"tri"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sine" | "sin" => Some(Self::Sine),
            "tri" | "triangle" => Some(Self::Triangle),
            "saw" | "sawtooth" => Some(Self::Saw),
            "square" | "sqr" => Some(Self::Square),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Triangle => "tri",
            Self::Saw => "saw",
            Self::Square => "square",
        }
    }

    /// Unit-amplitude sample at `phase` in `[0, 1)`.
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Self::Sine => sinf(TAU * phase),
            Self::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
            Self::Saw => 2.0 * phase - 1.0,
            Self::Square => {
                if phase < 0.5 {
                    -1.0
                } else {
                    1.0
                }
            }
        }
    }

    /// Reads the `shape` key (or `legacy_key`) and falls back to `default`.
    pub(crate) fn from_params(params: &Params, legacy_key: Option<&str>, default: Self) -> Self {
        params
            .text("shape")
            .or_else(|| legacy_key.and_then(|key| params.text(key)))
            .and_then(Self::from_name)
            .unwrap_or(default)
    }
}

/// Voltage-controlled oscillator.
///
/// Per sample:
///
/// ```text
/// f = 32.703 * 2^(pitch + pitch_in) + fm_in * fm_sensitivity
/// f = clamp(f, 0.1, sample_rate / 2)
/// ```
///
/// Output is the selected waveform scaled to ±5 V.
#[derive(Clone, Debug)]
pub struct Oscillator {
    phase: f32,
    pitch: f32,
    fm_sensitivity: f32,
    waveform: Waveform,
}

impl Oscillator {
    /// Default linear FM depth in Hz per volt.
    pub const DEFAULT_FM_SENSITIVITY: f32 = 50.0;
    /// Lowest frequency the oscillator runs at.
    pub const MIN_FREQ: f32 = 0.1;
    /// Older documents store the waveform under this key.
    pub const LEGACY_SHAPE_KEY: &'static str = "vcoShape";

    /// Creates an oscillator at phase 0.
    pub fn new(pitch: f32, fm_sensitivity: f32, waveform: Waveform) -> Self {
        Self {
            phase: 0.0,
            pitch,
            fm_sensitivity,
            waveform,
        }
    }

    /// Builds from `freq`, `fmSensitivity` and `shape`.
    pub fn from_params(params: &Params) -> Self {
        Self::new(
            params.number_or("freq", 0.0),
            params.number_or("fmSensitivity", Self::DEFAULT_FM_SENSITIVITY),
            Waveform::from_params(params, Some(Self::LEGACY_SHAPE_KEY), Waveform::Saw),
        )
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Base pitch in volts.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Selected waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Renders one block.
    pub fn process(&mut self, pitch: &Block, fm: &Block, out: &mut Block, sample_rate: f32) {
        let nyquist = sample_rate * 0.5;
        for ((o, &p), &m) in out.iter_mut().zip(pitch.iter()).zip(fm.iter()) {
            let freq = volts_to_hz(self.pitch + p) + m * self.fm_sensitivity;
            let freq = freq.max(Self::MIN_FREQ).min(nyquist);
            *o = self.waveform.sample(self.phase) * FULL_SCALE_VOLTS;
            self.phase = wrap_phase(self.phase + freq / sample_rate);
        }
    }
}
