//! Processing units and their static port tables.
//!
//! A [`Unit`] is a closed enumeration over every supported kind. Each variant
//! carries its own state struct and is driven through one compute operation,
//! [`Unit::process`], once per block. The set of kinds is fixed at compile
//! time so that [`UnitKind`] can answer port-table lookups without a registry.
//!
//! | Kind | Inputs | Outputs |
//! |------|--------|---------|
//! | `VCO` | `pitch`, `fm` | `out` |
//! | `LFO` | `rate` | `out` |
//! | `VCA` | `in`, `cv` | `out` |
//! | `SLEW` | `in` | `out` |
//! | `PAN` | `in`, `pan` | `outL`, `outR` |
//! | `RECTIFIER` | `in` | `out` |
//! | `DELAY` | `in`, `time`, `feedback`, `mix` | `out` |
//! | `OUTPUT` | `in`, `inL`, `inR` | `out` |

mod amplifier;
mod delay;
mod lfo;
mod oscillator;
mod pan;
mod rectifier;
mod sink;
mod slew;

pub use amplifier::Amplifier;
pub use delay::Delay;
pub use lfo::Lfo;
pub use oscillator::{Oscillator, Waveform};
pub use pan::Panner;
pub use rectifier::Rectifier;
pub use sink::Sink;
pub use slew::Slew;

use core::str::FromStr;

use crate::buffer::Block;
use crate::params::Params;
use crate::port::InputPort;

/// Every supported unit kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitKind {
    /// Audio-rate oscillator with exponential pitch and linear FM.
    Vco,
    /// Low-frequency oscillator.
    Lfo,
    /// Voltage-controlled amplifier.
    Vca,
    /// Slew limiter / looping envelope.
    Slew,
    /// Equal-power panner.
    Pan,
    /// Full-wave rectifier.
    Rectifier,
    /// Modulated feedback delay.
    Delay,
    /// Final output (sink).
    Output,
}

/// Default value of a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamDefault {
    /// Numeric parameter.
    Number(f32),
    /// Named choice among a fixed set of options.
    Choice {
        /// Value used when the key is missing or unrecognised.
        default: &'static str,
        /// Accepted values.
        options: &'static [&'static str],
    },
}

impl core::fmt::Display for ParamDefault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Choice { default, .. } => write!(f, "{default}"),
        }
    }
}

/// Descriptor for one documented parameter key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    /// Key as written in the `params` map.
    pub key: &'static str,
    /// Default applied when the key is missing.
    pub default: ParamDefault,
    /// Unit label ("V", "s", "Hz/V", or empty).
    pub unit: &'static str,
    /// Short description.
    pub description: &'static str,
}

const fn number(
    key: &'static str,
    default: f32,
    unit: &'static str,
    description: &'static str,
) -> ParamSpec {
    ParamSpec {
        key,
        default: ParamDefault::Number(default),
        unit,
        description,
    }
}

const fn shape(default: &'static str) -> ParamSpec {
    ParamSpec {
        key: "shape",
        default: ParamDefault::Choice {
            default,
            options: Waveform::NAMES,
        },
        unit: "",
        description: "Waveform",
    }
}

const VCO_PARAMS: &[ParamSpec] = &[
    number("freq", 0.0, "V", "Base pitch (1 V/oct around 32.703 Hz)"),
    number(
        "fmSensitivity",
        Oscillator::DEFAULT_FM_SENSITIVITY,
        "Hz/V",
        "Linear FM depth",
    ),
    shape("saw"),
];
const LFO_PARAMS: &[ParamSpec] = &[
    number("freq", Lfo::DEFAULT_PITCH, "V", "Rate (1 V/oct, -5 V is about 1 Hz)"),
    shape("sine"),
];
const SLEW_PARAMS: &[ParamSpec] = &[
    number("riseTime", Slew::DEFAULT_TIME, "s", "Time for a full 0-10 V rise"),
    number("fallTime", Slew::DEFAULT_TIME, "s", "Time for a full 10-0 V fall"),
];
const PAN_PARAMS: &[ParamSpec] = &[number("pan", 0.0, "", "Pan bias, -1 left to 1 right")];
const DELAY_PARAMS: &[ParamSpec] = &[
    number("delayTime", Delay::DEFAULT_TIME, "s", "Delay time"),
    number("feedback", Delay::DEFAULT_FEEDBACK, "", "Feedback amount"),
    number("mix", Delay::DEFAULT_MIX, "", "Dry/wet mix"),
];

impl UnitKind {
    /// All kinds in catalogue order.
    pub const ALL: [Self; 8] = [
        Self::Vco,
        Self::Lfo,
        Self::Vca,
        Self::Slew,
        Self::Pan,
        Self::Rectifier,
        Self::Delay,
        Self::Output,
    ];

    /// Canonical (upper-case) kind tag.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vco => "VCO",
            Self::Lfo => "LFO",
            Self::Vca => "VCA",
            Self::Slew => "SLEW",
            Self::Pan => "PAN",
            Self::Rectifier => "RECTIFIER",
            Self::Delay => "DELAY",
            Self::Output => "OUTPUT",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Vco => "Oscillator with 1 V/oct pitch and linear FM",
            Self::Lfo => "Low-frequency oscillator",
            Self::Vca => "Amplifier, 5 V of cv is unity gain",
            Self::Slew => "Slew limiter, loops 0-10 V when unpatched",
            Self::Pan => "Equal-power mono to stereo panner",
            Self::Rectifier => "Absolute value",
            Self::Delay => "Delay line up to 2 s with feedback",
            Self::Output => "Final stereo output",
        }
    }

    /// Input port names in declaration order.
    pub fn input_ports(self) -> &'static [&'static str] {
        match self {
            Self::Vco => &["pitch", "fm"],
            Self::Lfo => &["rate"],
            Self::Vca => &["in", "cv"],
            Self::Slew | Self::Rectifier => &["in"],
            Self::Pan => &["in", "pan"],
            Self::Delay => &["in", "time", "feedback", "mix"],
            Self::Output => &["in", "inL", "inR"],
        }
    }

    /// Output port names in declaration order.
    pub fn output_ports(self) -> &'static [&'static str] {
        match self {
            Self::Pan => &["outL", "outR"],
            _ => &["out"],
        }
    }

    /// Documented parameters.
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Self::Vco => VCO_PARAMS,
            Self::Lfo => LFO_PARAMS,
            Self::Slew => SLEW_PARAMS,
            Self::Pan => PAN_PARAMS,
            Self::Delay => DELAY_PARAMS,
            Self::Vca | Self::Rectifier | Self::Output => &[],
        }
    }

    /// Position of an input port, if the kind has it.
    pub fn input_index(self, port: &str) -> Option<usize> {
        self.input_ports().iter().position(|&p| p == port)
    }

    /// Position of an output port, if the kind has it.
    pub fn output_index(self, port: &str) -> Option<usize> {
        self.output_ports().iter().position(|&p| p == port)
    }

    /// Returns true if `key` is a documented parameter (including aliases).
    pub fn knows_param(self, key: &str) -> bool {
        self.params().iter().any(|spec| spec.key == key)
            || (self == Self::Vco && key == Oscillator::LEGACY_SHAPE_KEY)
    }

    /// Returns true for the sink kind.
    pub fn is_sink(self) -> bool {
        self == Self::Output
    }
}

impl core::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a kind tag does not name a supported unit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown unit kind '{0}'")]
pub struct ParseKindError(pub String);

impl FromStr for UnitKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// A runtime unit: kind tag plus per-kind state.
#[derive(Clone, Debug)]
pub enum Unit {
    /// See [`Oscillator`].
    Vco(Oscillator),
    /// See [`Lfo`].
    Lfo(Lfo),
    /// See [`Amplifier`].
    Vca(Amplifier),
    /// See [`Slew`].
    Slew(Slew),
    /// See [`Panner`].
    Pan(Panner),
    /// See [`Rectifier`].
    Rectifier(Rectifier),
    /// See [`Delay`].
    Delay(Delay),
    /// See [`Sink`].
    Output(Sink),
}

impl Unit {
    /// Builds a unit of `kind` from its parameter map.
    ///
    /// The sample rate is needed up front only by units that size internal
    /// storage (the delay line).
    pub fn new(kind: UnitKind, params: &Params, sample_rate: f32) -> Self {
        match kind {
            UnitKind::Vco => Self::Vco(Oscillator::from_params(params)),
            UnitKind::Lfo => Self::Lfo(Lfo::from_params(params)),
            UnitKind::Vca => Self::Vca(Amplifier),
            UnitKind::Slew => Self::Slew(Slew::from_params(params)),
            UnitKind::Pan => Self::Pan(Panner::from_params(params)),
            UnitKind::Rectifier => Self::Rectifier(Rectifier),
            UnitKind::Delay => Self::Delay(Delay::from_params(params, sample_rate)),
            UnitKind::Output => Self::Output(Sink),
        }
    }

    /// Returns the unit's kind.
    pub fn kind(&self) -> UnitKind {
        match self {
            Self::Vco(_) => UnitKind::Vco,
            Self::Lfo(_) => UnitKind::Lfo,
            Self::Vca(_) => UnitKind::Vca,
            Self::Slew(_) => UnitKind::Slew,
            Self::Pan(_) => UnitKind::Pan,
            Self::Rectifier(_) => UnitKind::Rectifier,
            Self::Delay(_) => UnitKind::Delay,
            Self::Output(_) => UnitKind::Output,
        }
    }

    /// Computes one block.
    ///
    /// `inputs` and `outputs` are laid out in the kind's port-table order
    /// ([`UnitKind::input_ports`], [`UnitKind::output_ports`]); inputs must
    /// already be aggregated. A mismatched layout leaves the outputs untouched.
    pub fn process(&mut self, inputs: &[InputPort], outputs: &mut [Block], sample_rate: f32) {
        match self {
            Self::Vco(osc) => {
                let ([pitch, fm], [out]) = (inputs, outputs) else {
                    return;
                };
                osc.process(pitch.block(), fm.block(), out, sample_rate);
            }
            Self::Lfo(lfo) => {
                let ([rate], [out]) = (inputs, outputs) else {
                    return;
                };
                lfo.process(rate.block(), out, sample_rate);
            }
            Self::Vca(vca) => {
                let ([input, cv], [out]) = (inputs, outputs) else {
                    return;
                };
                vca.process(input.block(), cv.block(), out);
            }
            Self::Slew(slew) => {
                let ([input], [out]) = (inputs, outputs) else {
                    return;
                };
                let target = input.is_connected().then(|| input.block());
                slew.process(target, out, sample_rate);
            }
            Self::Pan(pan) => {
                let ([input, cv], [left, right]) = (inputs, outputs) else {
                    return;
                };
                pan.process(input.block(), cv.block(), left, right);
            }
            Self::Rectifier(rect) => {
                let ([input], [out]) = (inputs, outputs) else {
                    return;
                };
                rect.process(input.block(), out);
            }
            Self::Delay(delay) => {
                let ([input, time, feedback, mix], [out]) = (inputs, outputs) else {
                    return;
                };
                delay.process(
                    input.block(),
                    time.block(),
                    feedback.block(),
                    mix.block(),
                    out,
                    sample_rate,
                );
            }
            Self::Output(sink) => {
                let ([mono, _, _], [out]) = (inputs, outputs) else {
                    return;
                };
                sink.process(mono.block(), out);
            }
        }
    }
}
