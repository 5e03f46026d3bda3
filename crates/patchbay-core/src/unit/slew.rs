//! Slew limiter and looping envelope.
//!
//! # Modes
//!
//! - **Tracking** (input patched): the value chases the input at no more
//!   than `10 / rise_time` V/s upward and `10 / fall_time` V/s downward,
//!   never overshooting the target.
//! - **Free-run** (input unpatched): the value ramps 0 → 10 → 0 forever at
//!   the same rates, turning around at the bounds.
//!
//! The state is kept in `f64` so a long free-run ramp lands on the bound at
//! the expected sample. The output is always within `[0, 10]`; a non-finite
//! value resets to 0.

use crate::buffer::Block;
use crate::params::Params;

/// Full excursion in volts.
const RANGE: f64 = 10.0;

/// Slew limiter / looping envelope.
#[derive(Clone, Debug)]
pub struct Slew {
    value: f64,
    rising: bool,
    rise_time: f32,
    fall_time: f32,
}

impl Slew {
    /// Default rise and fall time in seconds.
    pub const DEFAULT_TIME: f32 = 0.5;
    /// Shortest accepted rise or fall time in seconds.
    pub const MIN_TIME: f32 = 0.001;

    /// Creates a slew at 0 V, rising. Times are floored at [`Self::MIN_TIME`].
    pub fn new(rise_time: f32, fall_time: f32) -> Self {
        Self {
            value: 0.0,
            rising: true,
            rise_time: rise_time.max(Self::MIN_TIME),
            fall_time: fall_time.max(Self::MIN_TIME),
        }
    }

    /// Builds from `riseTime` and `fallTime`.
    pub fn from_params(params: &Params) -> Self {
        Self::new(
            params.number_or("riseTime", Self::DEFAULT_TIME),
            params.number_or("fallTime", Self::DEFAULT_TIME),
        )
    }

    /// Current value in volts.
    pub fn value(&self) -> f32 {
        self.value as f32
    }

    /// Free-run direction.
    pub fn is_rising(&self) -> bool {
        self.rising
    }

    /// Rise time in seconds.
    pub fn rise_time(&self) -> f32 {
        self.rise_time
    }

    /// Fall time in seconds.
    pub fn fall_time(&self) -> f32 {
        self.fall_time
    }

    /// Renders one block.
    ///
    /// `target` is `Some` when the input port has at least one source.
    pub fn process(&mut self, target: Option<&Block>, out: &mut Block, sample_rate: f32) {
        let sample_rate = f64::from(sample_rate);
        let rise = RANGE / f64::from(self.rise_time) / sample_rate;
        let fall = RANGE / f64::from(self.fall_time) / sample_rate;

        for (i, o) in out.iter_mut().enumerate() {
            match target {
                Some(input) => {
                    let target = f64::from(input[i]);
                    if target > self.value {
                        self.value = (self.value + rise).min(target);
                    } else if target < self.value {
                        self.value = (self.value - fall).max(target);
                    }
                }
                None if self.rising => {
                    self.value += rise;
                    if self.value >= RANGE {
                        self.value = RANGE;
                        self.rising = false;
                    }
                }
                None => {
                    self.value -= fall;
                    if self.value <= 0.0 {
                        self.value = 0.0;
                        self.rising = true;
                    }
                }
            }

            self.value = if self.value.is_finite() {
                self.value.clamp(0.0, RANGE)
            } else {
                0.0
            };
            *o = self.value as f32;
        }
    }
}
