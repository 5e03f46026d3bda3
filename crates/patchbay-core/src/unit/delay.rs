//! Modulated feedback delay.
//!
//! A circular buffer sized for two seconds at the sample rate the unit was
//! built with. Delay time, feedback and mix are recomputed every sample from
//! the base parameter plus CV:
//!
//! | Control | Value | Range |
//! |---------|-------|-------|
//! | time | `delay_time + time_in / 5 * 2` s | `[0.01, 2]` |
//! | feedback | `feedback + feedback_in / 5` | `[0, 0.95]` |
//! | mix | `mix + mix_in / 5` | `[0, 1]` |
//!
//! A non-finite control falls back to its base parameter for that sample. A
//! non-finite input sample is treated as silence and a non-finite write-back
//! stores 0, so one bad sample never lodges in the line.

use libm::{floorf, roundf};

use crate::buffer::Block;
use crate::math::FULL_SCALE_VOLTS;
use crate::params::Params;

/// Longest delay in seconds, also the line length.
const MAX_SECONDS: f32 = 2.0;
/// Shortest delay in seconds.
const MIN_SECONDS: f32 = 0.01;
/// Highest feedback amount.
const MAX_FEEDBACK: f32 = 0.95;

/// Modulated feedback delay.
#[derive(Clone, Debug)]
pub struct Delay {
    line: Vec<f32>,
    write: usize,
    delay_time: f32,
    feedback: f32,
    mix: f32,
}

impl Delay {
    /// Default delay time in seconds.
    pub const DEFAULT_TIME: f32 = 0.25;
    /// Default feedback amount.
    pub const DEFAULT_FEEDBACK: f32 = 0.35;
    /// Default dry/wet mix.
    pub const DEFAULT_MIX: f32 = 0.4;

    /// Creates a delay with a silent line of `max(1, floor(2 * sample_rate))` samples.
    pub fn new(delay_time: f32, feedback: f32, mix: f32, sample_rate: f32) -> Self {
        let len = (floorf(sample_rate * MAX_SECONDS) as usize).max(1);
        Self {
            line: vec![0.0; len],
            write: 0,
            delay_time,
            feedback,
            mix,
        }
    }

    /// Builds from `delayTime`, `feedback` and `mix`.
    pub fn from_params(params: &Params, sample_rate: f32) -> Self {
        Self::new(
            params.number_or("delayTime", Self::DEFAULT_TIME),
            params.number_or("feedback", Self::DEFAULT_FEEDBACK),
            params.number_or("mix", Self::DEFAULT_MIX),
            sample_rate,
        )
    }

    /// Line length in samples.
    pub fn line_len(&self) -> usize {
        self.line.len()
    }

    /// Renders one block.
    pub fn process(
        &mut self,
        input: &Block,
        time: &Block,
        feedback: &Block,
        mix: &Block,
        out: &mut Block,
        sample_rate: f32,
    ) {
        let len = self.line.len();
        let longest = len.saturating_sub(1).max(1);

        for i in 0..out.len() {
            let seconds = control(self.delay_time, time[i] / FULL_SCALE_VOLTS * 2.0)
                .clamp(MIN_SECONDS, MAX_SECONDS);
            let fb =
                control(self.feedback, feedback[i] / FULL_SCALE_VOLTS).clamp(0.0, MAX_FEEDBACK);
            let wet = control(self.mix, mix[i] / FULL_SCALE_VOLTS).clamp(0.0, 1.0);

            let delay = (roundf(seconds * sample_rate) as usize).clamp(1, longest);
            let read = (self.write + len - delay % len) % len;

            let dry = if input[i].is_finite() { input[i] } else { 0.0 };
            let delayed = self.line[read];
            out[i] = dry * (1.0 - wet) + delayed * wet;
            let next = dry + delayed * fb;
            self.line[self.write] = if next.is_finite() { next } else { 0.0 };
            self.write = (self.write + 1) % len;
        }
    }
}

/// `base + offset`, or `base` alone when the sum is not finite.
#[inline]
fn control(base: f32, offset: f32) -> f32 {
    let value = base + offset;
    if value.is_finite() { value } else { base }
}
