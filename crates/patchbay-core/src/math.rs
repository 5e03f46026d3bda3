//! Numeric helpers shared by the unit kernels and the output mixer.
//!
//! # Voltage Convention
//!
//! Signals are expressed in a bipolar "volt" scale: ±5 V is nominal full
//! scale for audio and control alike. Pitch follows 1 V/octave around
//! [`REFERENCE_FREQ`] at 0 V.
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`volts_to_hz`] | 1 V/oct exponential pitch mapping |
//! | [`wrap_phase`] | Fold a phase accumulator back into `[0, 1)` |
//! | [`soft_limit`] | Final hyperbolic-tangent limiter, strictly inside (-1, 1) |

use libm::{exp2f, floorf, tanhf};

/// Frequency in Hz at 0 V (C1, MIDI note 24).
pub const REFERENCE_FREQ: f32 = 32.703;

/// Nominal full-scale amplitude in volts.
pub const FULL_SCALE_VOLTS: f32 = 5.0;

/// Largest magnitude [`soft_limit`] will emit.
///
/// `tanhf` rounds to exactly 1.0 for inputs beyond ~9, so the limiter pulls
/// its result back by one ULP to stay inside the open interval.
pub const LIMIT_CEILING: f32 = 1.0 - f32::EPSILON;

/// Converts a pitch in volts to a frequency in Hz (1 V/octave).
///
/// # Example
/// ```rust
/// use patchbay_core::math::{volts_to_hz, REFERENCE_FREQ};
///
/// assert!((volts_to_hz(0.0) - REFERENCE_FREQ).abs() < 1e-4);
/// assert!((volts_to_hz(1.0) - 2.0 * REFERENCE_FREQ).abs() < 1e-3);
/// ```
#[inline]
pub fn volts_to_hz(volts: f32) -> f32 {
    REFERENCE_FREQ * exp2f(volts)
}

/// Wraps a phase value into `[0, 1)`.
///
/// Works for negative phases and for increments larger than one cycle.
/// A non-finite phase restarts the cycle at 0.
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase - floorf(phase);
    if wrapped.is_finite() && wrapped < 1.0 {
        wrapped
    } else {
        0.0
    }
}

/// Hyperbolic-tangent soft limiter applied to the final stereo mix.
///
/// The result always lies strictly inside (-1, 1). NaN maps to silence.
#[inline]
pub fn soft_limit(x: f32) -> f32 {
    if x.is_nan() {
        return 0.0;
    }
    tanhf(x).clamp(-LIMIT_CEILING, LIMIT_CEILING)
}
