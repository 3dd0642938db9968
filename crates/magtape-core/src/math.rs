//! Small numeric helpers shared by the tape stages.

use core::f32::consts::{LN_10, TAU};

use libm::{expf, logf};

/// Decibels to linear gain.
///
/// ```rust
/// use magtape_core::db_to_linear;
///
/// assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-4);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    expf(db * (LN_10 / 20.0))
}

/// Linear gain to decibels. Magnitudes below 1e-10 read as -200 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    logf(linear.max(1e-10)) * (20.0 / LN_10)
}

/// Radians per sample for an oscillator at `freq_hz`.
#[inline]
pub fn phase_increment(freq_hz: f32, sample_rate: f32) -> f32 {
    TAU * freq_hz / sample_rate
}

/// Milliseconds to (fractional) samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate * 0.001
}

/// Zero out magnitudes below 1e-20.
///
/// Applied to every recursive state so a decaying tail never reaches the
/// subnormal range.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// `dry * (1 - mix) + wet * mix`.
///
/// Both endpoints are exact: `mix == 0.0` yields `dry` bit for bit and
/// `mix == 1.0` yields `wet`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// `value`, or `fallback` when `value` is NaN or infinite.
#[inline]
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}
