//! First-order DC blocker.
//!
//! `y[n] = x[n] - x[n-1] + r * y[n-1]`, a zero at DC and a pole just inside
//! the unit circle. The pole radius follows from the corner frequency as
//! `r = 1 - 2*pi*fc/fs`, clamped to `[0.9, 0.9999]`. The tape chain runs it
//! last, at 38 Hz, to strip the offset the bias stage leaves behind.

use core::f32::consts::TAU;

use crate::flush_denormal;

/// Removes DC offset while passing the audible band.
///
/// ```rust
/// use magtape_core::DcBlocker;
///
/// let mut dc = DcBlocker::with_cutoff(48000.0, 38.0);
/// let mut y = 0.0;
/// for _ in 0..48000 {
///     y = dc.process(0.25);
/// }
/// assert!(y.abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct DcBlocker {
    cutoff_hz: f32,
    pole: f32,
    last_in: f32,
    last_out: f32,
}

impl DcBlocker {
    /// Build a blocker with its -3 dB corner at `cutoff_hz`.
    pub fn with_cutoff(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            pole: pole_radius(cutoff_hz, sample_rate),
            last_in: 0.0,
            last_out: 0.0,
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let out = flush_denormal(input - self.last_in + self.pole * self.last_out);
        self.last_in = input;
        self.last_out = out;
        out
    }

    /// Clear the filter memory.
    pub fn reset(&mut self) {
        self.last_in = 0.0;
        self.last_out = 0.0;
    }

    /// Re-derive the pole so the corner stays put at the new rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.pole = pole_radius(self.cutoff_hz, sample_rate);
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, pole = self.pole, "dc blocker retuned");
    }

    /// Current pole radius.
    pub fn pole(&self) -> f32 {
        self.pole
    }
}

fn pole_radius(cutoff_hz: f32, sample_rate: f32) -> f32 {
    (1.0 - TAU * cutoff_hz / sample_rate).clamp(0.9, 0.9999)
}
