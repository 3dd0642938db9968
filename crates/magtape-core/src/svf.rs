//! Trapezoidal state-variable filter.
//!
//! Two integrators discretised with the trapezoidal rule (Zavalishin, "The
//! Art of VA Filter Design", ch. 3). The structure keeps its state meaningful
//! when the cutoff moves, so the head-rolloff filter can be retuned whenever
//! a new tape configuration arrives without clicks.
//!
//! Per sample, with `g = tan(pi * fc / fs)` and damping `k = 1 / Q`:
//!
//! ```text
//! v1 = (g * (x - s2) + s1) / (1 + g * (g + k))    // bandpass
//! v2 = s2 + g * v1                                // lowpass
//! s1 = 2 * v1 - s1
//! s2 = 2 * v2 - s2
//! ```

use core::f32::consts::PI;

use libm::tanf;

use crate::{Effect, flush_denormal};

const MIN_CUTOFF_HZ: f32 = 20.0;
const MIN_Q: f32 = 0.5;
const MAX_Q: f32 = 20.0;

/// Which response [`StateVariableFilter`] returns from `process`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SvfOutput {
    /// Below the cutoff.
    #[default]
    Lowpass,
    /// Above the cutoff.
    Highpass,
    /// Around the cutoff.
    Bandpass,
    /// Everything except the cutoff.
    Notch,
}

/// Map a resonance amount in `[0, 1)` to a Q.
///
/// Damping falls linearly from 2 at zero resonance, so `r = 0` gives a
/// critically damped Q of 0.5 and `r = 0.5` gives Q = 1. The amount is
/// clamped to 0.975 to keep the filter well away from self-oscillation.
///
/// ```rust
/// use magtape_core::resonance_to_q;
///
/// assert!((resonance_to_q(0.5) - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn resonance_to_q(resonance: f32) -> f32 {
    1.0 / (2.0 - 2.0 * resonance.clamp(0.0, 0.975)).max(0.05)
}

/// 12 dB/oct filter with a selectable response.
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    s1: f32,
    s2: f32,
    g: f32,
    k: f32,
    sample_rate: f32,
    cutoff: f32,
    mode: SvfOutput,
}

impl StateVariableFilter {
    /// Build a filter at `sample_rate` tuned to `cutoff` Hz and `q`.
    ///
    /// Q is clamped to `[0.5, 20]` and the cutoff to `[20, 0.49 * fs]`.
    pub fn tuned(sample_rate: f32, cutoff: f32, q: f32, mode: SvfOutput) -> Self {
        let mut svf = Self {
            s1: 0.0,
            s2: 0.0,
            g: 0.0,
            k: 1.0 / q.clamp(MIN_Q, MAX_Q),
            sample_rate,
            cutoff,
            mode,
        };
        svf.retune();
        svf
    }

    /// Move the cutoff, keeping the integrator state.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff;
        self.retune();
    }

    /// Cutoff in Hz after clamping.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    fn retune(&mut self) {
        let max = (self.sample_rate * 0.49).max(MIN_CUTOFF_HZ);
        self.cutoff = self.cutoff.clamp(MIN_CUTOFF_HZ, max);
        self.g = tanf(PI * self.cutoff / self.sample_rate);
    }
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::tuned(48000.0, 1000.0, core::f32::consts::FRAC_1_SQRT_2, SvfOutput::Lowpass)
    }
}

impl Effect for StateVariableFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let band = (self.g * (input - self.s2) + self.s1) / (1.0 + self.g * (self.g + self.k));
        let low = self.s2 + self.g * band;
        self.s1 = flush_denormal(2.0 * band - self.s1);
        self.s2 = flush_denormal(2.0 * low - self.s2);

        match self.mode {
            SvfOutput::Lowpass => low,
            SvfOutput::Bandpass => band,
            SvfOutput::Highpass => input - self.k * band - low,
            SvfOutput::Notch => input - self.k * band,
        }
    }

    fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.retune();
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, cutoff = self.cutoff, "svf retuned");
    }
}
