//! Frequency-response coloration.
//!
//! Three cascaded state-variable filters: a 100 Hz low-pass blended in for
//! low-end warmth, the head rolloff low-pass (8 kHz down to 5 kHz), and a
//! 2 kHz presence band added back on top.

use magtape_core::{Effect, StateVariableFilter, SvfOutput, resonance_to_q};

use crate::TapeConfig;

const WARMTH_HZ: f32 = 100.0;
const PRESENCE_HZ: f32 = 2000.0;
const HEAD_MAX_HZ: f32 = 8000.0;
const HEAD_ROLLOFF_SPAN_HZ: f32 = 3000.0;
const DEFAULT_RESONANCE: f32 = 0.1;
const PRESENCE_RESONANCE: f32 = 0.3;

/// Head rolloff corner for a given `high_freq_rolloff` amount.
#[inline]
pub fn head_cutoff(rolloff: f32) -> f32 {
    HEAD_MAX_HZ - rolloff * HEAD_ROLLOFF_SPAN_HZ
}

/// Frequency-response stage state.
#[derive(Debug, Clone)]
pub struct FrequencyStage {
    warmth: StateVariableFilter,
    head: StateVariableFilter,
    presence: StateVariableFilter,
}

impl FrequencyStage {
    /// Create the stage at `sample_rate`, tuned for `cfg`.
    pub fn new(sample_rate: f32, cfg: &TapeConfig) -> Self {
        let default_q = resonance_to_q(DEFAULT_RESONANCE);
        Self {
            warmth: StateVariableFilter::tuned(
                sample_rate,
                WARMTH_HZ,
                default_q,
                SvfOutput::Lowpass,
            ),
            head: StateVariableFilter::tuned(
                sample_rate,
                head_cutoff(cfg.high_freq_rolloff),
                default_q,
                SvfOutput::Lowpass,
            ),
            presence: StateVariableFilter::tuned(
                sample_rate,
                PRESENCE_HZ,
                resonance_to_q(PRESENCE_RESONANCE),
                SvfOutput::Bandpass,
            ),
        }
    }

    /// Re-tune for a new configuration. Filter memories are kept.
    pub fn configure(&mut self, cfg: &TapeConfig) {
        self.warmth.set_cutoff(WARMTH_HZ);
        self.head.set_cutoff(head_cutoff(cfg.high_freq_rolloff));
        self.presence.set_cutoff(PRESENCE_HZ);
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32, cfg: &TapeConfig) -> f32 {
        let low = self.warmth.process(input);
        let warmed = input + (low - input) * cfg.low_freq_boost;
        let rolled = self.head.process(warmed);
        let presence = self.presence.process(rolled);
        rolled + presence * cfg.mid_freq_coloration
    }

    /// Recompute every coefficient for a new sample rate.
    ///
    /// Corners are re-applied from `cfg` so that a round trip through a low
    /// rate (which clamps them below Nyquist) restores the intended tuning.
    pub fn set_sample_rate(&mut self, sample_rate: f32, cfg: &TapeConfig) {
        self.warmth.set_sample_rate(sample_rate);
        self.head.set_sample_rate(sample_rate);
        self.presence.set_sample_rate(sample_rate);
        self.configure(cfg);
    }

    /// Current head rolloff corner in Hz.
    pub fn head_cutoff(&self) -> f32 {
        self.head.cutoff()
    }

    /// Clear filter memories.
    pub fn reset(&mut self) {
        self.warmth.reset();
        self.head.reset();
        self.presence.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    fn tone_peak(stage: &mut FrequencyStage, cfg: &TapeConfig, freq: f32) -> f32 {
        let sr = 48000.0;
        let mut peak = 0.0f32;
        for i in 0..9600 {
            let y = stage.process(libm::sinf(TAU * freq * i as f32 / sr), cfg);
            if i >= 4800 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn head_cutoff_tracks_rolloff() {
        assert_eq!(head_cutoff(0.0), 8000.0);
        assert_eq!(head_cutoff(1.0), 5000.0);
        let mut stage = FrequencyStage::new(48000.0, &TapeConfig::default());
        assert!((stage.head_cutoff() - 7100.0).abs() < 1e-2);
        stage.configure(&TapeConfig {
            high_freq_rolloff: 1.0,
            ..TapeConfig::default()
        });
        assert_eq!(stage.head_cutoff(), 5000.0);
    }

    #[test]
    fn neutral_settings_pass_midrange() {
        let cfg = TapeConfig::clean();
        let mut stage = FrequencyStage::new(48000.0, &cfg);
        let peak = tone_peak(&mut stage, &cfg, 1000.0);
        assert!((peak - 1.0).abs() < 0.1, "peak = {peak}");
    }

    #[test]
    fn head_rolloff_attenuates_highs() {
        let cfg = TapeConfig {
            high_freq_rolloff: 1.0,
            ..TapeConfig::clean()
        };
        let mut stage = FrequencyStage::new(48000.0, &cfg);
        let peak = tone_peak(&mut stage, &cfg, 15000.0);
        assert!(peak < 0.25, "peak = {peak}");
    }

    #[test]
    fn presence_lifts_two_kilohertz() {
        let flat = TapeConfig::clean();
        let lifted = TapeConfig {
            mid_freq_coloration: 1.0,
            ..TapeConfig::clean()
        };
        let mut a = FrequencyStage::new(48000.0, &flat);
        let mut b = FrequencyStage::new(48000.0, &lifted);
        let pa = tone_peak(&mut a, &flat, 2000.0);
        let pb = tone_peak(&mut b, &lifted, 2000.0);
        assert!(pb > pa * 1.2, "flat={pa}, lifted={pb}");
    }

    #[test]
    fn sample_rate_change_stays_stable() {
        let cfg = TapeConfig::default();
        let mut stage = FrequencyStage::new(48000.0, &cfg);
        stage.set_sample_rate(8000.0, &cfg);
        assert!(stage.head_cutoff() <= 8000.0 * 0.49);
        for i in 0..4000 {
            let x = if i % 50 < 25 { 0.8 } else { -0.8 };
            assert!(stage.process(x, &cfg).is_finite());
        }
        stage.set_sample_rate(48000.0, &cfg);
        assert!((stage.head_cutoff() - 7100.0).abs() < 1e-2);
    }
}
