//! Tape compression.
//!
//! The threshold drops as the amount rises (`0.7 - 0.4 · amount`), and the
//! gain is computed from the instantaneous level so peaks are caught on the
//! sample they arrive. The envelope follower only steers program-dependent
//! timing: large jumps between level and envelope shorten the attack and
//! lengthen the release.

use libm::expf;
use magtape_core::linear_to_db;

use crate::TapeConfig;

/// Shortest attack or release the coefficient calculation accepts.
const MIN_TIME_MS: f32 = 0.01;

/// Static gain for a sample at `level` (absolute value).
///
/// ```rust
/// use magtape::compression::static_gain;
///
/// assert_eq!(static_gain(0.2, 0.5, 4.0), 1.0);
/// // 0.9 is 0.4 over a 0.5 threshold; at 4:1 it lands at 0.6
/// assert!((static_gain(0.9, 0.5, 4.0) - 0.6 / 0.9).abs() < 1e-6);
/// ```
#[inline]
pub fn static_gain(level: f32, threshold: f32, ratio: f32) -> f32 {
    if level <= threshold || level <= 0.0 {
        return 1.0;
    }
    let ratio = ratio.max(1.0);
    (threshold + (level - threshold) / ratio) / level
}

/// Compression stage state.
#[derive(Debug, Clone)]
pub struct CompressionStage {
    sample_rate: f32,
    envelope: f32,
    gain_reduction_db: f32,
}

impl CompressionStage {
    /// Create the stage at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            envelope: 0.0,
            gain_reduction_db: 0.0,
        }
    }

    /// Compress one sample.
    ///
    /// With `compression_amount == 0` the input passes untouched and the
    /// envelope is left as it was.
    #[inline]
    pub fn process(&mut self, input: f32, cfg: &TapeConfig) -> f32 {
        if cfg.compression_amount <= 0.0 {
            return input;
        }

        let level = input.abs();
        let threshold = 0.7 - cfg.compression_amount * 0.4;
        let gain = static_gain(level, threshold, cfg.compression_ratio);

        self.update_envelope(level, cfg);
        self.gain_reduction_db = linear_to_db(gain);
        input * gain
    }

    fn update_envelope(&mut self, level: f32, cfg: &TapeConfig) {
        let mut attack_ms = cfg.attack_time_ms;
        let mut release_ms = cfg.release_time_ms;

        if cfg.program_dependent_timing {
            let transient = (level - self.envelope).abs().min(1.0);
            attack_ms *= 1.0 - transient * 0.8;
            release_ms *= 1.0 + transient * 0.5;
        }

        let time_ms = if level > self.envelope {
            attack_ms
        } else {
            release_ms
        };
        let coeff = expf(-1.0 / (time_ms.max(MIN_TIME_MS) * self.sample_rate * 0.001));
        self.envelope = level + (self.envelope - level) * coeff;
    }

    /// Follower level.
    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Gain applied to the most recent compressed sample, in dB (≤ 0).
    pub fn gain_reduction_db(&self) -> f32 {
        self.gain_reduction_db
    }

    /// Change the sample rate used for the time constants.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Clear state.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
        self.gain_reduction_db = 0.0;
    }
}
