//! One channel of tape state and the full per-sample chain.

use magtape_core::{DcBlocker, EnvelopeFollower, finite_or, wet_dry_mix};

use crate::artifacts::ArtifactStage;
use crate::compression::CompressionStage;
use crate::frequency::FrequencyStage;
use crate::harmonics::HarmonicStage;
use crate::modulation::ModulationStage;
use crate::saturation::SaturationStage;
use crate::{TapeConfig, TapeTables};

/// DC blocker corner; gives R ≈ 0.995 at 48 kHz.
pub const DC_CUTOFF_HZ: f32 = 38.0;

const BIAS_SCALE: f32 = 0.1;
const METER_ATTACK_MS: f32 = 0.1;
const METER_RELEASE_MS: f32 = 300.0;

/// Signal-path state for a single channel.
///
/// Stereo processing runs two of these against the same configuration, so
/// nothing (delay line, envelope, noise) leaks between channels.
#[derive(Debug, Clone)]
pub struct TapeChannel {
    saturation: SaturationStage,
    compression: CompressionStage,
    frequency: FrequencyStage,
    harmonics: HarmonicStage,
    modulation: ModulationStage,
    artifacts: ArtifactStage,
    dc_blocker: DcBlocker,
    output_meter: EnvelopeFollower,
}

impl TapeChannel {
    /// Create a channel at `sample_rate`, tuned for `cfg`, whose noise
    /// generator starts from `seed`.
    pub fn new(sample_rate: f32, cfg: &TapeConfig, seed: u32) -> Self {
        Self {
            saturation: SaturationStage::new(sample_rate),
            compression: CompressionStage::new(sample_rate),
            frequency: FrequencyStage::new(sample_rate, cfg),
            harmonics: HarmonicStage::new(),
            modulation: ModulationStage::new(sample_rate),
            artifacts: ArtifactStage::new(sample_rate, seed),
            dc_blocker: DcBlocker::with_cutoff(sample_rate, DC_CUTOFF_HZ),
            output_meter: EnvelopeFollower::with_times(
                sample_rate,
                METER_ATTACK_MS,
                METER_RELEASE_MS,
            ),
        }
    }

    /// Run the full chain on one sample.
    ///
    /// Order: bias, saturation, compression, frequency response, harmonics,
    /// wow/flutter, artifacts, DC blocker, wet/dry mix. A non-finite input is
    /// processed as silence so it cannot poison filter state; the dry path
    /// still carries it.
    #[inline]
    pub fn process(&mut self, input: f32, cfg: &TapeConfig, tables: &TapeTables) -> f32 {
        let x = finite_or(input, 0.0);

        let mut y = x + cfg.bias_level * BIAS_SCALE;
        y = self.saturation.process(y, cfg, tables);
        y = self.compression.process(y, cfg);
        y = self.frequency.process(y, cfg);
        y = self.harmonics.process(y, x, cfg);
        y = self.modulation.process(y, cfg);
        y = self.artifacts.process(y, cfg);
        y = self.dc_blocker.process(y);

        let out = wet_dry_mix(input, y, cfg.wet_dry_mix);
        self.output_meter.process(finite_or(out, 0.0));
        out
    }

    /// Apply a new configuration's coefficients.
    pub fn configure(&mut self, cfg: &TapeConfig) {
        self.frequency.configure(cfg);
    }

    /// Recompute every rate-dependent coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32, cfg: &TapeConfig) {
        self.saturation.set_sample_rate(sample_rate);
        self.compression.set_sample_rate(sample_rate);
        self.frequency.set_sample_rate(sample_rate, cfg);
        self.modulation.set_sample_rate(sample_rate);
        self.artifacts.set_sample_rate(sample_rate);
        self.dc_blocker.set_sample_rate(sample_rate);
        self.output_meter.set_sample_rate(sample_rate);
    }

    /// Return every stage to its initial state.
    pub fn reset(&mut self) {
        self.saturation.reset();
        self.compression.reset();
        self.frequency.reset();
        self.harmonics.reset();
        self.modulation.reset();
        self.artifacts.reset();
        self.dc_blocker.reset();
        self.output_meter.reset();
    }

    // ── Meters ──

    /// |saturation output − saturation input| for the latest sample.
    pub fn saturation_activity(&self) -> f32 {
        self.saturation.activity()
    }

    /// Latest compressor gain reduction in dB.
    pub fn gain_reduction_db(&self) -> f32 {
        self.compression.gain_reduction_db()
    }

    /// Peak-follower level of the output.
    pub fn output_level(&self) -> f32 {
        self.output_meter.level()
    }

    /// Dropouts started since reset.
    pub fn dropout_count(&self) -> u64 {
        self.artifacts.dropout_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(channel: &mut TapeChannel, cfg: &TapeConfig, input: f32, n: usize) -> f32 {
        let tables = TapeTables::new();
        let mut last = 0.0;
        for _ in 0..n {
            last = channel.process(input, cfg, &tables);
        }
        last
    }

    #[test]
    fn dry_mix_returns_input_exactly() {
        let cfg = TapeConfig {
            wet_dry_mix: 0.0,
            ..TapeConfig::default()
        };
        let tables = TapeTables::new();
        let mut ch = TapeChannel::new(48000.0, &cfg, 1);
        for i in 0..2000 {
            let x = ((i as f32) * 0.05).sin() * 0.7;
            assert_eq!(ch.process(x, &cfg, &tables), x);
        }
    }

    #[test]
    fn constant_input_settles_to_zero() {
        let cfg = TapeConfig::default();
        let mut ch = TapeChannel::new(48000.0, &cfg, 1);
        let tables = TapeTables::new();
        let mut sum = 0.0;
        for i in 0..10_000 {
            let y = ch.process(0.3, &cfg, &tables);
            if i >= 9000 {
                sum += y;
            }
        }
        let mean = sum / 1000.0;
        assert!(mean.abs() < 0.01, "mean = {mean}");
    }

    #[test]
    fn non_finite_input_does_not_poison_state() {
        let cfg = TapeConfig::default();
        let mut ch = TapeChannel::new(48000.0, &cfg, 1);
        let tables = TapeTables::new();
        ch.process(f32::NAN, &cfg, &tables);
        ch.process(f32::INFINITY, &cfg, &tables);
        assert!(run(&mut ch, &cfg, 0.2, 100).is_finite());
    }

    #[test]
    fn meters_follow_signal() {
        let cfg = TapeConfig {
            compression_amount: 1.0,
            ..TapeConfig::default()
        };
        let mut ch = TapeChannel::new(48000.0, &cfg, 1);
        run(&mut ch, &cfg, 0.9, 64);
        assert!(ch.saturation_activity() > 0.0);
        assert!(ch.gain_reduction_db() < 0.0);
        assert!(ch.output_level() > 0.0);
        ch.reset();
        assert_eq!(ch.output_level(), 0.0);
        assert_eq!(ch.gain_reduction_db(), 0.0);
        assert_eq!(ch.dropout_count(), 0);
    }
}
