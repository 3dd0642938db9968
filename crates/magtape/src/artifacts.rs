//! Tape artifacts: hysteresis, print-through, hiss and dropouts.

use magtape_core::{NoiseSource, OnePole, db_to_linear, ms_to_samples};

use crate::TapeConfig;

/// Noise floors at or below this level add no hiss.
pub const NOISE_GATE_DB: f32 = -80.0;
/// Level multiplier while a dropout is active.
pub const DROPOUT_GAIN: f32 = 0.1;
/// Shortest dropout.
pub const DROPOUT_MIN_MS: f32 = 1.0;
/// Longest dropout.
pub const DROPOUT_MAX_MS: f32 = 10.0;

const HYSTERESIS_SCALE: f32 = 0.1;
const PRINT_MEMORY: f32 = 0.9;
const PRINT_LEVEL: f32 = 0.1;
const PINK_MEMORY: f32 = 0.95;
const HISS_LEVEL: f32 = 0.1;

/// Artifact stage state.
#[derive(Debug, Clone)]
pub struct ArtifactStage {
    hysteresis: OnePole,
    print: OnePole,
    pink: OnePole,
    noise: NoiseSource,
    sample_rate: f32,
    dropout_remaining: u32,
    dropouts: u64,
}

impl ArtifactStage {
    /// Create the stage at `sample_rate` with its own noise `seed`.
    pub fn new(sample_rate: f32, seed: u32) -> Self {
        Self {
            hysteresis: OnePole::from_coeff(0.0),
            print: OnePole::from_coeff(PRINT_MEMORY),
            pink: OnePole::from_coeff(PINK_MEMORY),
            noise: NoiseSource::new(seed),
            sample_rate,
            dropout_remaining: 0,
            dropouts: 0,
        }
    }

    /// Apply every artifact to one sample.
    #[inline]
    pub fn process(&mut self, input: f32, cfg: &TapeConfig) -> f32 {
        let mut out = self.process_hysteresis(input, cfg.hysteresis);
        out = self.process_print_through(out, cfg.print_through);

        if cfg.noise_floor_db > NOISE_GATE_DB {
            out += self.hiss() * db_to_linear(cfg.noise_floor_db);
        }

        if self.in_dropout(cfg.dropout_rate) {
            out *= DROPOUT_GAIN;
        }
        out
    }

    /// `x - (x - history) · amount · 0.1`; the output becomes the history.
    #[inline]
    fn process_hysteresis(&mut self, input: f32, amount: f32) -> f32 {
        if amount <= 0.0 {
            return input;
        }
        self.hysteresis.set_coeff(amount * HYSTERESIS_SCALE);
        self.hysteresis.process(input)
    }

    /// Leaky echo of the recent signal, mixed in at `amount · 0.1`.
    #[inline]
    fn process_print_through(&mut self, input: f32, amount: f32) -> f32 {
        if amount <= 0.0 {
            return input;
        }
        input + self.print.process(input) * amount * PRINT_LEVEL
    }

    /// One-pole smoothed Gaussian noise.
    #[inline]
    fn hiss(&mut self) -> f32 {
        let white = self.noise.normal();
        self.pink.process(white) * HISS_LEVEL
    }

    /// Advance the dropout state machine by one sample.
    #[inline]
    fn in_dropout(&mut self, rate: f32) -> bool {
        if self.dropout_remaining > 0 {
            self.dropout_remaining -= 1;
            return true;
        }
        if rate <= 0.0 || !self.noise.chance(rate / self.sample_rate) {
            return false;
        }
        let ms = self.noise.uniform_range(DROPOUT_MIN_MS, DROPOUT_MAX_MS);
        let length = (ms_to_samples(ms, self.sample_rate) as u32).max(1);
        self.dropout_remaining = length - 1;
        self.dropouts += 1;
        true
    }

    /// Number of dropouts started since the last reset.
    pub fn dropout_count(&self) -> u64 {
        self.dropouts
    }

    /// `true` while a dropout is attenuating the signal.
    pub fn is_dropping_out(&self) -> bool {
        self.dropout_remaining > 0
    }

    /// Change the rate used for dropout probability and length.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Clear memories, end any dropout and restart the noise sequence.
    pub fn reset(&mut self) {
        self.hysteresis.reset();
        self.print.reset();
        self.pink.reset();
        self.noise.reset();
        self.dropout_remaining = 0;
        self.dropouts = 0;
    }
}
