//! Wow and flutter.
//!
//! Two free-running sine oscillators (0.5 Hz wow, 6 Hz flutter) sweep the
//! read position of a short delay line. The sweep is centred on a fixed
//! delay equal to its own depth, so the read position never passes the
//! write position.

use core::f32::consts::TAU;

use libm::sinf;
use magtape_core::{FixedDelayLine, phase_increment};

use crate::TapeConfig;

/// Wow oscillator frequency in Hz.
pub const WOW_HZ: f32 = 0.5;
/// Flutter oscillator frequency in Hz.
pub const FLUTTER_HZ: f32 = 6.0;

const WOW_DEPTH: f32 = 0.01;
const FLUTTER_DEPTH: f32 = 0.005;
const DELAY_LEN: usize = 1024;

/// Wow/flutter stage state.
#[derive(Debug, Clone)]
pub struct ModulationStage {
    delay: FixedDelayLine<DELAY_LEN>,
    wow_phase: f32,
    flutter_phase: f32,
    wow_inc: f32,
    flutter_inc: f32,
    sample_rate: f32,
}

impl ModulationStage {
    /// Create the stage at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            delay: FixedDelayLine::new(),
            wow_phase: 0.0,
            flutter_phase: 0.0,
            wow_inc: phase_increment(WOW_HZ, sample_rate),
            flutter_inc: phase_increment(FLUTTER_HZ, sample_rate),
            sample_rate,
        }
    }

    /// Modulate one sample.
    ///
    /// With both amounts at zero the input is returned unchanged (it is
    /// still written to the delay line so history is intact when the
    /// modulation comes back).
    #[inline]
    pub fn process(&mut self, input: f32, cfg: &TapeConfig) -> f32 {
        if cfg.wow_amount <= 0.0 && cfg.flutter_amount <= 0.0 {
            self.delay.write(input);
            return input;
        }

        self.wow_phase += self.wow_inc;
        if self.wow_phase >= TAU {
            self.wow_phase -= TAU;
        }
        self.flutter_phase += self.flutter_inc;
        if self.flutter_phase >= TAU {
            self.flutter_phase -= TAU;
        }

        let wow = cfg.wow_amount * WOW_DEPTH;
        let flutter = cfg.flutter_amount * FLUTTER_DEPTH;
        let swing = sinf(self.wow_phase) * wow + sinf(self.flutter_phase) * flutter;
        let to_samples = self.sample_rate * 0.001;
        let delay = (wow + flutter + swing) * to_samples;

        self.delay.write_read(input, delay)
    }

    /// Current oscillator phases `(wow, flutter)` in radians.
    pub fn phases(&self) -> (f32, f32) {
        (self.wow_phase, self.flutter_phase)
    }

    /// Recompute oscillator increments.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.wow_inc = phase_increment(WOW_HZ, sample_rate);
        self.flutter_inc = phase_increment(FLUTTER_HZ, sample_rate);
    }

    /// Clear the delay line and rewind both oscillators.
    pub fn reset(&mut self) {
        self.delay.clear();
        self.wow_phase = 0.0;
        self.flutter_phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(i: usize) -> f32 {
        sinf(TAU * 440.0 * i as f32 / 48000.0)
    }

    #[test]
    fn zero_amounts_are_identity() {
        let cfg = TapeConfig {
            wow_amount: 0.0,
            flutter_amount: 0.0,
            ..TapeConfig::default()
        };
        let mut stage = ModulationStage::new(48000.0);
        for i in 0..1000 {
            assert_eq!(stage.process(sine(i), &cfg), sine(i));
        }
        assert_eq!(stage.phases(), (0.0, 0.0));
    }

    #[test]
    fn modulation_bends_a_sine() {
        let cfg = TapeConfig {
            wow_amount: 1.0,
            flutter_amount: 1.0,
            ..TapeConfig::default()
        };
        let mut stage = ModulationStage::new(48000.0);
        let mut max_diff = 0.0f32;
        for i in 0..48000 {
            let y = stage.process(sine(i), &cfg);
            assert!(y.abs() <= 1.0 + 1e-5);
            max_diff = max_diff.max((y - sine(i)).abs());
        }
        assert!(max_diff > 0.001 && max_diff < 0.2, "max_diff = {max_diff}");
    }

    #[test]
    fn constant_input_stays_constant() {
        let cfg = TapeConfig {
            wow_amount: 1.0,
            flutter_amount: 1.0,
            ..TapeConfig::default()
        };
        let mut stage = ModulationStage::new(48000.0);
        for _ in 0..16 {
            stage.process(0.5, &cfg);
        }
        for _ in 0..1000 {
            assert!((stage.process(0.5, &cfg) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn phases_wrap() {
        let cfg = TapeConfig {
            wow_amount: 0.1,
            flutter_amount: 0.1,
            ..TapeConfig::default()
        };
        let mut stage = ModulationStage::new(8000.0);
        for _ in 0..20000 {
            stage.process(0.0, &cfg);
            let (w, f) = stage.phases();
            assert!((0.0..TAU).contains(&w));
            assert!((0.0..TAU).contains(&f));
        }
    }
}
