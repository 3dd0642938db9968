//! Machine-dependent saturation.
//!
//! Each [`TapeMachine`] has its own transfer curve. After the curve the
//! positive and negative half-waves are scaled apart by the asymmetry
//! amount, and the result is slewed by a 1 ms smoother so that switching
//! machines or amounts between blocks does not click.

use core::f32::consts::PI;

use libm::{copysignf, sinf, tanhf};
use magtape_core::SmoothedParam;

use crate::{TapeConfig, TapeMachine, TapeTables};

const SMOOTHING_MS: f32 = 1.0;

/// Tube curve: tanh with a small bias (DC removed) plus an even-harmonic term.
#[inline]
pub fn tube(x: f32, amount: f32) -> f32 {
    let driven = x * (1.0 + amount * 3.0);
    let bias = 0.1 * amount;
    let shaped = tanhf(driven + bias) - tanhf(bias);
    shaped + sinf(driven * PI) * amount * 0.1
}

/// Solid-state curve: linear below 0.7, 0.3 slope above, gain-compensated.
#[inline]
pub fn solid_state(x: f32, amount: f32) -> f32 {
    let drive = 1.0 + amount * 2.0;
    let driven = x * drive;
    let shaped = if driven.abs() < 0.7 {
        driven
    } else {
        copysignf(0.7 + (driven.abs() - 0.7) * 0.3, driven)
    };
    shaped / drive
}

/// Transistor curve: knee at +0.8 and -0.7 plus a third-harmonic term.
#[inline]
pub fn transistor(x: f32, amount: f32) -> f32 {
    let drive = 1.0 + amount * 2.5;
    let driven = x * drive;
    let shaped = if driven > 0.8 {
        0.8 + (driven - 0.8) * 0.2
    } else if driven < -0.7 {
        -0.7 + (driven + 0.7) * 0.3
    } else {
        driven
    };
    (shaped + sinf(driven * PI * 3.0) * amount * 0.05) / drive
}

/// Digital curve: hard clip, with a 7π fold-over term once past 0.9.
#[inline]
pub fn digital(x: f32, amount: f32) -> f32 {
    let drive = 1.0 + amount * 4.0;
    let driven = x * drive;
    let mut shaped = driven.clamp(-1.0, 1.0);
    if driven.abs() > 0.9 {
        shaped += sinf(driven * PI * 7.0) * amount * 0.1;
    }
    shaped / drive
}

/// Scale the positive half-wave up by `asymmetry` and the negative half-wave
/// down by half of it.
#[inline]
pub fn apply_asymmetry(x: f32, asymmetry: f32) -> f32 {
    if asymmetry <= 0.0 {
        x
    } else if x > 0.0 {
        x * (1.0 + asymmetry)
    } else {
        x * (1.0 - asymmetry * 0.5)
    }
}

/// Saturation stage state.
#[derive(Debug, Clone)]
pub struct SaturationStage {
    smoother: SmoothedParam,
    last_input: f32,
    last_output: f32,
}

impl SaturationStage {
    /// Create the stage at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            smoother: SmoothedParam::with_config(0.0, sample_rate, SMOOTHING_MS),
            last_input: 0.0,
            last_output: 0.0,
        }
    }

    /// Shape one sample.
    ///
    /// With `saturation_amount == 0` the input is returned unchanged; the
    /// smoother is moved to the input so a later switch back on starts from
    /// the current signal.
    #[inline]
    pub fn process(&mut self, input: f32, cfg: &TapeConfig, tables: &TapeTables) -> f32 {
        let amount = cfg.saturation_amount;
        self.last_input = input;
        if amount <= 0.0 {
            self.smoother.set_immediate(input);
            self.last_output = input;
            return input;
        }

        let shaped = match cfg.machine {
            TapeMachine::VintageTube => tube(input, amount),
            TapeMachine::ModernSolid => solid_state(input, amount),
            TapeMachine::VintageTransistor => transistor(input, amount),
            TapeMachine::ExoticDigital => digital(input, amount),
            TapeMachine::Custom => {
                tables.saturation_curve(input) * amount + input * (1.0 - amount)
            }
        };

        let out = self
            .smoother
            .process(apply_asymmetry(shaped, cfg.saturation_asymmetry));
        self.last_output = out;
        out
    }

    /// |output − input| of the most recent sample.
    pub fn activity(&self) -> f32 {
        (self.last_output - self.last_input).abs()
    }

    /// Update the smoother for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.smoother.set_sample_rate(sample_rate);
    }

    /// Clear state.
    pub fn reset(&mut self) {
        self.smoother.set_immediate(0.0);
        self.last_input = 0.0;
        self.last_output = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep() -> impl DoubleEndedIterator<Item = f32> {
        (0..=200).map(|i| i as f32 * 0.01 - 1.0)
    }

    #[test]
    fn zero_amount_is_identity_for_every_machine() {
        let tables = TapeTables::new();
        for machine in TapeMachine::ALL {
            let cfg = TapeConfig {
                machine,
                saturation_amount: 0.0,
                ..TapeConfig::default()
            };
            let mut stage = SaturationStage::new(48000.0);
            for x in sweep() {
                assert_eq!(stage.process(x, &cfg, &tables), x, "{machine}");
            }
            assert_eq!(stage.activity(), 0.0);
        }
    }

    #[test]
    fn full_amount_stays_bounded() {
        for x in sweep() {
            assert!(tube(x, 1.0).abs() <= 1.25, "tube({x})");
            assert!(solid_state(x, 1.0).abs() <= 1.0, "solid({x})");
            assert!(transistor(x, 1.0).abs() <= 1.0, "transistor({x})");
            assert!(digital(x, 1.0).abs() <= 1.0, "digital({x})");
        }
    }

    #[test]
    fn smoothed_stage_bounded_at_full_drive() {
        let tables = TapeTables::new();
        for machine in TapeMachine::ALL {
            let cfg = TapeConfig {
                machine,
                saturation_amount: 1.0,
                saturation_asymmetry: 0.0,
                ..TapeConfig::default()
            };
            let mut stage = SaturationStage::new(48000.0);
            for x in sweep().chain(sweep().rev()) {
                let y = stage.process(x, &cfg, &tables);
                assert!(y.abs() <= 1.25, "{machine}: {x} -> {y}");
            }
        }
    }

    #[test]
    fn solid_state_is_linear_below_knee() {
        // drive 3 at amount 1: |x| < 0.7/3 stays linear after compensation
        let x = 0.2;
        assert!((solid_state(x, 1.0) - x).abs() < 1e-6);
        assert!(solid_state(0.9, 1.0) < 0.9);
    }

    #[test]
    fn transistor_knees_are_asymmetric() {
        let pos = transistor(0.9, 0.0);
        let neg = transistor(-0.9, 0.0);
        assert!((pos - 0.82).abs() < 1e-5);
        assert!((neg + 0.76).abs() < 1e-5);
    }

    #[test]
    fn tube_removes_bias_offset() {
        assert!(tube(0.0, 1.0).abs() < 1e-6);
    }

    #[test]
    fn asymmetry_scales_half_waves() {
        assert_eq!(apply_asymmetry(0.5, 0.2), 0.6);
        assert!((apply_asymmetry(-0.5, 0.2) + 0.45).abs() < 1e-6);
        assert_eq!(apply_asymmetry(-0.5, 0.0), -0.5);
    }

    #[test]
    fn custom_blends_table_with_input() {
        let tables = TapeTables::new();
        let cfg = TapeConfig {
            machine: TapeMachine::Custom,
            saturation_amount: 1.0,
            saturation_asymmetry: 0.0,
            ..TapeConfig::default()
        };
        let mut stage = SaturationStage::new(48000.0);
        let mut y = 0.0;
        for _ in 0..2000 {
            y = stage.process(0.5, &cfg, &tables);
        }
        assert!((y - tables.saturation_curve(0.5)).abs() < 1e-4);
        assert!(stage.activity() > 0.0);
    }

    #[test]
    fn smoother_prevents_jumps() {
        let tables = TapeTables::new();
        let cfg = TapeConfig {
            saturation_amount: 1.0,
            ..TapeConfig::default()
        };
        let mut stage = SaturationStage::new(48000.0);
        let first = stage.process(1.0, &cfg, &tables);
        assert!(first < 0.1, "first sample should be slewed, got {first}");
    }
}
