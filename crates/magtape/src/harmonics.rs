//! Harmonic generation.
//!
//! The dry input sample stands in for a fundamental phase: every generator
//! sits at `input · 2π` and the n-th harmonic contributes `sin(n · phase)`.
//! This is a waveshaper keyed on the input level, not pitch tracking.

use core::f32::consts::TAU;

use libm::sinf;

use crate::TapeConfig;

/// Number of generator slots.
pub const GENERATORS: usize = 8;

const EVEN: [usize; 3] = [2, 4, 6];
const ODD: [usize; 3] = [3, 5, 7];
const EVEN_LEVEL: f32 = 0.1;
const ODD_LEVEL: f32 = 0.05;

/// Harmonic generator state.
#[derive(Debug, Clone)]
pub struct HarmonicStage {
    phases: [f32; GENERATORS],
    gains: [f32; GENERATORS],
}

impl Default for HarmonicStage {
    fn default() -> Self {
        Self::new()
    }
}

impl HarmonicStage {
    /// Create the generators with falling gains `1 / (i + 2)`.
    pub fn new() -> Self {
        Self {
            phases: [0.0; GENERATORS],
            gains: core::array::from_fn(|i| 1.0 / (i as f32 + 2.0)),
        }
    }

    /// Add harmonics of `fundamental` to `input`, scaled by
    /// `harmonic_content`. Zero content returns `input` unchanged.
    #[inline]
    pub fn process(&mut self, input: f32, fundamental: f32, cfg: &TapeConfig) -> f32 {
        if cfg.harmonic_content <= 0.0 {
            return input;
        }
        self.phases = [fundamental * TAU; GENERATORS];
        input + self.series() * cfg.harmonic_content
    }

    fn series(&self) -> f32 {
        let even: f32 = EVEN
            .iter()
            .enumerate()
            .map(|(i, &n)| sinf(self.phases[i] * n as f32) * self.gains[i] * EVEN_LEVEL)
            .sum();
        let odd: f32 = ODD
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                sinf(self.phases[i + 3] * n as f32) * self.gains[i + 3] * ODD_LEVEL
            })
            .sum();
        even + odd
    }

    /// Zero the phases.
    pub fn reset(&mut self) {
        self.phases = [0.0; GENERATORS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_content_is_identity() {
        let cfg = TapeConfig {
            harmonic_content: 0.0,
            ..TapeConfig::default()
        };
        let mut stage = HarmonicStage::new();
        for i in -10..=10 {
            let x = i as f32 / 10.0;
            assert_eq!(stage.process(x, x, &cfg), x);
        }
    }

    #[test]
    fn gains_fall_off() {
        let stage = HarmonicStage::new();
        assert_eq!(stage.gains[0], 0.5);
        assert!(stage.gains.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn added_content_is_bounded() {
        let cfg = TapeConfig {
            harmonic_content: 1.0,
            ..TapeConfig::default()
        };
        let mut stage = HarmonicStage::new();
        for i in -100..=100 {
            let x = i as f32 / 100.0;
            let y = stage.process(x, x, &cfg);
            assert!((y - x).abs() < 0.14, "x={x} y={y}");
        }
    }

    #[test]
    fn quarter_phase_cancels_even_terms() {
        // fundamental 0.25 puts the phase at π/2: even terms 2, 4, 6 are
        // sin(π), sin(2π), sin(3π), all zero; odd terms 3, 5, 7 alternate.
        let cfg = TapeConfig {
            harmonic_content: 1.0,
            ..TapeConfig::default()
        };
        let mut stage = HarmonicStage::new();
        let y = stage.process(0.0, 0.25, &cfg);
        let expected = (-1.0 / 5.0 + 1.0 / 6.0 - 1.0 / 7.0) * ODD_LEVEL;
        assert!((y - expected).abs() < 1e-5, "y = {y}");
    }
}
