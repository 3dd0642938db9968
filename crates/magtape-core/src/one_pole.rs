//! One-pole memory: `y[n] = x[n] + m * (y[n-1] - x[n])`.
//!
//! The tape artifacts use it three ways, all with a memory `m` that is a
//! property of the model rather than a tuned frequency: magnetic hysteresis
//! (memory set from the hysteresis amount every sample), print-through echo
//! and the tilt that turns white hiss pink.

use crate::flush_denormal;

/// Largest memory accepted; 1.0 would never forget.
const MAX_MEMORY: f32 = 0.9999;

/// A first-order lowpass driven by its memory coefficient.
///
/// ```rust
/// use magtape_core::OnePole;
///
/// let mut lag = OnePole::from_coeff(0.9);
/// assert!((lag.process(1.0) - 0.1).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OnePole {
    memory: f32,
    y: f32,
}

impl OnePole {
    /// Build with memory `coeff`, clamped to `[0, 0.9999]`.
    pub fn from_coeff(coeff: f32) -> Self {
        Self {
            memory: coeff.clamp(0.0, MAX_MEMORY),
            y: 0.0,
        }
    }

    /// Change the memory without clearing the state.
    #[inline]
    pub fn set_coeff(&mut self, coeff: f32) {
        self.memory = coeff.clamp(0.0, MAX_MEMORY);
    }

    /// Memory currently in use.
    pub fn coeff(&self) -> f32 {
        self.memory
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.y = flush_denormal(input + self.memory * (self.y - input));
        self.y
    }

    /// Forget the previous output.
    pub fn reset(&mut self) {
        self.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_memory_is_transparent() {
        let mut lag = OnePole::from_coeff(0.0);
        for x in [0.3, -0.7, 1.0] {
            assert_eq!(lag.process(x), x);
        }
    }

    #[test]
    fn memory_accumulates() {
        let mut lag = OnePole::from_coeff(0.95);
        let first = lag.process(1.0);
        assert!((first - 0.05).abs() < 1e-6);
        let second = lag.process(1.0);
        assert!((second - (0.95 * 0.05 + 0.05)).abs() < 1e-6);
    }

    #[test]
    fn memory_is_clamped() {
        assert_eq!(OnePole::from_coeff(-1.0).coeff(), 0.0);
        let mut lag = OnePole::from_coeff(0.5);
        lag.set_coeff(2.0);
        assert_eq!(lag.coeff(), MAX_MEMORY);
    }

    #[test]
    fn reset_forgets() {
        let mut lag = OnePole::from_coeff(0.99);
        lag.process(1.0);
        lag.reset();
        assert_eq!(lag.process(0.0), 0.0);
    }
}
