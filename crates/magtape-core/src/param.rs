//! Exponential slew toward a moving target.
//!
//! [`SmoothedParam`] follows `current += step * (target - current)` with
//! `step = 1 - exp(-1 / (tau * fs))`. Every step lands between the previous
//! value and the target, so a smoothed value never overshoots. The
//! saturation stage runs one at audio rate to hide curve switches.

use libm::expf;

use crate::flush_denormal;

/// A value that approaches its target with a fixed time constant.
///
/// ```rust
/// use magtape_core::SmoothedParam;
///
/// let mut drive = SmoothedParam::with_config(0.0, 48000.0, 1.0);
/// drive.set_target(1.0);
/// let first = drive.advance();
/// assert!(first > 0.0 && first < 0.05);
/// ```
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    step: f32,
    time_ms: f32,
}

impl SmoothedParam {
    /// Start at `initial` with a `time_ms` time constant at `sample_rate`.
    ///
    /// A non-positive time disables smoothing.
    pub fn with_config(initial: f32, sample_rate: f32, time_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            step: 1.0,
            time_ms,
        };
        param.set_sample_rate(sample_rate);
        param
    }

    /// Move the target; the value follows on subsequent steps.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value`.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Keep the time constant in milliseconds at a new rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.step = if self.time_ms > 0.0 && sample_rate > 0.0 {
            1.0 - expf(-1000.0 / (self.time_ms * sample_rate))
        } else {
            1.0
        };
    }

    /// Take one step toward the target.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current = flush_denormal(self.current + self.step * (self.target - self.current));
        self.current
    }

    /// Retarget and step in one call.
    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        self.target = target;
        self.advance()
    }

    /// Value after the most recent step.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::with_config(0.0, 48000.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_time_is_instant() {
        let mut p = SmoothedParam::default();
        assert_eq!(p.process(0.8), 0.8);
    }

    #[test]
    fn one_time_constant_reaches_63_percent() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 1.0);
        p.set_target(1.0);
        for _ in 0..48 {
            p.advance();
        }
        let expected = 1.0 - expf(-1.0);
        assert!((p.get() - expected).abs() < 0.01, "got {}", p.get());
    }

    #[test]
    fn time_constant_survives_rate_change() {
        let mut a = SmoothedParam::with_config(0.0, 96000.0, 1.0);
        a.set_sample_rate(48000.0);
        let mut b = SmoothedParam::with_config(0.0, 48000.0, 1.0);
        assert_eq!(a.process(1.0), b.process(1.0));
    }

    #[test]
    fn immediate_skips_slew() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 50.0);
        p.set_immediate(-0.4);
        assert_eq!(p.get(), -0.4);
        assert_eq!(p.advance(), -0.4);
    }
}
