//! Peak level follower used for output metering.
//!
//! A rectified input drives a one-pole smoother whose memory depends on
//! direction: rising input uses the attack memory, falling input the release
//! memory. With a sub-millisecond attack and a few hundred milliseconds of
//! release the reading holds peaks long enough for a control thread polling
//! at UI rate to see them.

use libm::expf;

use crate::flush_denormal;

/// Shortest accepted attack, in milliseconds.
const MIN_ATTACK_MS: f32 = 0.1;
/// Shortest accepted release, in milliseconds.
const MIN_RELEASE_MS: f32 = 1.0;

/// Tracks the peak amplitude of a signal.
///
/// ```rust
/// use magtape_core::EnvelopeFollower;
///
/// let mut meter = EnvelopeFollower::with_times(48000.0, 0.1, 300.0);
/// for _ in 0..480 {
///     meter.process(-0.5);
/// }
/// assert!((meter.level() - 0.5).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    level: f32,
    attack_ms: f32,
    release_ms: f32,
    attack_memory: f32,
    release_memory: f32,
}

impl EnvelopeFollower {
    /// Build a follower at `sample_rate` with the given attack and release.
    ///
    /// Times are floored at 0.1 ms (attack) and 1 ms (release).
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            level: 0.0,
            attack_ms: attack_ms.max(MIN_ATTACK_MS),
            release_ms: release_ms.max(MIN_RELEASE_MS),
            attack_memory: 0.0,
            release_memory: 0.0,
        };
        follower.set_sample_rate(sample_rate);
        follower
    }

    /// Recompute both memories for a new sample rate. The level is kept.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.attack_memory = memory(self.attack_ms, sample_rate);
        self.release_memory = memory(self.release_ms, sample_rate);
    }

    /// Feed one sample and return the updated level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let rectified = input.abs();
        let m = if rectified > self.level {
            self.attack_memory
        } else {
            self.release_memory
        };
        self.level = flush_denormal(rectified + m * (self.level - rectified));
        self.level
    }

    /// Current level, without consuming input.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Drop the level to zero.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::with_times(48000.0, 10.0, 100.0)
    }
}

/// Per-sample memory for a time constant of `ms` at `sample_rate`.
fn memory(ms: f32, sample_rate: f32) -> f32 {
    expf(-1000.0 / (ms * sample_rate))
}
