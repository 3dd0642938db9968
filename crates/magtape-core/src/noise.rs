//! Deterministic noise source for tape hiss and random events.
//!
//! A 32-bit xorshift generator: tiny state, no allocation, identical output
//! for identical seeds, which keeps renders and tests reproducible. Normal
//! draws use the Box–Muller transform and cache the second value of each
//! pair.

use core::f32::consts::TAU;
use libm::{cosf, logf, sinf, sqrtf};

/// Seed used by [`NoiseSource::default`].
pub const DEFAULT_SEED: u32 = 0x1234_5678;

/// Seeded xorshift32 noise source.
///
/// # Example
///
/// ```rust
/// use magtape_core::NoiseSource;
///
/// let mut a = NoiseSource::new(7);
/// let mut b = NoiseSource::new(7);
/// assert_eq!(a.uniform(), b.uniform());
///
/// let u = a.uniform();
/// assert!((0.0..1.0).contains(&u));
/// ```
#[derive(Debug, Clone)]
pub struct NoiseSource {
    state: u32,
    seed: u32,
    spare: Option<f32>,
}

impl NoiseSource {
    /// Create a source from `seed`. A zero seed (the xorshift fixed point)
    /// is replaced by [`DEFAULT_SEED`].
    pub const fn new(seed: u32) -> Self {
        let seed = if seed == 0 { DEFAULT_SEED } else { seed };
        Self {
            state: seed,
            seed,
            spare: None,
        }
    }

    /// Next raw 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f32 {
        // 24 bits fill the f32 mantissa exactly, so 1.0 is never produced.
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Uniform value in `[min, max)`.
    #[inline]
    pub fn uniform_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.uniform() * (max - min)
    }

    /// Standard normal value (mean 0, standard deviation 1).
    #[inline]
    pub fn normal(&mut self) -> f32 {
        if let Some(spare) = self.spare.take() {
            return spare;
        }
        let u = self.uniform().max(f32::MIN_POSITIVE);
        let v = self.uniform();
        let mag = sqrtf(-2.0 * logf(u));
        self.spare = Some(mag * cosf(TAU * v));
        mag * sinf(TAU * v)
    }

    /// Bernoulli trial: `true` with the given probability.
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        self.uniform() < probability
    }

    /// Restart the sequence from the original seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
        self.spare = None;
    }
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
