//! Inline ring buffer for the wow and flutter tap.
//!
//! `read(d)` looks `d` samples behind the most recent write, so `read(0.0)`
//! returns the last sample written. Fractional positions blend the two
//! neighbouring samples linearly; the slowly swept modulation tap needs
//! nothing steeper.

/// Ring buffer of `N` samples held inline with its owner.
///
/// ```rust
/// use magtape_core::FixedDelayLine;
///
/// let mut tap: FixedDelayLine<64> = FixedDelayLine::new();
/// tap.write(1.0);
/// tap.write(0.0);
/// assert_eq!(tap.read(1.0), 1.0);
/// assert!((tap.read(0.5) - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct FixedDelayLine<const N: usize> {
    ring: [f32; N],
    head: usize,
}

impl<const N: usize> FixedDelayLine<N> {
    /// Silent buffer.
    pub fn new() -> Self {
        Self {
            ring: [0.0; N],
            head: 0,
        }
    }

    /// Deepest readable delay; one slot is reserved for interpolation.
    pub const fn max_delay(&self) -> usize {
        N - 2
    }

    /// Append a sample.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.ring[self.head] = sample;
        self.head = (self.head + 1) % N;
    }

    /// Sample `delay` behind the newest. Non-finite delays read as zero and
    /// the rest are clamped to `[0, max_delay()]`.
    #[inline]
    pub fn read(&self, delay: f32) -> f32 {
        let delay = if delay.is_finite() {
            delay.clamp(0.0, (N - 2) as f32)
        } else {
            0.0
        };
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let newer = (self.head + N - 1 - whole) % N;
        let older = (newer + N - 1) % N;
        let a = self.ring[newer];
        a + (self.ring[older] - a) * frac
    }

    /// [`write`](Self::write) then [`read`](Self::read).
    #[inline]
    pub fn write_read(&mut self, sample: f32, delay: f32) -> f32 {
        self.write(sample);
        self.read(delay)
    }

    /// Silence the buffer.
    pub fn clear(&mut self) {
        self.ring = [0.0; N];
        self.head = 0;
    }
}

impl<const N: usize> Default for FixedDelayLine<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_arrives_after_delay() {
        let mut tap: FixedDelayLine<128> = FixedDelayLine::new();
        tap.write(1.0);
        for _ in 0..50 {
            tap.write(0.0);
        }
        assert_eq!(tap.read(50.0), 1.0);
        assert_eq!(tap.read(49.0), 0.0);
        assert!((tap.read(49.75) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn zero_delay_passes_through() {
        let mut tap: FixedDelayLine<16> = FixedDelayLine::new();
        for x in [0.1, -0.4, 0.9] {
            assert_eq!(tap.write_read(x, 0.0), x);
        }
    }

    #[test]
    fn hostile_delays_are_contained() {
        let mut tap: FixedDelayLine<8> = FixedDelayLine::new();
        for i in 0..8 {
            tap.write(i as f32);
        }
        assert_eq!(tap.read(-3.0), 7.0);
        assert_eq!(tap.read(f32::NAN), 7.0);
        assert_eq!(tap.read(1000.0), tap.read(6.0));
        assert_eq!(tap.max_delay(), 6);
    }

    #[test]
    fn wraps_and_clears() {
        let mut tap: FixedDelayLine<4> = FixedDelayLine::new();
        for i in 0..10 {
            tap.write(i as f32);
        }
        assert_eq!(tap.read(0.0), 9.0);
        assert_eq!(tap.read(2.0), 7.0);
        tap.clear();
        assert_eq!(tap.read(1.0), 0.0);
    }
}
