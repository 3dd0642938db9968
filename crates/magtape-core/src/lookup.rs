//! Fixed-size lookup tables over the bipolar range `[-1, 1]`.
//!
//! A [`LookupTable`] samples a closed-form curve once, at construction, and
//! answers queries by linear interpolation. Entry `i` holds
//! `f(i / (N - 1) * 2 - 1)`, so the first and last entries sit exactly on
//! -1 and +1 and queries outside that range clamp to the end values.

/// Linearly interpolated table of `N` samples spanning `[-1, 1]`.
///
/// # Example
///
/// ```rust
/// use magtape_core::LookupTable;
///
/// let table: LookupTable<1024> = LookupTable::from_fn(|x| x * 0.5);
/// assert!((table.lookup(0.5) - 0.25).abs() < 1e-4);
/// assert_eq!(table.lookup(4.0), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct LookupTable<const N: usize> {
    data: [f32; N],
}

impl<const N: usize> LookupTable<N> {
    /// Sample `f` at `N` evenly spaced points from -1 to +1.
    pub fn from_fn(f: impl Fn(f32) -> f32) -> Self {
        let last = (N.max(2) - 1) as f32;
        let data = core::array::from_fn(|i| f((i as f32 / last) * 2.0 - 1.0));
        Self { data }
    }

    /// Interpolate at a fractional table index, clamped to `[0, N - 1]`.
    #[inline]
    pub fn interpolate(&self, index: f32) -> f32 {
        if N == 0 {
            return 0.0;
        }
        let last = N - 1;
        if index.is_nan() || index <= 0.0 {
            return self.data[0];
        }
        if index >= last as f32 {
            return self.data[last];
        }
        let idx = index as usize;
        let frac = index - idx as f32;
        let a = self.data[idx];
        let b = self.data[idx + 1];
        a + (b - a) * frac
    }

    /// Evaluate the table at `x` in `[-1, 1]`.
    #[inline]
    pub fn lookup(&self, x: f32) -> f32 {
        self.interpolate((x + 1.0) * 0.5 * (N.saturating_sub(1)) as f32)
    }

    /// Raw table entries.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        N
    }

    /// `true` for a zero-sized table.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_land_on_unit_range() {
        let table: LookupTable<1024> = LookupTable::from_fn(|x| x);
        assert_eq!(table.as_slice()[0], -1.0);
        assert!((table.as_slice()[1023] - 1.0).abs() < 1e-6);
        assert_eq!(table.len(), 1024);
    }

    #[test]
    fn interpolates_between_entries() {
        let table: LookupTable<3> = LookupTable::from_fn(|x| x * x);
        // Entries: 1, 0, 1
        assert!((table.interpolate(0.5) - 0.5).abs() < 1e-6);
        assert!((table.lookup(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn clamps_out_of_range_queries() {
        let table: LookupTable<64> = LookupTable::from_fn(|x| 2.0 * x);
        assert_eq!(table.lookup(-3.0), table.as_slice()[0]);
        assert_eq!(table.lookup(3.0), table.as_slice()[63]);
        assert_eq!(table.interpolate(f32::NAN), table.as_slice()[0]);
    }

    #[test]
    fn tracks_smooth_curve() {
        let table: LookupTable<1024> = LookupTable::from_fn(|x| libm::tanhf(2.0 * x) * 0.8);
        for i in 0..=200 {
            let x = i as f32 / 100.0 - 1.0;
            let exact = libm::tanhf(2.0 * x) * 0.8;
            assert!((table.lookup(x) - exact).abs() < 1e-4, "x = {x}");
        }
    }
}
