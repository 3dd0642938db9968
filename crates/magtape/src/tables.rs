//! Precomputed transfer curves.

use core::f32::consts::PI;

use libm::{sinf, tanhf};
use magtape_core::LookupTable;

/// Entries per table.
pub const TABLE_SIZE: usize = 1024;

/// Lookup tables generated once per processor and never mutated.
#[derive(Debug, Clone)]
pub struct TapeTables {
    saturation: LookupTable<TABLE_SIZE>,
    harmonic: LookupTable<TABLE_SIZE>,
}

impl Default for TapeTables {
    fn default() -> Self {
        Self::new()
    }
}

impl TapeTables {
    /// Generate both tables.
    ///
    /// - saturation: `tanh(2x) · 0.8`
    /// - harmonic shaping: `sin(πx) · 0.1 + sin(2πx) · 0.05`
    pub fn new() -> Self {
        Self {
            saturation: LookupTable::from_fn(|x| tanhf(x * 2.0) * 0.8),
            harmonic: LookupTable::from_fn(|x| sinf(x * PI) * 0.1 + sinf(x * 2.0 * PI) * 0.05),
        }
    }

    /// Sigmoid used by [`TapeMachine::Custom`](crate::TapeMachine::Custom).
    #[inline]
    pub fn saturation_curve(&self, x: f32) -> f32 {
        self.saturation.lookup(x)
    }

    /// Harmonic-shaping curve. Not used on the signal path; exposed for
    /// displays and custom stages.
    #[inline]
    pub fn harmonic_shape(&self, x: f32) -> f32 {
        self.harmonic.lookup(x)
    }
}
