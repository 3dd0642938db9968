//! Indexed parameter access for panels and host automation.
//!
//! A processor implementing [`ParameterInfo`] lists its controls by stable
//! index. Each one comes with a [`ParamDescriptor`]: display names, unit,
//! range, default and a numeric id that saved mappings can refer to even if
//! the index order changes.
//!
//! ```rust
//! use magtape_core::{ParamDescriptor, ParamId, ParameterInfo};
//!
//! struct HissKnob {
//!     floor_db: f32,
//! }
//!
//! impl ParameterInfo for HissKnob {
//!     fn param_count(&self) -> usize {
//!         1
//!     }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         (index == 0).then(|| {
//!             ParamDescriptor::gain_db("Noise Floor", "NOISE", -80.0, -40.0, -60.0)
//!                 .with_id(ParamId(7), "hiss_floor")
//!         })
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.floor_db } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.floor_db = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut knob = HissKnob { floor_db: -60.0 };
//! let i = knob.find_param_by_name("noise").unwrap();
//! knob.set_param(i, -120.0);
//! assert_eq!(knob.get_param(i), -80.0);
//! ```

/// Identifier that stays with a parameter across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// How a parameter value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Level in dB.
    Decibels,
    /// Time in milliseconds.
    Milliseconds,
    /// Compression ratio, shown as `n:1`.
    Ratio,
    /// Plain amount.
    None,
}

impl ParamUnit {
    /// Text appended after the value.
    ///
    /// ```rust
    /// use magtape_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Ratio.suffix(), ":1");
    /// ```
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Decibels => " dB",
            Self::Milliseconds => " ms",
            Self::Ratio => ":1",
            Self::None => "",
        }
    }
}

/// Metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name, e.g. "Saturation".
    pub name: &'static str,
    /// Label of at most ten characters for a performance key.
    pub short_name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Lowest accepted value.
    pub min: f32,
    /// Highest accepted value.
    pub max: f32,
    /// Value on a fresh processor.
    pub default: f32,
    /// Increment per encoder detent.
    pub step: f32,
    /// Stable numeric id.
    pub id: ParamId,
    /// Stable textual id, e.g. `"tape_sat"`.
    pub string_id: &'static str,
}

impl ParamDescriptor {
    /// Unitless amount; one step is a hundredth of the range.
    pub fn amount(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: (max - min) * 0.01,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Time in milliseconds, 1 ms steps.
    pub fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::amount(name, short_name, min, max, default).with_unit(ParamUnit::Milliseconds, 1.0)
    }

    /// Level in dB, half-dB steps.
    pub fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::amount(name, short_name, min, max, default).with_unit(ParamUnit::Decibels, 0.5)
    }

    /// Ratio `n:1`, steps of 0.1.
    pub fn ratio(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::amount(name, short_name, min, max, default).with_unit(ParamUnit::Ratio, 0.1)
    }

    const fn with_unit(mut self, unit: ParamUnit, step: f32) -> Self {
        self.unit = unit;
        self.step = step;
        self
    }

    /// Attach the stable ids.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamp `value` into range; NaN becomes the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Position of `value` within the range, in `[0, 1]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span == 0.0 {
            0.0
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }

    /// Value at position `normalized` within the range.
    ///
    /// ```rust
    /// use magtape_core::ParamDescriptor;
    ///
    /// let release = ParamDescriptor::time_ms("Release", "RELEASE", 50.0, 500.0, 100.0);
    /// assert_eq!(release.denormalize(1.0), 500.0);
    /// ```
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// A processor whose controls can be listed and set by index.
///
/// Indices run from zero to `param_count() - 1` and never change for the
/// lifetime of an instance.
pub trait ParameterInfo {
    /// How many parameters there are.
    fn param_count(&self) -> usize;

    /// Descriptor for `index`, or `None` past the end.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value; `0.0` past the end.
    fn get_param(&self, index: usize) -> f32;

    /// Store a value, clamped to the descriptor range. Ignored past the end.
    fn set_param(&mut self, index: usize, value: f32);

    /// Index whose full or short name matches, ignoring ASCII case.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|d| {
                d.name.eq_ignore_ascii_case(name) || d.short_name.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Stable id of `index`.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Index carrying `id`. Linear scan, meant for setup code.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}
