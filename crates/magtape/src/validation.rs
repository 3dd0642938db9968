//! Configuration validation and repair.
//!
//! [`TapeConfig::validate`] reports every out-of-range or non-finite field.
//! [`TapeConfig::sanitized`] repairs them: values are clamped to their range
//! and non-finite values fall back to the field's default.
//!
//! # Example
//!
//! ```rust
//! use magtape::{TapeConfig, ValidationError};
//!
//! let cfg = TapeConfig { wet_dry_mix: 1.5, ..TapeConfig::default() };
//! assert!(matches!(
//!     cfg.validate(),
//!     Err(ValidationError::OutOfRange { field: "wet_dry_mix", .. })
//! ));
//! assert_eq!(cfg.sanitized().wet_dry_mix, 1.0);
//! ```

use thiserror::Error;

use crate::TapeConfig;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Field value outside its documented range.
    #[error("field '{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the field.
        field: &'static str,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Field is NaN or infinite.
    #[error("field '{field}' is not finite")]
    NotFinite {
        /// Name of the field.
        field: &'static str,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

impl TapeConfig {
    /// Check every ranged field.
    ///
    /// Returns the single problem found, or [`ValidationError::Multiple`]
    /// when there are several.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut copy = *self;
        let mut errors: Vec<ValidationError> = copy
            .ranged_fields_mut()
            .into_iter()
            .filter_map(|(field, min, max, value)| {
                let value = *value;
                if !value.is_finite() {
                    Some(ValidationError::NotFinite { field })
                } else if value < min || value > max {
                    Some(ValidationError::OutOfRange {
                        field,
                        value,
                        min,
                        max,
                    })
                } else {
                    None
                }
            })
            .collect();

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }

    /// Repair the configuration so [`validate`](Self::validate) passes.
    ///
    /// Out-of-range values are clamped; NaN and infinities become the
    /// field's default value.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let mut defaults = Self::default();
        for ((_, min, max, value), (_, _, _, fallback)) in self
            .ranged_fields_mut()
            .into_iter()
            .zip(defaults.ranged_fields_mut())
        {
            let current = *value;
            *value = if current.is_finite() {
                current.clamp(min, max)
            } else {
                *fallback
            };
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(TapeConfig::default().validate(), Ok(()));
        assert_eq!(TapeConfig::clean().validate(), Ok(()));
    }

    #[test]
    fn reports_out_of_range_field() {
        let cfg = TapeConfig {
            compression_ratio: 0.5,
            ..TapeConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::OutOfRange {
                field: "compression_ratio",
                value: 0.5,
                min: 1.0,
                max: 100.0,
            })
        );
    }

    #[test]
    fn reports_non_finite_field() {
        let cfg = TapeConfig {
            attack_time_ms: f32::NAN,
            ..TapeConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::NotFinite {
                field: "attack_time_ms"
            })
        );
    }

    #[test]
    fn collects_multiple_errors() {
        let cfg = TapeConfig {
            wet_dry_mix: -1.0,
            release_time_ms: 0.0,
            noise_floor_db: f32::INFINITY,
            ..TapeConfig::default()
        };
        let Err(ValidationError::Multiple(errors)) = cfg.validate() else {
            panic!("expected multiple errors");
        };
        assert_eq!(errors.len(), 3);
        let msg = ValidationError::Multiple(errors).to_string();
        assert!(msg.contains("release_time_ms"));
        assert!(msg.contains("; "));
    }

    #[test]
    fn sanitized_clamps_and_replaces() {
        let cfg = TapeConfig {
            saturation_amount: 3.0,
            attack_time_ms: -5.0,
            compression_ratio: 0.0,
            wet_dry_mix: f32::NAN,
            noise_floor_db: f32::NEG_INFINITY,
            ..TapeConfig::default()
        }
        .sanitized();

        assert_eq!(cfg.saturation_amount, 1.0);
        assert_eq!(cfg.attack_time_ms, 0.01);
        assert_eq!(cfg.compression_ratio, 1.0);
        assert_eq!(cfg.wet_dry_mix, TapeConfig::default().wet_dry_mix);
        assert_eq!(cfg.noise_floor_db, TapeConfig::default().noise_floor_db);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn sanitized_keeps_valid_config() {
        let cfg = TapeConfig {
            wow_amount: 0.4,
            ..TapeConfig::default()
        };
        assert_eq!(cfg.sanitized(), cfg);
    }
}
