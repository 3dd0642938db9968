//! Error types for control-path operations.
//!
//! Audio-path calls never fail. Everything that can be rejected (sample
//! rates, preset names, parameter lookups) reports a [`TapeError`].

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by the control path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TapeError {
    /// Sample rate is not finite or below [`MIN_SAMPLE_RATE`].
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// No preset registered under this name.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Preset names must contain a non-whitespace character.
    #[error("preset name must not be empty")]
    InvalidPresetName,

    /// Unknown named parameter.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Engine id has no processor.
    #[error("unknown engine: {0}")]
    UnknownEngine(u32),

    /// Configuration failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl TapeError {
    /// Create a preset-not-found error.
    pub fn preset_not_found(name: impl Into<String>) -> Self {
        TapeError::PresetNotFound(name.into())
    }

    /// Create an unknown-parameter error.
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        TapeError::UnknownParameter(name.into())
    }
}

/// Lowest sample rate the processors accept, in Hz.
///
/// The filters need a Nyquist band that still contains their 20 Hz floor;
/// anything slower is not an audio rate.
pub const MIN_SAMPLE_RATE: f32 = 1000.0;

/// Check a sample rate at the control boundary.
pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<f32, TapeError> {
    if sample_rate.is_finite() && sample_rate >= MIN_SAMPLE_RATE {
        Ok(sample_rate)
    } else {
        Err(TapeError::InvalidSampleRate(sample_rate))
    }
}
