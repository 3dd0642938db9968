//! Control-path handle.
//!
//! A [`TapeController`] is what a UI or preset loader holds. It is `Clone`,
//! `Send` and `Sync`; every clone talks to the same processor. Setters build
//! a complete new configuration and publish it in one step, so the audio
//! thread never observes a half-applied change.

use core::fmt;

use crate::error::TapeError;
use crate::presets::PresetRegistry;
use crate::shared::{MeterSnapshot, TapeShared};
use crate::{TapeConfig, TapeMachine, TapeMaterial, TapeSpeed};

/// Thread-safe control handle for a [`TapeProcessor`](crate::TapeProcessor).
///
/// # Example
///
/// ```rust
/// use magtape::{TapeController, TapeMachine};
///
/// let controller = TapeController::new();
/// controller.set_machine(TapeMachine::ModernSolid);
/// controller.set_wet_dry_mix(0.5);
/// assert!(controller.load_preset("Lo-Fi Character"));
/// assert!(!controller.load_preset("No Such Preset"));
/// assert_eq!(controller.config().machine, TapeMachine::VintageTransistor);
/// ```
#[derive(Clone)]
pub struct TapeController {
    shared: TapeShared,
}

impl Default for TapeController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TapeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapeController")
            .field("config", &self.config())
            .field("bypassed", &self.is_bypassed())
            .finish_non_exhaustive()
    }
}

/// Clamp to `[min, max]`; NaN keeps `current`.
fn clamp_or(value: f32, min: f32, max: f32, current: f32) -> f32 {
    if value.is_nan() {
        current
    } else {
        value.clamp(min, max)
    }
}

impl TapeController {
    /// Default configuration with the factory presets registered.
    pub fn new() -> Self {
        Self::with_config(TapeConfig::default())
    }

    /// Start from `config` (sanitized) with the factory presets registered.
    pub fn with_config(config: TapeConfig) -> Self {
        Self {
            shared: TapeShared::new(config.sanitized(), PresetRegistry::with_factory_presets()),
        }
    }

    pub(crate) fn shared(&self) -> &TapeShared {
        &self.shared
    }

    // ── Configuration ────────────────────────────────────────────────────────

    /// Copy of the active configuration.
    pub fn config(&self) -> TapeConfig {
        self.shared.config()
    }

    /// Publish `config`, repairing any out-of-range or non-finite fields.
    pub fn set_config(&self, config: TapeConfig) {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "repairing tape configuration");
        }
        self.shared.publish(config.sanitized());
        tracing::debug!("tape configuration published");
    }

    /// Publish `config` only if it validates.
    pub fn try_set_config(&self, config: TapeConfig) -> Result<(), TapeError> {
        config.validate()?;
        self.shared.publish(config);
        tracing::debug!("tape configuration published");
        Ok(())
    }

    /// Apply `f` to a copy of the active configuration and publish the
    /// sanitized result. Returns what was published.
    pub fn update(&self, f: impl FnOnce(&mut TapeConfig)) -> TapeConfig {
        self.shared.update(|cfg| {
            f(cfg);
            *cfg = cfg.sanitized();
        })
    }

    /// Select the saturation algorithm.
    pub fn set_machine(&self, machine: TapeMachine) {
        self.shared.update(|cfg| cfg.machine = machine);
    }

    /// Select the tape formulation.
    pub fn set_material(&self, material: TapeMaterial) {
        self.shared.update(|cfg| cfg.material = material);
    }

    /// Select the transport speed.
    pub fn set_speed(&self, speed: TapeSpeed) {
        self.shared.update(|cfg| cfg.speed = speed);
    }

    /// Saturation amount, clamped to `[0, 1]`.
    pub fn set_saturation_amount(&self, amount: f32) {
        self.shared.update(|cfg| {
            cfg.saturation_amount = clamp_or(amount, 0.0, 1.0, cfg.saturation_amount);
        });
    }

    /// Compression amount, clamped to `[0, 1]`.
    pub fn set_compression_amount(&self, amount: f32) {
        self.shared.update(|cfg| {
            cfg.compression_amount = clamp_or(amount, 0.0, 1.0, cfg.compression_amount);
        });
    }

    /// Wet/dry mix, clamped to `[0, 1]`.
    pub fn set_wet_dry_mix(&self, mix: f32) {
        self.shared.update(|cfg| {
            cfg.wet_dry_mix = clamp_or(mix, 0.0, 1.0, cfg.wet_dry_mix);
        });
    }

    // ── Bypass ───────────────────────────────────────────────────────────────

    /// Request bypass.
    ///
    /// The request is stored either way, but it only takes effect while the
    /// active configuration has `bypassable` set.
    pub fn set_bypassed(&self, bypassed: bool) {
        if bypassed && !self.config().bypassable {
            tracing::debug!("bypass requested but configuration is not bypassable");
        }
        self.shared.set_bypass_requested(bypassed);
    }

    /// `true` when the processor is passing input straight through.
    pub fn is_bypassed(&self) -> bool {
        self.shared.bypass_requested() && self.config().bypassable
    }

    // ── Presets ──────────────────────────────────────────────────────────────

    /// Load a preset, reporting whether it existed. Unknown names leave the
    /// configuration unchanged.
    pub fn load_preset(&self, name: &str) -> bool {
        match self.try_load_preset(name) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "preset not loaded");
                false
            }
        }
    }

    /// Load a preset by name.
    pub fn try_load_preset(&self, name: &str) -> Result<(), TapeError> {
        let config = self
            .shared
            .presets()
            .get(name)
            .ok_or_else(|| TapeError::preset_not_found(name))?;
        self.shared.publish(config);
        tracing::info!(preset = name, "preset loaded");
        Ok(())
    }

    /// Store `config` under `name`, replacing any existing preset.
    pub fn save_preset(&self, name: &str, config: TapeConfig) -> Result<(), TapeError> {
        self.shared.presets().insert(name, config)?;
        tracing::info!(preset = name.trim(), "preset saved");
        Ok(())
    }

    /// Remove a preset. Returns `true` if it existed.
    pub fn remove_preset(&self, name: &str) -> bool {
        self.shared.presets().remove(name)
    }

    /// `true` if a preset is registered under `name`.
    pub fn has_preset(&self, name: &str) -> bool {
        self.shared.presets().contains(name)
    }

    /// Registered preset names, sorted.
    pub fn available_presets(&self) -> Vec<String> {
        self.shared.presets().names()
    }

    // ── Meters ───────────────────────────────────────────────────────────────

    /// All meters from the most recent processing call.
    pub fn meters(&self) -> MeterSnapshot {
        self.shared.meters()
    }

    /// |saturation output − input| of the most recent sample.
    pub fn saturation_amount(&self) -> f32 {
        self.meters().saturation
    }

    /// Most recent compressor gain change in dB (0 or negative).
    pub fn compression_reduction(&self) -> f32 {
        self.meters().gain_reduction_db
    }

    /// Configured harmonic content.
    pub fn harmonic_content(&self) -> f32 {
        self.config().harmonic_content
    }

    /// Output peak level.
    pub fn output_level(&self) -> f32 {
        self.meters().output_level
    }

    /// Dropouts since the processor was last reset.
    pub fn dropout_count(&self) -> u64 {
        self.meters().dropouts
    }
}
