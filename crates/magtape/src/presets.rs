//! Named tape configurations.
//!
//! The registry starts with the factory presets and accepts user entries on
//! the control path. Names are unique; saving over an existing name replaces
//! it.

use std::collections::BTreeMap;

use crate::error::TapeError;
use crate::{TapeConfig, TapeMachine, TapeMaterial, TapeSpeed};

/// Factory preset names.
pub static FACTORY_PRESET_NAMES: &[&str] =
    &["Vintage Tube Warmth", "Modern Clean", "Lo-Fi Character"];

/// Tube deck on normal-bias tape at 7½ ips.
pub fn vintage_tube_warmth() -> TapeConfig {
    TapeConfig {
        machine: TapeMachine::VintageTube,
        material: TapeMaterial::TypeINormal,
        speed: TapeSpeed::Ips7_5,
        saturation_amount: 0.3,
        compression_amount: 0.4,
        harmonic_content: 0.25,
        low_freq_boost: 0.3,
        ..TapeConfig::default()
    }
}

/// Solid-state deck on chrome tape at 15 ips.
pub fn modern_clean() -> TapeConfig {
    TapeConfig {
        machine: TapeMachine::ModernSolid,
        material: TapeMaterial::TypeIIChrome,
        speed: TapeSpeed::Ips15,
        saturation_amount: 0.1,
        compression_amount: 0.2,
        harmonic_content: 0.1,
        ..TapeConfig::default()
    }
}

/// Worn transistor deck on acetate at 1⅞ ips, with audible hiss, wobble and
/// frequent dropouts.
pub fn lo_fi_character() -> TapeConfig {
    TapeConfig {
        machine: TapeMachine::VintageTransistor,
        material: TapeMaterial::VintageAcetate,
        speed: TapeSpeed::Ips1_875,
        saturation_amount: 0.6,
        compression_amount: 0.7,
        harmonic_content: 0.4,
        wow_amount: 0.1,
        flutter_amount: 0.08,
        noise_floor_db: -45.0,
        dropout_rate: 1.5,
        ..TapeConfig::default()
    }
}

/// Look up a factory preset by name.
pub fn factory_preset(name: &str) -> Option<TapeConfig> {
    match name {
        "Vintage Tube Warmth" => Some(vintage_tube_warmth()),
        "Modern Clean" => Some(modern_clean()),
        "Lo-Fi Character" => Some(lo_fi_character()),
        _ => None,
    }
}

/// Name → configuration map.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: BTreeMap<String, TapeConfig>,
}

impl PresetRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the factory presets.
    pub fn with_factory_presets() -> Self {
        let presets = FACTORY_PRESET_NAMES
            .iter()
            .filter_map(|&name| factory_preset(name).map(|cfg| (name.to_string(), cfg)))
            .collect();
        Self { presets }
    }

    /// Configuration stored under `name`. Names are trimmed as on insert.
    pub fn get(&self, name: &str) -> Option<TapeConfig> {
        self.presets.get(name.trim()).copied()
    }

    /// Store `config` (sanitized) under `name`, replacing any previous entry.
    ///
    /// Names are trimmed; an empty name is rejected.
    pub fn insert(&mut self, name: &str, config: TapeConfig) -> Result<(), TapeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TapeError::InvalidPresetName);
        }
        self.presets.insert(name.to_string(), config.sanitized());
        Ok(())
    }

    /// Remove `name`. Returns `true` if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.presets.remove(name.trim()).is_some()
    }

    /// `true` if `name` (trimmed) is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name.trim())
    }

    /// All names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// `true` when no presets are registered.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
