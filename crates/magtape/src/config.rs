//! Tape configuration model.
//!
//! A [`TapeConfig`] is a plain value: the control path builds one, repairs it
//! with [`TapeConfig::sanitized`], and publishes it as an immutable snapshot.
//! The audio path only ever reads published snapshots.

use core::fmt;

/// Tape machine family; selects the saturation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TapeMachine {
    /// Tube electronics: soft tanh curve with even-harmonic bloom.
    #[default]
    VintageTube,
    /// Clean modern deck: linear up to a knee, gentle compression above it.
    ModernSolid,
    /// 70s/80s transistor deck: asymmetric knees and odd harmonics.
    VintageTransistor,
    /// Digital tape: hard clip with aliasing-like artifacts near full scale.
    ExoticDigital,
    /// Precomputed sigmoid table blended with the dry signal.
    Custom,
}

impl TapeMachine {
    /// Every machine, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::VintageTube,
        Self::ModernSolid,
        Self::VintageTransistor,
        Self::ExoticDigital,
        Self::Custom,
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::VintageTube => "Vintage Tube",
            Self::ModernSolid => "Modern Solid",
            Self::VintageTransistor => "Vintage Transistor",
            Self::ExoticDigital => "Exotic Digital",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for TapeMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tape formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TapeMaterial {
    /// Standard ferric oxide.
    #[default]
    TypeINormal,
    /// Chromium dioxide, high bias.
    TypeIIChrome,
    /// Dual-layer ferric/chrome.
    TypeIIIFerrichrome,
    /// Metal particle, high output.
    TypeIVMetal,
    /// Early acetate base.
    VintageAcetate,
}

impl TapeMaterial {
    /// Every material, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::TypeINormal,
        Self::TypeIIChrome,
        Self::TypeIIIFerrichrome,
        Self::TypeIVMetal,
        Self::VintageAcetate,
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypeINormal => "Type I (Normal)",
            Self::TypeIIChrome => "Type II (Chrome)",
            Self::TypeIIIFerrichrome => "Type III (Ferrichrome)",
            Self::TypeIVMetal => "Type IV (Metal)",
            Self::VintageAcetate => "Vintage Acetate",
        }
    }
}

impl fmt::Display for TapeMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transport speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TapeSpeed {
    /// 1⅞ ips.
    Ips1_875,
    /// 3¾ ips, cassette speed.
    Ips3_75,
    /// 7½ ips.
    #[default]
    Ips7_5,
    /// 15 ips.
    Ips15,
    /// 30 ips.
    Ips30,
}

impl TapeSpeed {
    /// Every speed, slowest first.
    pub const ALL: [Self; 5] = [
        Self::Ips1_875,
        Self::Ips3_75,
        Self::Ips7_5,
        Self::Ips15,
        Self::Ips30,
    ];

    /// Tape travel in inches per second.
    pub const fn inches_per_second(self) -> f32 {
        match self {
            Self::Ips1_875 => 1.875,
            Self::Ips3_75 => 3.75,
            Self::Ips7_5 => 7.5,
            Self::Ips15 => 15.0,
            Self::Ips30 => 30.0,
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ips1_875 => "1⅞ ips",
            Self::Ips3_75 => "3¾ ips",
            Self::Ips7_5 => "7½ ips",
            Self::Ips15 => "15 ips",
            Self::Ips30 => "30 ips",
        }
    }
}

impl fmt::Display for TapeSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete tape emulation settings.
///
/// Normalized fields live in `[0, 1]`. Ranges for the others are listed per
/// field; [`sanitized`](Self::sanitized) enforces all of them.
///
/// `transient_response`, `tape_width` and `head_gap` describe the modeled
/// machine but do not alter the signal path. `material` and `speed` likewise
/// only label the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TapeConfig {
    /// Saturation algorithm.
    pub machine: TapeMachine,
    /// Tape formulation.
    pub material: TapeMaterial,
    /// Transport speed.
    pub speed: TapeSpeed,

    // ── Saturation ──
    /// Drive into the saturation curve. 0 bypasses the stage.
    pub saturation_amount: f32,
    /// Positive/negative imbalance applied after the curve.
    pub saturation_asymmetry: f32,
    /// Level of the synthesized harmonic series. 0 bypasses the stage.
    pub harmonic_content: f32,
    /// Transient preservation.
    pub transient_response: f32,

    // ── Compression ──
    /// Compression depth; also lowers the threshold. 0 bypasses the stage.
    pub compression_amount: f32,
    /// Attack time, 0.01 to 1000 ms.
    pub attack_time_ms: f32,
    /// Release time, 0.01 to 5000 ms.
    pub release_time_ms: f32,
    /// Ratio above threshold, 1 to 100.
    pub compression_ratio: f32,
    /// Shorten attack and lengthen release on transients.
    pub program_dependent_timing: bool,

    // ── Frequency response ──
    /// Blend toward the 100 Hz low-pass (warmth).
    pub low_freq_boost: f32,
    /// Head rolloff; moves the low-pass corner from 8 kHz down to 5 kHz.
    pub high_freq_rolloff: f32,
    /// Level of the 2 kHz presence band added back.
    pub mid_freq_coloration: f32,
    /// DC bias fed into the saturation curve.
    pub bias_level: f32,

    // ── Modulation and artifacts ──
    /// Slow (0.5 Hz) speed variation.
    pub wow_amount: f32,
    /// Fast (6 Hz) speed variation.
    pub flutter_amount: f32,
    /// Hiss level in dB, -120 to 0. At or below -80 dB no noise is added.
    pub noise_floor_db: f32,
    /// Dropout events per second, 0 to 100.
    pub dropout_rate: f32,

    // ── Advanced ──
    /// Tape width in inches, 0.125 to 2.
    pub tape_width: f32,
    /// Playback head gap in micrometres, 0.1 to 10.
    pub head_gap: f32,
    /// Magnetic memory amount. 0 disables it.
    pub hysteresis: f32,
    /// Layer-to-layer bleed. 0 disables it.
    pub print_through: f32,

    /// Whether [`set_bypassed`](crate::TapeController::set_bypassed) is honoured.
    pub bypassable: bool,
    /// 0 = dry, 1 = fully processed.
    pub wet_dry_mix: f32,
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            machine: TapeMachine::VintageTube,
            material: TapeMaterial::TypeINormal,
            speed: TapeSpeed::Ips7_5,
            saturation_amount: 0.3,
            saturation_asymmetry: 0.1,
            harmonic_content: 0.2,
            transient_response: 0.7,
            compression_amount: 0.4,
            attack_time_ms: 5.0,
            release_time_ms: 100.0,
            compression_ratio: 3.0,
            program_dependent_timing: true,
            low_freq_boost: 0.2,
            high_freq_rolloff: 0.3,
            mid_freq_coloration: 0.1,
            bias_level: 0.5,
            wow_amount: 0.05,
            flutter_amount: 0.03,
            noise_floor_db: -60.0,
            dropout_rate: 0.001,
            tape_width: 0.25,
            head_gap: 2.5,
            hysteresis: 0.15,
            print_through: 0.02,
            bypassable: true,
            wet_dry_mix: 1.0,
        }
    }
}

impl TapeConfig {
    /// A configuration that leaves the signal untouched apart from the DC
    /// blocker: every stage amount at zero and the noise floor off.
    pub fn clean() -> Self {
        Self {
            saturation_amount: 0.0,
            saturation_asymmetry: 0.0,
            harmonic_content: 0.0,
            compression_amount: 0.0,
            low_freq_boost: 0.0,
            high_freq_rolloff: 0.0,
            mid_freq_coloration: 0.0,
            bias_level: 0.0,
            wow_amount: 0.0,
            flutter_amount: 0.0,
            noise_floor_db: -120.0,
            dropout_rate: 0.0,
            hysteresis: 0.0,
            print_through: 0.0,
            ..Self::default()
        }
    }

    /// Every ranged float field with its name and bounds, in declaration order.
    pub(crate) fn ranged_fields_mut(&mut self) -> [(&'static str, f32, f32, &mut f32); 21] {
        [
            ("saturation_amount", 0.0, 1.0, &mut self.saturation_amount),
            ("saturation_asymmetry", 0.0, 1.0, &mut self.saturation_asymmetry),
            ("harmonic_content", 0.0, 1.0, &mut self.harmonic_content),
            ("transient_response", 0.0, 1.0, &mut self.transient_response),
            ("compression_amount", 0.0, 1.0, &mut self.compression_amount),
            ("attack_time_ms", 0.01, 1000.0, &mut self.attack_time_ms),
            ("release_time_ms", 0.01, 5000.0, &mut self.release_time_ms),
            ("compression_ratio", 1.0, 100.0, &mut self.compression_ratio),
            ("low_freq_boost", 0.0, 1.0, &mut self.low_freq_boost),
            ("high_freq_rolloff", 0.0, 1.0, &mut self.high_freq_rolloff),
            ("mid_freq_coloration", 0.0, 1.0, &mut self.mid_freq_coloration),
            ("bias_level", 0.0, 1.0, &mut self.bias_level),
            ("wow_amount", 0.0, 1.0, &mut self.wow_amount),
            ("flutter_amount", 0.0, 1.0, &mut self.flutter_amount),
            ("noise_floor_db", -120.0, 0.0, &mut self.noise_floor_db),
            ("dropout_rate", 0.0, 100.0, &mut self.dropout_rate),
            ("tape_width", 0.125, 2.0, &mut self.tape_width),
            ("head_gap", 0.1, 10.0, &mut self.head_gap),
            ("hysteresis", 0.0, 1.0, &mut self.hysteresis),
            ("print_through", 0.0, 1.0, &mut self.print_through),
            ("wet_dry_mix", 0.0, 1.0, &mut self.wet_dry_mix),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_machine() {
        let cfg = TapeConfig::default();
        assert_eq!(cfg.machine, TapeMachine::VintageTube);
        assert_eq!(cfg.material, TapeMaterial::TypeINormal);
        assert_eq!(cfg.speed, TapeSpeed::Ips7_5);
        assert_eq!(cfg.saturation_amount, 0.3);
        assert_eq!(cfg.compression_ratio, 3.0);
        assert_eq!(cfg.noise_floor_db, -60.0);
        assert!(cfg.bypassable);
        assert_eq!(cfg.wet_dry_mix, 1.0);
    }

    #[test]
    fn display_names() {
        assert_eq!(TapeMachine::VintageTube.to_string(), "Vintage Tube");
        assert_eq!(TapeMaterial::TypeIIChrome.to_string(), "Type II (Chrome)");
        assert_eq!(TapeSpeed::Ips7_5.to_string(), "7½ ips");
        assert_eq!(TapeSpeed::Ips1_875.to_string(), "1⅞ ips");
    }

    #[test]
    fn speeds_ascend() {
        let ips: Vec<f32> = TapeSpeed::ALL.iter().map(|s| s.inches_per_second()).collect();
        assert!(ips.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(TapeSpeed::Ips15.inches_per_second(), 15.0);
    }

    #[test]
    fn clean_disables_stages() {
        let cfg = TapeConfig::clean();
        assert_eq!(cfg.saturation_amount, 0.0);
        assert_eq!(cfg.compression_amount, 0.0);
        assert!(cfg.noise_floor_db <= -80.0);
        assert_eq!(cfg.wet_dry_mix, 1.0);
    }

    #[test]
    fn default_fields_are_in_range() {
        let mut cfg = TapeConfig::default();
        for (name, min, max, value) in cfg.ranged_fields_mut() {
            assert!((min..=max).contains(&*value), "{name} = {value}");
        }
    }
}
