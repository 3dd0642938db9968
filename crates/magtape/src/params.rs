//! Performance-key parameter map.
//!
//! Sixteen parameters with the ranges a front panel exposes. Some ranges are
//! narrower than what [`TapeConfig`] accepts (wow tops out at 0.1, the
//! noise floor spans -80 to -40 dB); writes are clamped to the panel range.
//!
//! ## Parameter Indices (`ParameterInfo`)
//!
//! | Index | Name | Range | Default |
//! |-------|------|-------|---------|
//! | 0 | Saturation | 0–1 | 0.3 |
//! | 1 | Compression | 0–1 | 0.4 |
//! | 2 | Harmonics | 0–1 | 0.2 |
//! | 3 | Wet/Dry | 0–1 | 1.0 |
//! | 4 | Wow | 0–0.1 | 0.05 |
//! | 5 | Flutter | 0–0.1 | 0.03 |
//! | 6 | Noise Floor | -80–-40 dB | -60 |
//! | 7 | Bias | 0–1 | 0.5 |
//! | 8 | Low Boost | 0–0.5 | 0.2 |
//! | 9 | High Rolloff | 0–0.5 | 0.3 |
//! | 10 | Attack | 1–50 ms | 5 |
//! | 11 | Release | 50–500 ms | 100 |
//! | 12 | Ratio | 1–10 | 3 |
//! | 13 | Asymmetry | 0–0.5 | 0.1 |
//! | 14 | Hysteresis | 0–1 | 0.15 |
//! | 15 | Print-Through | 0–1 | 0.02 |

use magtape_core::{ParamDescriptor, ParamId, ParameterInfo};

use crate::{TapeConfig, TapeController};

/// Number of mapped parameters.
pub const PARAM_COUNT: usize = 16;

const ID_BASE: u32 = 1600;

/// Descriptor for parameter `index`.
pub fn descriptor(index: usize) -> Option<ParamDescriptor> {
    let desc = match index {
        0 => ParamDescriptor::amount("Saturation", "SAT AMT", 0.0, 1.0, 0.3),
        1 => ParamDescriptor::amount("Compression", "COMP AMT", 0.0, 1.0, 0.4),
        2 => ParamDescriptor::amount("Harmonics", "HARMONICS", 0.0, 1.0, 0.2),
        3 => ParamDescriptor::amount("Wet/Dry", "WET/DRY", 0.0, 1.0, 1.0),
        4 => ParamDescriptor::amount("Wow", "WOW", 0.0, 0.1, 0.05),
        5 => ParamDescriptor::amount("Flutter", "FLUTTER", 0.0, 0.1, 0.03),
        6 => ParamDescriptor::gain_db("Noise Floor", "NOISE", -80.0, -40.0, -60.0),
        7 => ParamDescriptor::amount("Bias", "BIAS", 0.0, 1.0, 0.5),
        8 => ParamDescriptor::amount("Low Boost", "LOW FREQ", 0.0, 0.5, 0.2),
        9 => ParamDescriptor::amount("High Rolloff", "HIGH FREQ", 0.0, 0.5, 0.3),
        10 => ParamDescriptor::time_ms("Attack", "ATTACK", 1.0, 50.0, 5.0),
        11 => ParamDescriptor::time_ms("Release", "RELEASE", 50.0, 500.0, 100.0),
        12 => ParamDescriptor::ratio("Ratio", "RATIO", 1.0, 10.0, 3.0),
        13 => ParamDescriptor::amount("Asymmetry", "ASYMM", 0.0, 0.5, 0.1),
        14 => ParamDescriptor::amount("Hysteresis", "HYSTER", 0.0, 1.0, 0.15),
        15 => ParamDescriptor::amount("Print-Through", "PRINT", 0.0, 1.0, 0.02),
        _ => return None,
    };
    Some(desc.with_id(ParamId(ID_BASE + index as u32), STRING_IDS[index]))
}

const STRING_IDS: [&str; PARAM_COUNT] = [
    "tape_sat",
    "tape_comp",
    "tape_harm",
    "tape_mix",
    "tape_wow",
    "tape_flutter",
    "tape_noise",
    "tape_bias",
    "tape_low",
    "tape_high",
    "tape_attack",
    "tape_release",
    "tape_ratio",
    "tape_asym",
    "tape_hyst",
    "tape_print",
];

/// Configuration field behind parameter `index`.
pub fn field_mut(cfg: &mut TapeConfig, index: usize) -> Option<&mut f32> {
    Some(match index {
        0 => &mut cfg.saturation_amount,
        1 => &mut cfg.compression_amount,
        2 => &mut cfg.harmonic_content,
        3 => &mut cfg.wet_dry_mix,
        4 => &mut cfg.wow_amount,
        5 => &mut cfg.flutter_amount,
        6 => &mut cfg.noise_floor_db,
        7 => &mut cfg.bias_level,
        8 => &mut cfg.low_freq_boost,
        9 => &mut cfg.high_freq_rolloff,
        10 => &mut cfg.attack_time_ms,
        11 => &mut cfg.release_time_ms,
        12 => &mut cfg.compression_ratio,
        13 => &mut cfg.saturation_asymmetry,
        14 => &mut cfg.hysteresis,
        15 => &mut cfg.print_through,
        _ => return None,
    })
}

impl ParameterInfo for TapeController {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        descriptor(index)
    }

    fn get_param(&self, index: usize) -> f32 {
        let mut cfg = self.config();
        field_mut(&mut cfg, index).map_or(0.0, |v| *v)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = descriptor(index) else {
            return;
        };
        let value = desc.clamp(value);
        self.update(|cfg| {
            if let Some(field) = field_mut(cfg, index) {
                *field = value;
            }
        });
    }
}
