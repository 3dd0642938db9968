//! Multi-instance tape rack.
//!
//! A [`TapeRack`] runs one master [`TapeProcessor`] for the mix bus plus a
//! processor per synthesis engine, created on demand. Each engine starts
//! from a configuration suited to its sound source (tube warmth for analog
//! models, digital grit for FM and granular, clean metal tape for
//! wavetables, transistor punch for drums).
//!
//! Named parameters (`tape_saturation`, `tape_wow`, ...) take normalized
//! values in `[0, 1]` and are applied to every instance.
//!
//! The rack is owned by the audio thread like a single processor; control
//! calls that create engines allocate and must not run inside the audio
//! callback.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{TapeError, check_sample_rate};
use crate::processor::DEFAULT_SAMPLE_RATE;
use crate::{
    TapeConfig, TapeController, TapeMachine, TapeMaterial, TapeProcessor, TapeSpeed, TapeTables,
};

/// Synthesis engines a rack can host, by engine id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum EngineKind {
    /// Virtual-analog macro oscillator.
    MacroVa = 0,
    /// FM macro oscillator.
    MacroFm = 1,
    /// Additive harmonics macro oscillator.
    MacroHarmonics = 2,
    /// Wavetable macro oscillator.
    MacroWavetable = 3,
    /// Waveshaping macro oscillator.
    MacroWaveshaping = 4,
    /// Twin-T resonant oscillator.
    MacroTwinT = 5,
    /// Plucked-string model.
    MacroString = 6,
    /// Modal resonator.
    ModalResonator = 7,
    /// Analog percussion voice.
    AnalogPercussion = 8,
    /// Analog snare.
    AnalogSnare = 9,
    /// Analog kick.
    AnalogKick = 10,
    /// Digital percussion voice.
    DigitalPercussion = 11,
    /// Speech synthesizer.
    SpeechSynthesis = 12,
    /// Granular processor.
    GranularProcessor = 13,
}

impl EngineKind {
    /// Every engine in id order.
    pub const ALL: [Self; 14] = [
        Self::MacroVa,
        Self::MacroFm,
        Self::MacroHarmonics,
        Self::MacroWavetable,
        Self::MacroWaveshaping,
        Self::MacroTwinT,
        Self::MacroString,
        Self::ModalResonator,
        Self::AnalogPercussion,
        Self::AnalogSnare,
        Self::AnalogKick,
        Self::DigitalPercussion,
        Self::SpeechSynthesis,
        Self::GranularProcessor,
    ];

    /// Engine for `id`, if known.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Numeric engine id.
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Machine an engine's processor starts with.
    pub const fn default_machine(self) -> TapeMachine {
        match self {
            Self::MacroVa
            | Self::MacroWaveshaping
            | Self::MacroTwinT
            | Self::MacroString
            | Self::ModalResonator => TapeMachine::VintageTube,
            Self::MacroFm | Self::SpeechSynthesis | Self::GranularProcessor => {
                TapeMachine::ExoticDigital
            }
            Self::MacroHarmonics | Self::MacroWavetable => TapeMachine::ModernSolid,
            Self::AnalogPercussion
            | Self::AnalogSnare
            | Self::AnalogKick
            | Self::DigitalPercussion => TapeMachine::VintageTransistor,
        }
    }

    /// Material an engine's processor starts with.
    pub const fn default_material(self) -> TapeMaterial {
        match self.default_machine() {
            TapeMachine::VintageTube | TapeMachine::Custom => TapeMaterial::TypeINormal,
            TapeMachine::ExoticDigital => TapeMaterial::TypeIIChrome,
            TapeMachine::ModernSolid => TapeMaterial::TypeIVMetal,
            TapeMachine::VintageTransistor => TapeMaterial::TypeIIIFerrichrome,
        }
    }

    /// Starting configuration for this engine.
    pub fn default_config(self) -> TapeConfig {
        TapeConfig {
            machine: self.default_machine(),
            material: self.default_material(),
            ..TapeConfig::default()
        }
    }
}

/// Rack-wide named parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RackParam {
    /// Saturation amount.
    Saturation,
    /// Compression amount.
    Compression,
    /// Low-frequency boost.
    Warmth,
    /// Wow depth.
    Wow,
    /// Flutter depth.
    Flutter,
    /// Noise floor, -80 dB (off) to -40 dB.
    Noise,
    /// Bias offset.
    Bias,
    /// Hysteresis amount.
    Hysteresis,
    /// Transport speed, stepped across [`TapeSpeed::ALL`].
    Speed,
    /// Tape formulation, stepped across [`TapeMaterial::ALL`].
    Material,
    /// Wet/dry mix.
    Mix,
    /// Global bypass (on at 0.5 and above).
    Bypass,
}

const RACK_PARAM_COUNT: usize = 12;

impl RackParam {
    /// Every parameter.
    pub const ALL: [Self; RACK_PARAM_COUNT] = [
        Self::Saturation,
        Self::Compression,
        Self::Warmth,
        Self::Wow,
        Self::Flutter,
        Self::Noise,
        Self::Bias,
        Self::Hysteresis,
        Self::Speed,
        Self::Material,
        Self::Mix,
        Self::Bypass,
    ];

    /// Name this parameter is registered under by default.
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Saturation => "tape_saturation",
            Self::Compression => "tape_compression",
            Self::Warmth => "tape_warmth",
            Self::Wow => "tape_wow",
            Self::Flutter => "tape_flutter",
            Self::Noise => "tape_noise",
            Self::Bias => "tape_bias",
            Self::Hysteresis => "tape_hysteresis",
            Self::Speed => "tape_speed",
            Self::Material => "tape_material",
            Self::Mix => "tape_mix",
            Self::Bypass => "tape_bypass",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Write normalized `value` into `cfg`. Bypass lives on the rack, not
    /// in the configuration.
    fn apply(self, cfg: &mut TapeConfig, value: f32) {
        match self {
            Self::Saturation => cfg.saturation_amount = value,
            Self::Compression => cfg.compression_amount = value,
            Self::Warmth => cfg.low_freq_boost = value,
            Self::Wow => cfg.wow_amount = value,
            Self::Flutter => cfg.flutter_amount = value,
            Self::Noise => cfg.noise_floor_db = -80.0 + value * 40.0,
            Self::Bias => cfg.bias_level = value,
            Self::Hysteresis => cfg.hysteresis = value,
            Self::Speed => cfg.speed = TapeSpeed::ALL[step(value, TapeSpeed::ALL.len())],
            Self::Material => {
                cfg.material = TapeMaterial::ALL[step(value, TapeMaterial::ALL.len())];
            }
            Self::Mix => cfg.wet_dry_mix = value,
            Self::Bypass => {}
        }
    }
}

/// Map `[0, 1]` onto `0..count`.
fn step(value: f32, count: usize) -> usize {
    let max = count.saturating_sub(1);
    ((value * max as f32).round() as usize).min(max)
}

#[derive(Debug)]
struct EngineSlot {
    processor: TapeProcessor,
    enabled: bool,
}

/// Master plus per-engine tape processors at one sample rate.
#[derive(Debug)]
pub struct TapeRack {
    sample_rate: f32,
    tables: Arc<TapeTables>,
    master: TapeProcessor,
    engines: BTreeMap<u32, EngineSlot>,
    globally_bypassed: bool,
    names: BTreeMap<String, RackParam>,
    /// Normalized values set through the named-parameter map.
    values: [Option<f32>; RACK_PARAM_COUNT],
}

impl Default for TapeRack {
    fn default() -> Self {
        Self::build(DEFAULT_SAMPLE_RATE)
    }
}

impl TapeRack {
    /// Rack at `sample_rate` with no engine processors yet.
    pub fn new(sample_rate: f32) -> Result<Self, TapeError> {
        check_sample_rate(sample_rate).map(Self::build)
    }

    fn build(sample_rate: f32) -> Self {
        let tables = Arc::new(TapeTables::new());
        Self {
            sample_rate,
            master: TapeProcessor::build(sample_rate, TapeController::new(), Arc::clone(&tables)),
            tables,
            engines: BTreeMap::new(),
            globally_bypassed: false,
            names: RackParam::ALL
                .iter()
                .map(|&p| (p.default_name().to_string(), p))
                .collect(),
            values: [None; RACK_PARAM_COUNT],
        }
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Master processor.
    pub fn master(&self) -> &TapeProcessor {
        &self.master
    }

    /// Processor for `engine_id`, if created.
    pub fn engine(&self, engine_id: u32) -> Option<&TapeProcessor> {
        self.engines.get(&engine_id).map(|slot| &slot.processor)
    }

    /// Ids with a processor, ascending.
    pub fn engine_ids(&self) -> Vec<u32> {
        self.engines.keys().copied().collect()
    }

    /// Create the processor for `engine_id` if it does not exist yet.
    ///
    /// New processors start from the engine's default configuration with
    /// any named parameters already set on the rack applied on top.
    pub fn ensure_engine(&mut self, engine_id: u32) -> Result<&TapeController, TapeError> {
        let kind = EngineKind::from_id(engine_id).ok_or(TapeError::UnknownEngine(engine_id))?;
        if !self.engines.contains_key(&engine_id) {
            let mut config = kind.default_config();
            for param in RackParam::ALL {
                if let Some(value) = self.values[param.index()] {
                    param.apply(&mut config, value);
                }
            }
            let processor = TapeProcessor::build(
                self.sample_rate,
                TapeController::with_config(config),
                Arc::clone(&self.tables),
            );
            tracing::debug!(engine_id, ?kind, machine = %config.machine, "engine tape processor created");
            self.engines.insert(
                engine_id,
                EngineSlot {
                    processor,
                    enabled: true,
                },
            );
        }
        self.engines
            .get(&engine_id)
            .map(|slot| slot.processor.controller())
            .ok_or(TapeError::UnknownEngine(engine_id))
    }

    // ── Audio path ───────────────────────────────────────────────────────────

    fn active_engine(&mut self, engine_id: u32) -> Option<&mut TapeProcessor> {
        if self.globally_bypassed {
            return None;
        }
        self.engines
            .get_mut(&engine_id)
            .filter(|slot| slot.enabled)
            .map(|slot| &mut slot.processor)
    }

    /// Process one engine sample. Identity for unknown, disabled or bypassed
    /// engines.
    #[inline]
    pub fn process_engine(&mut self, engine_id: u32, input: f32) -> f32 {
        match self.active_engine(engine_id) {
            Some(p) => p.process_sample(input),
            None => input,
        }
    }

    /// Process a mono engine block.
    pub fn process_engine_block(&mut self, engine_id: u32, input: &[f32], output: &mut [f32]) {
        match self.active_engine(engine_id) {
            Some(p) => p.process_block(input, output),
            None => copy_through(input, output),
        }
    }

    /// Process a stereo engine block.
    pub fn process_engine_stereo(
        &mut self,
        engine_id: u32,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        match self.active_engine(engine_id) {
            Some(p) => p.process_stereo(in_left, in_right, out_left, out_right),
            None => {
                copy_through(in_left, out_left);
                copy_through(in_right, out_right);
            }
        }
    }

    /// Process one master sample.
    #[inline]
    pub fn process_master(&mut self, input: f32) -> f32 {
        if self.globally_bypassed {
            return input;
        }
        self.master.process_sample(input)
    }

    /// Process a mono master block.
    pub fn process_master_block(&mut self, input: &[f32], output: &mut [f32]) {
        if self.globally_bypassed {
            copy_through(input, output);
            return;
        }
        self.master.process_block(input, output);
    }

    /// Process a stereo master block.
    pub fn process_master_stereo(
        &mut self,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        if self.globally_bypassed {
            copy_through(in_left, out_left);
            copy_through(in_right, out_right);
            return;
        }
        self.master
            .process_stereo(in_left, in_right, out_left, out_right);
    }

    // ── Engine control ───────────────────────────────────────────────────────

    /// Publish `config` to an engine, creating its processor if needed.
    pub fn set_engine_config(&mut self, engine_id: u32, config: TapeConfig) -> Result<(), TapeError> {
        self.ensure_engine(engine_id)?.set_config(config);
        Ok(())
    }

    /// Active configuration of an engine, if it has a processor.
    pub fn engine_config(&self, engine_id: u32) -> Option<TapeConfig> {
        self.engine(engine_id).map(TapeProcessor::config)
    }

    /// Select an engine's saturation algorithm.
    pub fn set_engine_machine(&mut self, engine_id: u32, machine: TapeMachine) -> Result<(), TapeError> {
        self.ensure_engine(engine_id)?.set_machine(machine);
        Ok(())
    }

    /// Select an engine's tape formulation.
    pub fn set_engine_material(
        &mut self,
        engine_id: u32,
        material: TapeMaterial,
    ) -> Result<(), TapeError> {
        self.ensure_engine(engine_id)?.set_material(material);
        Ok(())
    }

    /// Enable or disable tape processing on an engine.
    pub fn enable_engine(&mut self, engine_id: u32, enabled: bool) -> Result<(), TapeError> {
        self.ensure_engine(engine_id)?;
        if let Some(slot) = self.engines.get_mut(&engine_id) {
            slot.enabled = enabled;
        }
        Ok(())
    }

    /// `true` if the engine has a processor and it is enabled.
    pub fn is_engine_enabled(&self, engine_id: u32) -> bool {
        self.engines.get(&engine_id).is_some_and(|slot| slot.enabled)
    }

    /// Clear an engine's signal state.
    pub fn reset_engine(&mut self, engine_id: u32) -> Result<(), TapeError> {
        let slot = self
            .engines
            .get_mut(&engine_id)
            .ok_or(TapeError::UnknownEngine(engine_id))?;
        slot.processor.reset();
        Ok(())
    }

    /// Clear the signal state of the master and every engine.
    pub fn reset_all(&mut self) {
        self.master.reset();
        for slot in self.engines.values_mut() {
            slot.processor.reset();
        }
    }

    // ── Master and global control ────────────────────────────────────────────

    /// Publish the master configuration.
    pub fn set_master_config(&self, config: TapeConfig) {
        self.master.set_config(config);
    }

    /// Active master configuration.
    pub fn master_config(&self) -> TapeConfig {
        self.master.config()
    }

    /// Master wet/dry mix, clamped to `[0, 1]`.
    pub fn set_master_wet_dry_mix(&self, mix: f32) {
        self.master.set_wet_dry_mix(mix);
    }

    /// Bypass the whole rack.
    pub fn set_global_bypass(&mut self, bypassed: bool) {
        self.globally_bypassed = bypassed;
        tracing::debug!(bypassed, "tape rack global bypass");
    }

    /// `true` while the whole rack is bypassed.
    pub fn is_globally_bypassed(&self) -> bool {
        self.globally_bypassed
    }

    /// Change the sample rate of every processor, resetting their signal
    /// state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), TapeError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        self.master.set_sample_rate(sample_rate)?;
        for slot in self.engines.values_mut() {
            slot.processor.set_sample_rate(sample_rate)?;
        }
        self.sample_rate = sample_rate;
        Ok(())
    }

    // ── Named parameters ─────────────────────────────────────────────────────

    /// Register `name` as an alias for `param`.
    pub fn map_parameter(&mut self, name: &str, param: RackParam) {
        self.names.insert(name.to_string(), param);
    }

    /// Parameter registered under `name`.
    pub fn resolve_parameter(&self, name: &str) -> Option<RackParam> {
        self.names.get(name).copied()
    }

    /// Set a named parameter from a normalized value in `[0, 1]` on the
    /// master and every engine.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), TapeError> {
        let param = self
            .resolve_parameter(name)
            .ok_or_else(|| TapeError::unknown_parameter(name))?;
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.values[param.index()] = Some(value);

        if param == RackParam::Bypass {
            self.set_global_bypass(value >= 0.5);
            return Ok(());
        }

        let controllers = core::iter::once(self.master.controller())
            .chain(self.engines.values().map(|slot| slot.processor.controller()));
        for controller in controllers {
            controller.update(|cfg| {
                param.apply(cfg, value);
            });
        }
        tracing::debug!(name, value, "tape rack parameter set");
        Ok(())
    }

    /// Normalized value last set for a named parameter.
    ///
    /// Parameters never set read back the master's current value.
    pub fn parameter(&self, name: &str) -> Result<f32, TapeError> {
        let param = self
            .resolve_parameter(name)
            .ok_or_else(|| TapeError::unknown_parameter(name))?;
        if let Some(value) = self.values[param.index()] {
            return Ok(value);
        }
        let cfg = self.master.config();
        let ratio = |i: usize, n: usize| i as f32 / (n - 1) as f32;
        Ok(match param {
            RackParam::Saturation => cfg.saturation_amount,
            RackParam::Compression => cfg.compression_amount,
            RackParam::Warmth => cfg.low_freq_boost,
            RackParam::Wow => cfg.wow_amount,
            RackParam::Flutter => cfg.flutter_amount,
            RackParam::Noise => ((cfg.noise_floor_db + 80.0) / 40.0).clamp(0.0, 1.0),
            RackParam::Bias => cfg.bias_level,
            RackParam::Hysteresis => cfg.hysteresis,
            RackParam::Speed => {
                let i = TapeSpeed::ALL.iter().position(|&s| s == cfg.speed).unwrap_or(0);
                ratio(i, TapeSpeed::ALL.len())
            }
            RackParam::Material => {
                let i = TapeMaterial::ALL
                    .iter()
                    .position(|&m| m == cfg.material)
                    .unwrap_or(0);
                ratio(i, TapeMaterial::ALL.len())
            }
            RackParam::Mix => cfg.wet_dry_mix,
            RackParam::Bypass => {
                if self.globally_bypassed {
                    1.0
                } else {
                    0.0
                }
            }
        })
    }
}

fn copy_through(input: &[f32], output: &mut [f32]) {
    let n = input.len().min(output.len());
    output[..n].copy_from_slice(&input[..n]);
}
