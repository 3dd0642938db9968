//! Audio-thread tape processor.
//!
//! [`TapeProcessor`] owns the per-channel signal state and is driven from a
//! single audio callback. Configuration arrives through its
//! [`TapeController`]: at the top of every `process_*` call the processor
//! checks, wait-free, for a newly published snapshot and re-tunes its
//! filters when one is found. Nothing on the processing path locks,
//! allocates or logs.
//!
//! # Example
//!
//! ```rust
//! use magtape::{TapeMachine, TapeProcessor};
//!
//! let mut tape = TapeProcessor::new(48000.0).unwrap();
//! let controller = tape.controller().clone();
//!
//! // Control thread
//! controller.set_machine(TapeMachine::VintageTransistor);
//! controller.set_saturation_amount(0.6);
//!
//! // Audio thread
//! let input = [0.0, 0.25, 0.5, 0.25, 0.0, -0.25];
//! let mut output = [0.0; 6];
//! tape.process_block(&input, &mut output);
//! assert!(output.iter().all(|s| s.is_finite()));
//! ```

use std::sync::Arc;

use magtape_core::{DEFAULT_SEED, Effect};

use crate::channel::TapeChannel;
use crate::error::{TapeError, check_sample_rate};
use crate::shared::MeterSnapshot;
use crate::{TapeConfig, TapeController, TapeMachine, TapeMaterial, TapeSpeed, TapeTables};

/// Default sample rate for [`TapeProcessor::default`].
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// Noise seed for the right channel, so the two hiss streams decorrelate.
const RIGHT_SEED: u32 = 0x2545_F491;

/// Real-time tape emulation for one mono or stereo stream.
pub struct TapeProcessor {
    controller: TapeController,
    tables: Arc<TapeTables>,
    active: Arc<TapeConfig>,
    left: TapeChannel,
    right: TapeChannel,
    sample_rate: f32,
}

impl Default for TapeProcessor {
    fn default() -> Self {
        Self::build(
            DEFAULT_SAMPLE_RATE,
            TapeController::new(),
            Arc::new(TapeTables::new()),
        )
    }
}

impl core::fmt::Debug for TapeProcessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TapeProcessor")
            .field("sample_rate", &self.sample_rate)
            .field("config", &*self.active)
            .finish_non_exhaustive()
    }
}

impl TapeProcessor {
    /// Processor with the default configuration.
    pub fn new(sample_rate: f32) -> Result<Self, TapeError> {
        Self::with_config(sample_rate, TapeConfig::default())
    }

    /// Processor starting from `config` (sanitized).
    pub fn with_config(sample_rate: f32, config: TapeConfig) -> Result<Self, TapeError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        Ok(Self::build(
            sample_rate,
            TapeController::with_config(config),
            Arc::new(TapeTables::new()),
        ))
    }

    /// Processor attached to an existing controller and table set.
    ///
    /// `sample_rate` must already be validated.
    pub(crate) fn build(
        sample_rate: f32,
        controller: TapeController,
        tables: Arc<TapeTables>,
    ) -> Self {
        let active = controller.shared().load_full();
        Self {
            left: TapeChannel::new(sample_rate, &active, DEFAULT_SEED),
            right: TapeChannel::new(sample_rate, &active, RIGHT_SEED),
            controller,
            tables,
            active,
            sample_rate,
        }
    }

    /// Control handle. Clone it to drive this processor from another thread.
    pub fn controller(&self) -> &TapeController {
        &self.controller
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    // ── Audio path ───────────────────────────────────────────────────────────

    /// Adopt a newly published configuration, if any.
    #[inline]
    fn sync_config(&mut self) {
        if self.controller.shared().refresh(&mut self.active) {
            self.left.configure(&self.active);
            self.right.configure(&self.active);
        }
    }

    #[inline]
    fn bypassed(&self) -> bool {
        self.active.bypassable && self.controller.shared().bypass_requested()
    }

    fn publish_meters(&self, stereo: bool) {
        let l = &self.left;
        let mut meters = MeterSnapshot {
            saturation: l.saturation_activity(),
            gain_reduction_db: l.gain_reduction_db(),
            output_level: l.output_level(),
            dropouts: l.dropout_count(),
        };
        if stereo {
            let r = &self.right;
            meters.saturation = meters.saturation.max(r.saturation_activity());
            meters.gain_reduction_db = meters.gain_reduction_db.min(r.gain_reduction_db());
            meters.output_level = meters.output_level.max(r.output_level());
            meters.dropouts += r.dropout_count();
        }
        self.controller.shared().store_meters(&meters);
    }

    /// Process one mono sample.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        self.sync_config();
        if self.bypassed() {
            return input;
        }
        let out = self.left.process(input, &self.active, &self.tables);
        self.publish_meters(false);
        out
    }

    /// Process a mono block. Only `min(input.len(), output.len())` samples
    /// are written.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        self.sync_config();
        let n = input.len().min(output.len());
        if self.bypassed() {
            output[..n].copy_from_slice(&input[..n]);
            return;
        }
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.left.process(*inp, &self.active, &self.tables);
        }
        self.publish_meters(false);
    }

    /// Process a mono block in place.
    pub fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.sync_config();
        if self.bypassed() {
            return;
        }
        for sample in buffer.iter_mut() {
            *sample = self.left.process(*sample, &self.active, &self.tables);
        }
        self.publish_meters(false);
    }

    /// Process a stereo block with independent per-channel state.
    ///
    /// Only the shortest of the four slices' length is processed.
    pub fn process_stereo(
        &mut self,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        self.sync_config();
        let n = in_left
            .len()
            .min(in_right.len())
            .min(out_left.len())
            .min(out_right.len());
        if self.bypassed() {
            out_left[..n].copy_from_slice(&in_left[..n]);
            out_right[..n].copy_from_slice(&in_right[..n]);
            return;
        }
        for i in 0..n {
            out_left[i] = self.left.process(in_left[i], &self.active, &self.tables);
            out_right[i] = self.right.process(in_right[i], &self.active, &self.tables);
        }
        self.publish_meters(true);
    }

    /// Process a stereo block in place.
    pub fn process_stereo_inplace(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.sync_config();
        if self.bypassed() {
            return;
        }
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l = self.left.process(*l, &self.active, &self.tables);
            *r = self.right.process(*r, &self.active, &self.tables);
        }
        self.publish_meters(true);
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Change the sample rate, recompute every rate-dependent coefficient
    /// and [`reset`](Self::reset) all signal state. The next sample comes out
    /// exactly as it would from a new processor at `sample_rate`.
    ///
    /// Rejects non-finite rates and rates below
    /// [`MIN_SAMPLE_RATE`](crate::MIN_SAMPLE_RATE); the previous rate and
    /// state stay in effect.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), TapeError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        self.controller.shared().refresh(&mut self.active);
        self.left.set_sample_rate(sample_rate, &self.active);
        self.right.set_sample_rate(sample_rate, &self.active);
        self.sample_rate = sample_rate;
        self.reset();
        tracing::info!(sample_rate, "tape processor sample rate changed");
        Ok(())
    }

    /// Clear all signal state: delay lines, envelopes, filters, oscillator
    /// phases, noise generators and dropout counters. The configuration is
    /// kept.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.controller.shared().store_meters(&MeterSnapshot::default());
        tracing::debug!("tape processor reset");
    }

    // ── Control path (forwarded to the controller) ───────────────────────────

    /// Copy of the active configuration.
    pub fn config(&self) -> TapeConfig {
        self.controller.config()
    }

    /// Publish a new configuration (repaired if invalid).
    pub fn set_config(&self, config: TapeConfig) {
        self.controller.set_config(config);
    }

    /// Select the saturation algorithm.
    pub fn set_machine(&self, machine: TapeMachine) {
        self.controller.set_machine(machine);
    }

    /// Select the tape formulation.
    pub fn set_material(&self, material: TapeMaterial) {
        self.controller.set_material(material);
    }

    /// Select the transport speed.
    pub fn set_speed(&self, speed: TapeSpeed) {
        self.controller.set_speed(speed);
    }

    /// Saturation amount, clamped to `[0, 1]`.
    pub fn set_saturation_amount(&self, amount: f32) {
        self.controller.set_saturation_amount(amount);
    }

    /// Compression amount, clamped to `[0, 1]`.
    pub fn set_compression_amount(&self, amount: f32) {
        self.controller.set_compression_amount(amount);
    }

    /// Wet/dry mix, clamped to `[0, 1]`.
    pub fn set_wet_dry_mix(&self, mix: f32) {
        self.controller.set_wet_dry_mix(mix);
    }

    /// Request bypass. See [`TapeController::set_bypassed`].
    pub fn set_bypassed(&self, bypassed: bool) {
        self.controller.set_bypassed(bypassed);
    }

    /// `true` when input passes straight through.
    pub fn is_bypassed(&self) -> bool {
        self.controller.is_bypassed()
    }

    /// Load a preset; `false` if the name is unknown.
    pub fn load_preset(&self, name: &str) -> bool {
        self.controller.load_preset(name)
    }

    /// Store `config` under `name`.
    pub fn save_preset(&self, name: &str, config: TapeConfig) -> Result<(), TapeError> {
        self.controller.save_preset(name, config)
    }

    /// Registered preset names, sorted.
    pub fn available_presets(&self) -> Vec<String> {
        self.controller.available_presets()
    }

    /// Meters from the most recent processing call.
    pub fn meters(&self) -> MeterSnapshot {
        self.controller.meters()
    }

    /// |saturation output − input| of the most recent sample.
    pub fn saturation_amount(&self) -> f32 {
        self.controller.saturation_amount()
    }

    /// Most recent compressor gain change in dB.
    pub fn compression_reduction(&self) -> f32 {
        self.controller.compression_reduction()
    }

    /// Configured harmonic content.
    pub fn harmonic_content(&self) -> f32 {
        self.controller.harmonic_content()
    }

    /// Output peak level.
    pub fn output_level(&self) -> f32 {
        self.controller.output_level()
    }

    /// Dropouts since the last reset.
    pub fn dropout_count(&self) -> u64 {
        self.controller.dropout_count()
    }
}

impl Effect for TapeProcessor {
    fn process(&mut self, input: f32) -> f32 {
        self.process_sample(input)
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        TapeProcessor::process_block(self, input, output);
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        TapeProcessor::process_block_inplace(self, buffer);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if let Err(err) = TapeProcessor::set_sample_rate(self, sample_rate) {
            tracing::warn!(%err, "sample rate ignored");
        }
    }

    fn reset(&mut self) {
        TapeProcessor::reset(self);
    }
}
