//! Building blocks for the magtape processor.
//!
//! Everything here is sized at construction and runs without allocating,
//! so it can sit inside an audio callback. The crate builds without `std`
//! when the default feature is disabled; the optional `tracing` feature logs
//! filter retunes.
//!
//! | Type | Role in the tape chain |
//! |------|------------------------|
//! | [`Effect`] | per-sample contract shared with the processor |
//! | [`ParameterInfo`], [`ParamDescriptor`] | indexed panel parameters |
//! | [`StateVariableFilter`] | warmth, head rolloff and presence filters |
//! | [`OnePole`] | hysteresis, print-through and hiss tilt |
//! | [`DcBlocker`] | final offset removal |
//! | [`SmoothedParam`] | saturation slew |
//! | [`EnvelopeFollower`] | output level meter |
//! | [`FixedDelayLine`] | wow and flutter tap |
//! | [`LookupTable`] | saturation and harmonic curves |
//! | [`NoiseSource`] | hiss and dropout timing |
//!
//! ```rust
//! use magtape_core::{DcBlocker, Effect, StateVariableFilter, SvfOutput};
//!
//! let mut head = StateVariableFilter::tuned(48000.0, 6500.0, 0.707, SvfOutput::Lowpass);
//! let mut dc = DcBlocker::with_cutoff(48000.0, 38.0);
//!
//! let mut buffer = [0.3f32; 256];
//! for sample in &mut buffer {
//!     *sample = dc.process(head.process(*sample));
//! }
//! assert!(buffer.iter().all(|s| s.is_finite()));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod dc_blocker;
pub mod delay;
pub mod effect;
pub mod envelope;
pub mod lookup;
pub mod math;
pub mod noise;
pub mod one_pole;
pub mod param;
pub mod param_info;
pub mod svf;

pub use dc_blocker::DcBlocker;
pub use delay::FixedDelayLine;
pub use effect::Effect;
pub use envelope::EnvelopeFollower;
pub use lookup::LookupTable;
pub use math::{
    db_to_linear, finite_or, flush_denormal, linear_to_db, ms_to_samples, phase_increment,
    wet_dry_mix,
};
pub use noise::{DEFAULT_SEED, NoiseSource};
pub use one_pole::OnePole;
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
pub use svf::{StateVariableFilter, SvfOutput, resonance_to_q};
