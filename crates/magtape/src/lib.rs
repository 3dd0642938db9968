//! Magtape - real-time analog tape emulation
//!
//! Each sample runs through a fixed chain modelled on a tape machine:
//!
//! - bias offset and [`saturation`] (tube, solid state, transistor, digital
//!   or a custom curve)
//! - program-dependent [`compression`]
//! - head-bump, warmth and gap-loss [`frequency`] shaping
//! - [`harmonics`] (even and odd partials)
//! - wow and flutter ([`modulation`])
//! - hysteresis, print-through, hiss and dropouts ([`artifacts`])
//! - DC blocking and wet/dry mix
//!
//! The work is split across threads: a [`TapeProcessor`] lives on the audio
//! thread and never blocks, while any number of [`TapeController`] handles
//! publish configuration changes, load presets and read meters from
//! elsewhere. [`TapeRack`] hosts a master processor plus one processor per
//! synthesis engine.
//!
//! ## Example
//!
//! ```rust
//! use magtape::{TapeMachine, TapeProcessor};
//!
//! let mut tape = TapeProcessor::new(48000.0)?;
//! tape.set_machine(TapeMachine::VintageTube);
//! assert!(tape.load_preset("Vintage Tube Warmth"));
//!
//! let input: Vec<f32> = (0..256).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();
//! let mut output = vec![0.0; input.len()];
//! tape.process_block(&input, &mut output);
//!
//! let meters = tape.meters();
//! assert!(meters.output_level > 0.0);
//! # Ok::<(), magtape::TapeError>(())
//! ```

pub mod artifacts;
pub mod channel;
pub mod compression;
pub mod config;
pub mod controller;
pub mod error;
pub mod frequency;
pub mod harmonics;
pub mod modulation;
pub mod params;
pub mod presets;
pub mod processor;
pub mod rack;
pub mod saturation;
pub mod tables;
pub mod validation;

mod shared;

pub use artifacts::ArtifactStage;
pub use channel::TapeChannel;
pub use compression::CompressionStage;
pub use config::{TapeConfig, TapeMachine, TapeMaterial, TapeSpeed};
pub use controller::TapeController;
pub use error::{MIN_SAMPLE_RATE, TapeError};
pub use frequency::FrequencyStage;
pub use harmonics::HarmonicStage;
pub use modulation::ModulationStage;
pub use presets::{FACTORY_PRESET_NAMES, PresetRegistry};
pub use processor::TapeProcessor;
pub use rack::{EngineKind, RackParam, TapeRack};
pub use saturation::SaturationStage;
pub use shared::MeterSnapshot;
pub use tables::TapeTables;
pub use validation::{ValidationError, ValidationResult};

pub use magtape_core::{Effect, ParamDescriptor, ParameterInfo};
