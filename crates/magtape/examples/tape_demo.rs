//! Demonstration of the tape processor
//!
//! Renders a 440 Hz tone through each factory preset, then drives a
//! processor from a control thread while the main thread plays audio.
//!
//! Run with: cargo run --example tape_demo

use std::thread;

use magtape::{TapeMachine, TapeProcessor};

const SAMPLE_RATE: f32 = 48000.0;

fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

fn main() -> Result<(), magtape::TapeError> {
    println!("Magtape Demo");
    println!("============\n");

    let test_signal: Vec<f32> = (0..4800)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.8
        })
        .collect();

    // 1. Factory presets
    println!("1. Factory Presets");
    println!("------------------");

    let mut tape = TapeProcessor::new(SAMPLE_RATE)?;
    let mut output = vec![0.0; test_signal.len()];
    for name in tape.available_presets() {
        tape.reset();
        tape.controller().try_load_preset(&name)?;
        tape.process_block(&test_signal, &mut output);
        let meters = tape.meters();
        println!(
            "  {name:<22} peak {:.3}  gr {:>6.2} dB  level {:.3}",
            peak(&output),
            meters.gain_reduction_db,
            meters.output_level,
        );
    }

    // 2. Machines
    println!("\n2. Machines at full drive");
    println!("-------------------------");

    for machine in TapeMachine::ALL {
        let mut tape = TapeProcessor::new(SAMPLE_RATE)?;
        tape.set_machine(machine);
        tape.set_saturation_amount(1.0);
        tape.process_block(&test_signal, &mut output);
        println!(
            "  {:<20} peak {:.3}  saturation {:.4}",
            machine.to_string(),
            peak(&output),
            tape.saturation_amount()
        );
    }

    // 3. Cross-thread control
    println!("\n3. Control thread");
    println!("-----------------");

    let mut tape = TapeProcessor::new(SAMPLE_RATE)?;
    let controller = tape.controller().clone();
    let control = thread::spawn(move || {
        for step in 0..=10 {
            controller.set_wet_dry_mix(step as f32 / 10.0);
        }
    });

    let mut block = vec![0.0; 480];
    for chunk in test_signal.chunks(480) {
        tape.process_block(chunk, &mut block[..chunk.len()]);
    }
    let _ = control.join();
    println!("  final mix {:.1}", tape.config().wet_dry_mix);

    Ok(())
}
