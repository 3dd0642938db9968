//! Criterion benchmarks for the tape processor
//!
//! Run with: cargo bench -p magtape
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use magtape::{TapeConfig, TapeMachine, TapeProcessor, TapeRack};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_machines(c: &mut Criterion) {
    let mut group = c.benchmark_group("TapeProcessor/mono");

    for machine in TapeMachine::ALL {
        let mut tape = TapeProcessor::default();
        tape.set_machine(machine);
        let input = generate_test_signal(512);
        let mut output = vec![0.0; 512];

        group.bench_function(BenchmarkId::from_parameter(machine.name()), |b| {
            b.iter(|| {
                tape.process_block(black_box(&input), &mut output);
                black_box(output[0])
            })
        });
    }

    group.finish();
}

fn bench_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("TapeProcessor/stereo");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        let mut tape = TapeProcessor::default();
        tape.load_preset("Lo-Fi Character");

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut out_l = vec![0.0; block_size];
                let mut out_r = vec![0.0; block_size];
                b.iter(|| {
                    tape.process_stereo(
                        black_box(&input),
                        black_box(&input),
                        &mut out_l,
                        &mut out_r,
                    );
                    black_box(out_l[0] + out_r[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_clean_path(c: &mut Criterion) {
    let mut tape = TapeProcessor::with_config(SAMPLE_RATE, TapeConfig::clean()).unwrap();
    let input = generate_test_signal(512);
    let mut output = vec![0.0; 512];

    c.bench_function("TapeProcessor/clean", |b| {
        b.iter(|| {
            tape.process_block(black_box(&input), &mut output);
            black_box(output[0])
        })
    });
}

fn bench_config_publish(c: &mut Criterion) {
    let mut tape = TapeProcessor::default();
    let controller = tape.controller().clone();
    let input = generate_test_signal(64);
    let mut output = vec![0.0; 64];
    let mut amount = 0.0f32;

    c.bench_function("TapeProcessor/publish_then_process_64", |b| {
        b.iter(|| {
            amount = (amount + 0.01) % 1.0;
            controller.set_saturation_amount(amount);
            tape.process_block(black_box(&input), &mut output);
            black_box(output[0])
        })
    });
}

fn bench_rack(c: &mut Criterion) {
    let mut rack = TapeRack::default();
    for id in 0..4 {
        rack.ensure_engine(id).unwrap();
    }
    let input = generate_test_signal(256);
    let mut engine_out = vec![0.0; 256];
    let mut master_out = vec![0.0; 256];

    c.bench_function("TapeRack/4_engines_plus_master_256", |b| {
        b.iter(|| {
            for id in 0..4 {
                rack.process_engine_block(id, black_box(&input), &mut engine_out);
            }
            rack.process_master_block(&engine_out, &mut master_out);
            black_box(master_out[0])
        })
    });
}

criterion_group!(
    benches,
    bench_machines,
    bench_block_sizes,
    bench_clean_path,
    bench_config_publish,
    bench_rack,
);
criterion_main!(benches);
