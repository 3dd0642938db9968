//! Per-primitive cost, measured over 512-sample blocks.
//!
//! Run with: cargo bench -p magtape-core
#![allow(missing_docs)]

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use magtape_core::{
    DcBlocker, Effect, EnvelopeFollower, FixedDelayLine, LookupTable, NoiseSource, OnePole,
    SmoothedParam, StateVariableFilter, SvfOutput,
};

const SR: f32 = 48000.0;
const BLOCK: usize = 512;

fn tone() -> Vec<f32> {
    (0..BLOCK)
        .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / SR).sin() * 0.5)
        .collect()
}

/// Bench `step` over one block of the test tone.
fn per_sample(c: &mut Criterion, name: &str, mut step: impl FnMut(f32) -> f32) {
    let input = tone();
    let mut group = c.benchmark_group("primitives");
    group.throughput(Throughput::Elements(BLOCK as u64));
    group.bench_function(name, |b| {
        b.iter(|| {
            for &x in &input {
                black_box(step(black_box(x)));
            }
        });
    });
    group.finish();
}

fn filters(c: &mut Criterion) {
    let mut head = StateVariableFilter::tuned(SR, 6500.0, 0.707, SvfOutput::Lowpass);
    per_sample(c, "svf_head", |x| head.process(x));

    let mut dc = DcBlocker::with_cutoff(SR, 38.0);
    per_sample(c, "dc_blocker", |x| dc.process(x));

    let mut print = OnePole::from_coeff(0.995);
    per_sample(c, "one_pole", |x| print.process(x));

    c.bench_function("svf_retune", |b| {
        let mut svf = StateVariableFilter::default();
        b.iter(|| svf.set_cutoff(black_box(6500.0)));
    });
}

fn control(c: &mut Criterion) {
    let mut slew = SmoothedParam::with_config(0.0, SR, 1.0);
    per_sample(c, "smoothed_param", |x| slew.process(x));

    let mut meter = EnvelopeFollower::with_times(SR, 0.1, 300.0);
    per_sample(c, "envelope", |x| meter.process(x));
}

fn modulation(c: &mut Criterion) {
    let mut tap: FixedDelayLine<1024> = FixedDelayLine::new();
    let mut d = 0.0f32;
    per_sample(c, "delay_swept_tap", |x| {
        d = if d > 20.0 { 0.0 } else { d + 0.013 };
        tap.write_read(x, d)
    });

    let curve: LookupTable<1024> = LookupTable::from_fn(|x| (2.0 * x).tanh() * 0.8);
    per_sample(c, "lookup", |x| curve.lookup(x));

    let mut hiss = NoiseSource::default();
    per_sample(c, "normal_noise", |x| x + hiss.normal() * 1e-3);
}

criterion_group!(benches, filters, control, modulation);
criterion_main!(benches);
