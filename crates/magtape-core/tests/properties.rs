//! Property-based tests for magtape-core DSP primitives.
//!
//! Tests filter stability, smoother convergence, delay line integrity and
//! lookup-table bounds using proptest for randomized input generation.

use magtape_core::{
    DcBlocker, Effect, FixedDelayLine, LookupTable, NoiseSource, OnePole, SmoothedParam,
    StateVariableFilter, SvfOutput, resonance_to_q,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any valid cutoff and Q, SVF filters produce finite output across
    /// all output modes for random input.
    #[test]
    fn svf_stability(
        freq in 20.0f32..20000.0f32,
        q in 0.5f32..10.0f32,
        output_mode in 0usize..4,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mode = match output_mode {
            0 => SvfOutput::Lowpass,
            1 => SvfOutput::Highpass,
            2 => SvfOutput::Bandpass,
            _ => SvfOutput::Notch,
        };
        let mut svf = StateVariableFilter::tuned(48000.0, freq, q, mode);

        for _ in 0..32 {
            for &sample in &input {
                let out = svf.process(sample);
                prop_assert!(
                    out.is_finite(),
                    "SVF mode {:?} (freq={}, q={}) produced non-finite output {} for input {}",
                    mode, freq, q, out, sample
                );
            }
        }
    }

    /// Resonance amounts map to a Q the filter accepts for any input.
    #[test]
    fn resonance_mapping_is_finite(r in -2.0f32..2.0f32) {
        let q = resonance_to_q(r);
        prop_assert!(q.is_finite() && q >= 0.5);
    }

    /// Retuning on every sample (as the head-rolloff filter does when the
    /// configuration changes) stays stable.
    #[test]
    fn svf_sweep_stability(
        start in 20.0f32..20000.0f32,
        end in 20.0f32..20000.0f32,
    ) {
        let mut svf = StateVariableFilter::tuned(44100.0, start, 0.714, SvfOutput::Bandpass);
        for i in 0..2048 {
            let t = i as f32 / 2047.0;
            svf.set_cutoff(start + (end - start) * t);
            let out = svf.process(if i % 64 < 32 { 1.0 } else { -1.0 });
            prop_assert!(out.is_finite() && out.abs() < 10.0, "out={}", out);
        }
    }

    /// SmoothedParam converges toward its target value.
    ///
    /// 1 ms at 48 kHz is a time constant of 48 samples; 2000 samples is
    /// over 40 time constants.
    #[test]
    fn smoothed_param_convergence(
        initial in -2.0f32..2.0f32,
        target in -2.0f32..2.0f32,
    ) {
        let mut param = SmoothedParam::with_config(initial, 48000.0, 1.0);
        param.set_target(target);
        for _ in 0..2000 {
            param.advance();
        }
        let diff = (param.get() - target).abs();
        prop_assert!(diff < 1e-4, "initial={}, target={}, got={}", initial, target, param.get());
    }

    /// Every smoothing step moves toward the target and never overshoots.
    #[test]
    fn smoothed_param_never_overshoots(
        target in -1.0f32..1.0f32,
        ms in 0.1f32..50.0f32,
    ) {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, ms);
        param.set_target(target);
        let mut prev = 0.0f32;
        for _ in 0..512 {
            let v = param.advance();
            prop_assert!((v - prev) * target >= 0.0);
            prop_assert!(v.abs() <= target.abs() + 1e-6);
            prev = v;
        }
    }

    /// Write random samples to a FixedDelayLine and read them back at integer
    /// delays. They must match exactly.
    #[test]
    fn delay_line_integrity(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..=64),
    ) {
        let mut delay: FixedDelayLine<128> = FixedDelayLine::new();

        for &s in &samples {
            delay.write(s);
        }

        // delay=0 is the last written sample, delay=1 the one before, etc.
        for (i, &expected) in samples.iter().rev().enumerate() {
            let got = delay.read(i as f32);
            prop_assert!(
                (got - expected).abs() < 1e-6,
                "Delay mismatch at delay={}: expected {}, got {}",
                i, expected, got
            );
        }
    }

    /// Fractional reads stay within the two neighbouring samples.
    #[test]
    fn delay_line_interpolation_bounded(
        samples in prop::array::uniform32(-1.0f32..=1.0f32),
        d in 0.0f32..30.0f32,
    ) {
        let mut delay: FixedDelayLine<64> = FixedDelayLine::new();
        for &s in &samples {
            delay.write(s);
        }
        let i = d as usize;
        let a = samples[31 - i];
        let b = samples[30 - i];
        let got = delay.read(d);
        prop_assert!(got >= a.min(b) - 1e-6 && got <= a.max(b) + 1e-6);
    }

    /// Lookup-table queries never leave the range of the table entries.
    #[test]
    fn lookup_table_bounded(x in -10.0f32..10.0f32) {
        let table: LookupTable<1024> = LookupTable::from_fn(|v| libm::tanhf(2.0 * v) * 0.8);
        let y = table.lookup(x);
        prop_assert!(y.abs() <= 0.8, "y={}", y);
    }

    /// One-pole memories with any valid coefficient are bounded by their input.
    #[test]
    fn one_pole_memory_bounded(
        coeff in 0.0f32..0.9999f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut lp = OnePole::from_coeff(coeff);
        for &x in input.iter().cycle().take(4096) {
            let y = lp.process(x);
            prop_assert!(y.abs() <= 1.0 + 1e-5);
        }
    }

    /// DC blocker output stays finite for any seed of noise input.
    #[test]
    fn dc_blocker_finite(seed in 1u32..u32::MAX, sr in 8000.0f32..192000.0f32) {
        let mut rng = NoiseSource::new(seed);
        let mut dc = DcBlocker::with_cutoff(sr, 38.0);
        for _ in 0..4096 {
            prop_assert!(dc.process(rng.uniform_range(-1.0, 1.0)).is_finite());
        }
    }
}
