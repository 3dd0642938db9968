//! The per-sample processing contract.

/// A mono processor that advances one sample per call.
///
/// Filters in this crate and the tape processor built on them implement it,
/// so a host can drive any of them through `&mut dyn Effect`. Nothing here
/// allocates or blocks; every method is safe to call from an audio callback.
///
/// ```rust
/// use magtape_core::Effect;
///
/// struct Trim(f32);
///
/// impl Effect for Trim {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///     fn set_sample_rate(&mut self, _: f32) {}
///     fn reset(&mut self) {}
/// }
///
/// let mut trim = Trim(0.5);
/// let mut buf = [1.0, -1.0];
/// trim.process_block_inplace(&mut buf);
/// assert_eq!(buf, [0.5, -0.5]);
/// ```
pub trait Effect {
    /// Consume one input sample and return one output sample.
    fn process(&mut self, input: f32) -> f32;

    /// Run `input` into `output`, stopping at the shorter of the two.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input) {
            *out = self.process(x);
        }
    }

    /// Run a buffer through in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer {
            *sample = self.process(*sample);
        }
    }

    /// Retune everything that depends on the sample rate.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear signal memory; settings are kept.
    fn reset(&mut self);

    /// Delay introduced by the processor, in samples.
    fn latency_samples(&self) -> usize {
        0
    }
}
