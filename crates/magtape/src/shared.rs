//! State shared between the control path and the audio thread.
//!
//! [`TapeShared`] is the bridge between a [`TapeProcessor`](crate::TapeProcessor)
//! and every [`TapeController`](crate::TapeController) handle. The active
//! configuration is published through `ArcSwap` so the audio thread reads it
//! wait-free; meters and the bypass flag are plain atomics.
//!
//! # Thread Safety
//!
//! - **Config**: `ArcSwap::load()`, wait-free. Writers serialize on the
//!   `retired` mutex.
//! - **Bypass / meters**: `AtomicBool` / `AtomicU32` (f32 bits) / `AtomicU64`.
//! - **Presets**: `Mutex`, control path only.
//!
//! Snapshots replaced by a publish are parked in `retired` and released on
//! a later publish once the audio thread no longer holds them, so the audio
//! thread never drops the last reference to a config.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::TapeConfig;
use crate::presets::PresetRegistry;

/// Meter values published by the audio thread after each processing call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeterSnapshot {
    /// |saturation output − input| of the latest sample (max over channels).
    pub saturation: f32,
    /// Latest gain reduction in dB (deepest over channels).
    pub gain_reduction_db: f32,
    /// Output peak level (max over channels).
    pub output_level: f32,
    /// Dropouts since reset, summed over channels.
    pub dropouts: u64,
}

/// Inner storage behind `Arc` so handles are cheap to clone.
struct TapeSharedData {
    config: ArcSwap<TapeConfig>,
    /// Replaced snapshots awaiting release; also the writer lock.
    retired: Mutex<Vec<Arc<TapeConfig>>>,
    presets: Mutex<PresetRegistry>,
    bypassed: AtomicBool,
    saturation: AtomicU32,
    gain_reduction_db: AtomicU32,
    output_level: AtomicU32,
    dropouts: AtomicU64,
}

/// Shared handle; clones point at the same state.
#[derive(Clone)]
pub(crate) struct TapeShared {
    inner: Arc<TapeSharedData>,
}

impl TapeShared {
    pub(crate) fn new(config: TapeConfig, presets: PresetRegistry) -> Self {
        Self {
            inner: Arc::new(TapeSharedData {
                config: ArcSwap::from_pointee(config),
                retired: Mutex::new(Vec::new()),
                presets: Mutex::new(presets),
                bypassed: AtomicBool::new(false),
                saturation: AtomicU32::new(0.0f32.to_bits()),
                gain_reduction_db: AtomicU32::new(0.0f32.to_bits()),
                output_level: AtomicU32::new(0.0f32.to_bits()),
                dropouts: AtomicU64::new(0),
            }),
        }
    }

    // ── Config (audio side) ─────────────────────────────────────────────────

    /// Replace `cached` with the published snapshot if it changed.
    ///
    /// Returns `true` when a new snapshot was adopted. Wait-free; the old
    /// snapshot is still referenced from `retired`, so dropping it here never
    /// frees.
    pub(crate) fn refresh(&self, cached: &mut Arc<TapeConfig>) -> bool {
        let current = self.inner.config.load();
        if Arc::ptr_eq(&current, cached) {
            return false;
        }
        *cached = arc_swap::Guard::into_inner(current);
        true
    }

    /// Full `Arc` of the current snapshot.
    pub(crate) fn load_full(&self) -> Arc<TapeConfig> {
        self.inner.config.load_full()
    }

    // ── Config (control side) ───────────────────────────────────────────────

    /// Copy of the current configuration.
    pub(crate) fn config(&self) -> TapeConfig {
        **self.inner.config.load()
    }

    /// Publish `config` as the new snapshot.
    pub(crate) fn publish(&self, config: TapeConfig) {
        let mut retired = self.inner.retired.lock();
        let old = self.inner.config.swap(Arc::new(config));
        retired.push(old);
        retired.retain(|snapshot| Arc::strong_count(snapshot) > 1);
    }

    /// Read-modify-write the configuration under the writer lock.
    pub(crate) fn update(&self, f: impl FnOnce(&mut TapeConfig)) -> TapeConfig {
        let mut retired = self.inner.retired.lock();
        let mut next = **self.inner.config.load();
        f(&mut next);
        let old = self.inner.config.swap(Arc::new(next));
        retired.push(old);
        retired.retain(|snapshot| Arc::strong_count(snapshot) > 1);
        next
    }

    /// Number of replaced snapshots not yet released.
    #[cfg(test)]
    pub(crate) fn retired_len(&self) -> usize {
        self.inner.retired.lock().len()
    }

    // ── Presets ──────────────────────────────────────────────────────────────

    pub(crate) fn presets(&self) -> parking_lot::MutexGuard<'_, PresetRegistry> {
        self.inner.presets.lock()
    }

    // ── Bypass ───────────────────────────────────────────────────────────────

    pub(crate) fn bypass_requested(&self) -> bool {
        self.inner.bypassed.load(Ordering::Acquire)
    }

    pub(crate) fn set_bypass_requested(&self, bypassed: bool) {
        self.inner.bypassed.store(bypassed, Ordering::Release);
    }

    // ── Meters ───────────────────────────────────────────────────────────────

    pub(crate) fn store_meters(&self, meters: &MeterSnapshot) {
        let i = &self.inner;
        i.saturation
            .store(meters.saturation.to_bits(), Ordering::Relaxed);
        i.gain_reduction_db
            .store(meters.gain_reduction_db.to_bits(), Ordering::Relaxed);
        i.output_level
            .store(meters.output_level.to_bits(), Ordering::Relaxed);
        i.dropouts.store(meters.dropouts, Ordering::Relaxed);
    }

    pub(crate) fn meters(&self) -> MeterSnapshot {
        let i = &self.inner;
        MeterSnapshot {
            saturation: f32::from_bits(i.saturation.load(Ordering::Relaxed)),
            gain_reduction_db: f32::from_bits(i.gain_reduction_db.load(Ordering::Relaxed)),
            output_level: f32::from_bits(i.output_level.load(Ordering::Relaxed)),
            dropouts: i.dropouts.load(Ordering::Relaxed),
        }
    }
}
