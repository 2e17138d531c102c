//! Audio output with a bounded backlog.
//!
//! The core produces one chunk of samples per step. If the platform queue
//! already holds `backlog_ticks` worth of audio, the new chunk is dropped
//! instead of letting latency grow without bound.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use folium_types::backend::CoreCapabilities;
use folium_types::config::FoliumConfig;

/// Ticks of audio allowed to sit in the platform queue.
pub const DEFAULT_BACKLOG_TICKS: usize = 6;

/// A platform audio queue fed from the emulation thread.
pub trait AudioSink: Send {
    /// Samples currently waiting to be played.
    fn queued_samples(&self) -> usize;

    fn enqueue(&mut self, samples: &[i16]);
}

/// Shared ring the emulation thread pushes into and a playback callback
/// pops from. Clones share the ring.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    ring: Arc<Mutex<VecDeque<i16>>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop up to `out.len()` samples, padding with silence.
    pub fn fill(&self, out: &mut [i16]) {
        let mut ring = self.ring.lock().unwrap_or_else(PoisonError::into_inner);
        for sample in out.iter_mut() {
            *sample = ring.pop_front().unwrap_or(0);
        }
    }
}

impl AudioSink for VecSink {
    fn queued_samples(&self) -> usize {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn enqueue(&mut self, samples: &[i16]) {
        self.ring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(samples.iter().copied());
    }
}

/// Per-tick feeder applying the backlog limit.
pub struct AudioQueue {
    sink: Box<dyn AudioSink>,
    wanted_per_tick: usize,
    backlog_ticks: usize,
    skipped: u64,
}

impl AudioQueue {
    pub fn new(sink: Box<dyn AudioSink>, wanted_per_tick: usize, backlog_ticks: usize) -> Self {
        Self {
            sink,
            wanted_per_tick,
            backlog_ticks,
            skipped: 0,
        }
    }

    /// Queue sized from the core's timing and the configured backlog.
    pub fn for_core(
        sink: Box<dyn AudioSink>,
        caps: &CoreCapabilities,
        config: &FoliumConfig,
    ) -> Self {
        let backlog_ticks = match config.audio_backlog_ticks {
            0 => DEFAULT_BACKLOG_TICKS,
            n => n,
        };
        Self::new(sink, caps.samples_per_tick(), backlog_ticks)
    }

    /// Samples the queue may hold before chunks are dropped.
    pub fn limit(&self) -> usize {
        self.backlog_ticks.saturating_mul(self.wanted_per_tick)
    }

    /// Queue one tick of audio. Returns `false` when the chunk was dropped.
    pub fn push_tick(&mut self, chunk: &[i16]) -> bool {
        if chunk.is_empty() {
            return true;
        }
        let queued = self.sink.queued_samples();
        if queued >= self.limit() {
            self.skipped += 1;
            log::trace!(
                "Audio backlog at {queued} samples -- dropping {} samples",
                chunk.len()
            );
            return false;
        }
        self.sink.enqueue(chunk);
        true
    }

    /// Chunks dropped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
