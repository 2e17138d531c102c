//! One running game.
//!
//! The session owns the core and a worker thread that steps it. The main
//! thread reaches the core only through [`EmulationSession::with_core`],
//! which waits for the worker to finish its current step. Stopping cancels
//! the worker, joins it, and only then tears the core down, so no buffer is
//! released while the worker can still touch it.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use folium_types::backend::EmulationCore;
use folium_types::error::{FoliumError, Result};
use folium_types::CoreId;
use folium_video::{Frame, FrameDescriptor, FrameSlot};

use crate::alert::FatalAlert;
use crate::audio::AudioQueue;

/// Cooperative stop signal shared with the worker. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Stopped,
    /// The core failed mid-game; the alert must be shown before exiting.
    Failed(FatalAlert),
}

type SharedCore = Arc<Mutex<Box<dyn EmulationCore>>>;

/// State shared between the session handle and its worker.
struct Worker {
    core: SharedCore,
    token: CancellationToken,
    screens: Vec<FrameSlot>,
    audio: AudioQueue,
    failure: Arc<Mutex<Option<FatalAlert>>>,
    steps: Arc<AtomicU64>,
}

pub struct EmulationSession {
    core_id: CoreId,
    core: SharedCore,
    token: CancellationToken,
    worker: Option<JoinHandle<()>>,
    screens: Vec<FrameSlot>,
    failure: Arc<Mutex<Option<FatalAlert>>>,
    steps: Arc<AtomicU64>,
    stopped: bool,
}

impl EmulationSession {
    /// Boot `game` on `core` and start stepping it.
    ///
    /// On boot failure the core is stopped and the error returned; callers
    /// turn it into a [`FatalAlert::boot_failed`].
    pub fn start(mut core: Box<dyn EmulationCore>, game: &Path, audio: AudioQueue) -> Result<Self> {
        let core_id = core.id();
        if let Err(e) = core.insert_cartridge_and_boot(game) {
            log::error!("{core_id} failed to boot {}: {e}", game.display());
            core.stop();
            return Err(e);
        }
        log::info!("{core_id} booted {}", game.display());

        let frame_rate = core.capabilities().frame_rate;
        let screens: Vec<FrameSlot> = core_id
            .native_screens()
            .iter()
            .map(|_| FrameSlot::new())
            .collect();
        let core: SharedCore = Arc::new(Mutex::new(core));
        let token = CancellationToken::new();
        let failure = Arc::new(Mutex::new(None));
        let steps = Arc::new(AtomicU64::new(0));

        let worker = Worker {
            core: Arc::clone(&core),
            token: token.clone(),
            screens: screens.clone(),
            audio,
            failure: Arc::clone(&failure),
            steps: Arc::clone(&steps),
        };
        let handle = thread::Builder::new()
            .name(format!("folium-{}", core_id.name().to_ascii_lowercase()))
            .spawn(move || worker.run(frame_rate))
            .map_err(|e| FoliumError::Session(format!("cannot spawn emulation thread: {e}")))?;

        Ok(Self {
            core_id,
            core,
            token,
            worker: Some(handle),
            screens,
            failure,
            steps,
            stopped: false,
        })
    }

    pub fn core_id(&self) -> CoreId {
        self.core_id
    }

    pub fn state(&self) -> SessionState {
        if let Some(alert) = lock(&self.failure).clone() {
            return SessionState::Failed(alert);
        }
        if self.stopped {
            SessionState::Stopped
        } else {
            SessionState::Running
        }
    }

    /// Frames stepped so far.
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }

    /// Take the newest frame for `screen`, if one arrived since last time.
    pub fn take_frame(&self, screen: usize) -> Option<Frame> {
        self.screens.get(screen)?.take()
    }

    pub fn frame_slot(&self, screen: usize) -> Option<&FrameSlot> {
        self.screens.get(screen)
    }

    /// Run `f` against the core between two worker steps.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut dyn EmulationCore) -> R) -> R {
        let mut core = lock(&self.core);
        f(core.as_mut())
    }

    /// Cancel the worker, wait for it, then release the core.
    ///
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.token.cancel();
        if let Some(handle) = self.worker.take()
            && handle.join().is_err()
        {
            log::error!("{} emulation thread panicked", self.core_id);
        }
        lock(&self.core).stop();
        self.stopped = true;
        log::info!("{} session stopped after {} frames", self.core_id, self.steps());
    }
}

impl Drop for EmulationSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Worker {
    fn run(mut self, frame_rate: f64) {
        let frame_time = (frame_rate > 0.0).then(|| Duration::from_secs_f64(1.0 / frame_rate));
        let mut next = Instant::now();
        let mut chunk: Vec<i16> = Vec::new();

        while !self.token.is_cancelled() {
            match self.step_once(&mut chunk) {
                Ok(()) => {
                    self.audio.push_tick(&chunk);
                    self.steps.fetch_add(1, Ordering::Relaxed);
                },
                Err(e) => {
                    log::error!("Emulation failed: {e}");
                    *lock(&self.failure) = Some(FatalAlert::emulation_failed(&e));
                    self.token.cancel();
                    break;
                },
            }

            if let Some(frame_time) = frame_time {
                next += frame_time;
                let now = Instant::now();
                if next > now {
                    thread::sleep(next - now);
                } else {
                    // Running behind: don't try to catch up.
                    next = now;
                }
            }
        }
        log::debug!("Emulation thread exiting");
    }

    /// Step the core and copy its output while holding the lock.
    fn step_once(&mut self, chunk: &mut Vec<i16>) -> Result<()> {
        let mut core = lock(&self.core);
        core.step()?;
        let sequence = self.steps.load(Ordering::Relaxed);
        let raw = core.video_buffer();

        for (screen, slot) in self.screens.iter().enumerate() {
            let Some(mut desc) = FrameDescriptor::for_core(core.id(), screen) else {
                continue;
            };
            if screen == 0
                && let Some((w, h)) = core.display_region()
            {
                desc.display = Some((w, h));
            }
            desc.validate(raw.len())?;

            // Copy just this screen's pixels so the slot holds an
            // offset-free frame.
            let bpp = desc.format.bytes_per_pixel();
            let start = desc.offset_pixels * bpp;
            let end = desc.required_len().unwrap_or(start);
            desc.offset_pixels = 0;
            slot.publish(Frame {
                sequence,
                pixels: raw[start..end].to_vec(),
                descriptor: desc,
                palette: core.palette().map(<[[u8; 3]]>::to_vec),
            });
        }

        chunk.clear();
        chunk.extend_from_slice(core.audio_buffer());
        Ok(())
    }
}

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
