//! Latest-wins frame handoff from the core thread.
//!
//! There is no queue: publishing replaces whatever the presentation side
//! has not picked up yet, and the replaced frame is counted as dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use folium_types::error::Result;

use crate::decode::decode;
use crate::format::{FrameDescriptor, Rgb};
use crate::image::DisplayImage;

/// One raw frame copied out of a core.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Monotonic frame number assigned by the producer.
    pub sequence: u64,
    pub pixels: Vec<u8>,
    pub descriptor: FrameDescriptor,
    pub palette: Option<Vec<Rgb>>,
}

impl Frame {
    /// Decode on the presentation side.
    pub fn to_image(&self) -> Result<DisplayImage> {
        decode(&self.pixels, &self.descriptor, self.palette.as_deref())
    }
}

#[derive(Debug, Default)]
struct Shared {
    latest: Mutex<Option<Frame>>,
    published: AtomicU64,
    dropped: AtomicU64,
}

/// A single-slot mailbox. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    shared: Arc<Shared>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `frame`, replacing any frame not yet taken.
    pub fn publish(&self, frame: Frame) {
        let mut latest = self.shared.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = latest.replace(frame) {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            log::trace!("Dropped undelivered frame {}", old.sequence);
        }
        self.shared.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Take the newest frame, leaving the slot empty.
    pub fn take(&self) -> Option<Frame> {
        self.shared
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn published(&self) -> u64 {
        self.shared.published.load(Ordering::Relaxed)
    }

    /// Frames overwritten before the presentation side took them.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::format::PixelFormat;

    fn frame(sequence: u64) -> Frame {
        Frame {
            sequence,
            pixels: vec![sequence as u8; 4],
            descriptor: FrameDescriptor::new(1, 1, PixelFormat::Rgba8888),
            palette: None,
        }
    }

    #[test]
    fn newest_frame_wins() {
        let slot = FrameSlot::new();
        slot.publish(frame(1));
        slot.publish(frame(2));
        slot.publish(frame(3));
        assert_eq!(slot.take().map(|f| f.sequence), Some(3));
        assert!(slot.take().is_none());
        assert_eq!(slot.dropped(), 2);
        assert_eq!(slot.published(), 3);
    }

    #[test]
    fn taken_frames_are_not_dropped() {
        let slot = FrameSlot::new();
        slot.publish(frame(1));
        slot.take();
        slot.publish(frame(2));
        assert_eq!(slot.dropped(), 0);
    }

    #[test]
    fn frame_decodes_to_image() {
        let img = frame(7).to_image().unwrap();
        assert_eq!(img.rgba, vec![7, 7, 7, 7]);
    }

    #[test]
    fn handoff_across_threads() {
        let slot = FrameSlot::new();
        let producer = slot.clone();
        let handle = thread::spawn(move || {
            for i in 0..100 {
                producer.publish(frame(i));
            }
        });
        handle.join().unwrap();
        assert_eq!(slot.take().map(|f| f.sequence), Some(99));
        assert_eq!(slot.dropped(), 99);
    }
}
