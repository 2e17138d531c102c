//! Folium session runtime.
//!
//! Owns everything about one running game that is not on-screen input:
//! the worker thread stepping the core, the audio backlog, fatal error
//! alerts, plus discovery of games on disk.

pub mod alert;
pub mod audio;
pub mod cue;
pub mod library;
pub mod session;

pub use alert::{AlertAction, FatalAlert};
pub use audio::{AudioQueue, AudioSink, DEFAULT_BACKLOG_TICKS, VecSink};
pub use cue::{CueFile, CueSheet, CueTrack, Msf};
pub use folium_types::backend::{CoreCapabilities, EmulationCore};
pub use library::{Cheat, ExtendedMetadata, FileDetails, GameEntry, GameLibrary, SaveState};
pub use session::{CancellationToken, EmulationSession, SessionState};
