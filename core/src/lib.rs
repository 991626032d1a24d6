//! BeadReader Core - pattern playback
//!
//! This crate turns a decoded [`Pattern`] into a paced sequence of spoken
//! announcements so the user can string beads along with them.
//!
//! # Architecture
//!
//! - [`Scheduler`] - Play/pause/reset/seek state machine over one pattern
//! - [`CuePlayer`] - Audio output collaborator, injected at construction
//! - [`Pacing`] - Seconds-per-bead source, read before every wait
//! - [`loader`] - Async loading entry points for markup and PNG containers
//! - [`config`] - Persisted user settings (config.toml)

pub mod config;
pub mod cue;
pub mod loader;
pub mod pacing;
pub mod scheduler;

pub use bead_format::{Bead, Pattern};
pub use config::{Config, PlaybackConfig};
pub use cue::{Cue, CueCompletion, CueOutcome, CuePlayer, SilentCuePlayer};
pub use loader::{load_from_container, load_from_path, load_from_structured_text};
pub use pacing::Pacing;
pub use scheduler::{
    CUE_GAP, GROUP_SIZE, GROUPING_THRESHOLD, PlaybackStatus, Progress, Scheduler,
    announcement_groups,
};
