//! Audio cue requests and the collaborator that plays them
//!
//! The scheduler never renders sound itself. It hands a [`Cue`] to a
//! [`CuePlayer`] and waits on the returned one-shot receiver.

use std::fmt;

use tokio::sync::oneshot;

/// A discrete announcement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Speak a color name
    Color(String),
    /// Speak a count
    Count(u32),
    /// The whole pattern has been announced
    PatternComplete,
}

impl Cue {
    /// Asset path relative to the sound root, without extension.
    ///
    /// ```
    /// use beadreader_core::Cue;
    ///
    /// assert_eq!(Cue::Color("Aqua".into()).asset_name(), "colors/aqua");
    /// assert_eq!(Cue::Count(10).asset_name(), "numbers/10");
    /// assert_eq!(Cue::PatternComplete.asset_name(), "patterncomplete");
    /// ```
    pub fn asset_name(&self) -> String {
        match self {
            Cue::Color(color) => format!("colors/{}", color.to_lowercase()),
            Cue::Count(count) => format!("numbers/{}", count),
            Cue::PatternComplete => "patterncomplete".to_string(),
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::Color(color) => write!(f, "color {}", color),
            Cue::Count(count) => write!(f, "count {}", count),
            Cue::PatternComplete => write!(f, "pattern complete"),
        }
    }
}

/// How a cue ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueOutcome {
    Finished,
    /// Asset missing or playback failed; playback carries on regardless
    Failed(String),
}

/// Completion signal for a single cue. Fires at most once.
pub type CueCompletion = oneshot::Receiver<CueOutcome>;

/// Audio output collaborator.
///
/// Implementations must send exactly one [`CueOutcome`] per cue unless the
/// cue is stopped, in which case the sender is dropped without sending.
pub trait CuePlayer: Send + Sync + 'static {
    /// Start playing `cue`, replacing whatever is currently playing.
    fn play_cue(&self, cue: Cue) -> CueCompletion;

    /// Stop the current cue and suppress its completion. Idempotent.
    fn stop_current(&self);
}

impl<T: CuePlayer + ?Sized> CuePlayer for std::sync::Arc<T> {
    fn play_cue(&self, cue: Cue) -> CueCompletion {
        (**self).play_cue(cue)
    }

    fn stop_current(&self) {
        (**self).stop_current()
    }
}

/// Cue player with no output: every cue finishes immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play_cue(&self, _cue: Cue) -> CueCompletion {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(CueOutcome::Finished);
        rx
    }

    fn stop_current(&self) {}
}
