//! Terminal cue player
//!
//! Prints each cue instead of playing audio and reports completion after a
//! fixed delay, standing in for the length of a spoken clip.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use beadreader_core::{Cue, CueCompletion, CueOutcome, CuePlayer};
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

pub struct LogCuePlayer {
    clip_length: Duration,
    current: Mutex<Option<AbortHandle>>,
}

impl LogCuePlayer {
    pub fn new(clip_length: Duration) -> Self {
        Self {
            clip_length,
            current: Mutex::new(None),
        }
    }

    fn replace_current(&self, next: Option<AbortHandle>) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = std::mem::replace(&mut *current, next) {
            previous.abort();
        }
    }
}

impl CuePlayer for LogCuePlayer {
    fn play_cue(&self, cue: Cue) -> CueCompletion {
        println!("  >> {}", cue.to_string().to_uppercase());
        tracing::debug!("Cue asset: {}", cue.asset_name());

        let (tx, rx) = oneshot::channel();
        if self.clip_length.is_zero() {
            self.replace_current(None);
            let _ = tx.send(CueOutcome::Finished);
            return rx;
        }

        let clip_length = self.clip_length;
        let clip = tokio::spawn(async move {
            tokio::time::sleep(clip_length).await;
            let _ = tx.send(CueOutcome::Finished);
        });
        self.replace_current(Some(clip.abort_handle()));
        rx
    }

    fn stop_current(&self) {
        // Aborting drops the sender, so the completion never fires
        self.replace_current(None);
    }
}
