//! Paced playback over a pattern
//!
//! # State machine
//!
//! ```text
//!            play            all beads announced
//!   Idle ───────────► Playing ───────────────────► Finished
//!    ▲                 │  ▲                           │
//!    │           pause │  │ play                      │
//!    │                 ▼  │                           │
//!    └──── reset ──── Paused ◄──── seek ──────────────┘
//! ```
//!
//! `reset` returns to `Idle` from any state. `play` does nothing while
//! `Playing` or `Finished`.
//!
//! # Cancellation
//!
//! Each playback run is one Tokio task tagged with a generation number.
//! Stopping a run bumps the generation under the state lock and drops the
//! run's cancel sender. A run only commits progress (read flag, cursor,
//! `Finished`) while holding the lock with its generation still current,
//! so a cancelled step never leaves a trace. Cues are requested under the
//! same lock that `pause` holds while calling `stop_current`, so a stopped
//! run cannot start another cue.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bead_format::{Bead, Pattern};
use tokio::sync::{oneshot, watch};

use crate::cue::{Cue, CueOutcome, CuePlayer};
use crate::pacing::{self, Pacing};

/// Pause between a color cue and its count cue
pub const CUE_GAP: Duration = Duration::from_millis(400);

/// Counts above this are announced in groups of [`GROUP_SIZE`]
pub const GROUPING_THRESHOLD: u32 = 20;

/// Size of each full group when a count is split
pub const GROUP_SIZE: u32 = 10;

/// Where playback stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Cursor at the start, nothing announced
    #[default]
    Idle,
    Playing,
    Paused,
    /// Cursor is past the last bead
    Finished,
}

/// Snapshot published to observers on every state change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub status: PlaybackStatus,
    /// Index of the current bead; equals `bead_count` when past the end
    pub cursor: usize,
    pub bead_count: usize,
    pub read_count: usize,
}

/// Split a bead count into the counts that get announced.
///
/// Counts up to [`GROUPING_THRESHOLD`] are announced whole. Larger counts
/// become full groups of [`GROUP_SIZE`] followed by the remainder, which is
/// announced even when it is zero.
pub fn announcement_groups(count: u32) -> Vec<u32> {
    if count <= GROUPING_THRESHOLD {
        return vec![count];
    }

    let mut groups = vec![GROUP_SIZE; (count / GROUP_SIZE) as usize];
    groups.push(count % GROUP_SIZE);
    groups
}

/// Drives announcements for one pattern.
///
/// Control methods are synchronous and must be called from within a Tokio
/// runtime, since `play` spawns the playback task.
pub struct Scheduler<C, P> {
    shared: Arc<Shared<C, P>>,
}

struct Shared<C, P> {
    state: Mutex<State>,
    cues: C,
    pacing: P,
    progress: watch::Sender<Progress>,
}

struct State {
    pattern: Pattern,
    cursor: usize,
    status: PlaybackStatus,
    generation: u64,
    /// Dropping this cancels the running playback task
    run: Option<oneshot::Sender<()>>,
}

impl State {
    fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            cursor: 0,
            status: PlaybackStatus::Idle,
            generation: 0,
            run: None,
        }
    }

    fn progress(&self) -> Progress {
        Progress {
            status: self.status,
            cursor: self.cursor,
            bead_count: self.pattern.len(),
            read_count: self.pattern.read_count(),
        }
    }

    /// Invalidate the current run. Returns true if one was active.
    fn cancel_run(&mut self) -> bool {
        self.generation += 1;
        self.run.take().is_some()
    }
}

impl<C, P> Shared<C, P> {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.progress.send_replace(state.progress());
    }
}

impl<C: CuePlayer, P: Pacing> Shared<C, P> {
    /// Play a cue and wait for it. Failures count as completion.
    ///
    /// The cue is requested under the state lock, so a run superseded by
    /// `pause` can never start a cue after `stop_current` has run. Returns
    /// false if `generation` is no longer current.
    async fn announce(&self, generation: u64, cue: Cue) -> bool {
        let completion = {
            let state = self.lock();
            if state.generation != generation {
                return false;
            }
            tracing::debug!("Cue: {}", cue);
            self.cues.play_cue(cue)
        };

        match completion.await {
            Ok(CueOutcome::Finished) | Err(_) => {}
            Ok(CueOutcome::Failed(reason)) => {
                tracing::warn!("Cue failed, continuing: {}", reason);
            }
        }
        true
    }

    /// Announce beads from the cursor until the end or until `generation`
    /// is superseded.
    async fn advance(&self, generation: u64) {
        loop {
            let next = {
                let state = self.lock();
                if state.generation != generation {
                    return;
                }
                state
                    .pattern
                    .bead(state.cursor)
                    .map(|bead| (bead.id, bead.color.clone(), bead.count))
            };

            let Some((id, color, count)) = next else {
                if !self.announce(generation, Cue::PatternComplete).await {
                    return;
                }

                let mut state = self.lock();
                if state.generation == generation {
                    state.status = PlaybackStatus::Finished;
                    state.run = None;
                    self.publish(&state);
                    tracing::info!("Pattern complete");
                }
                return;
            };

            for units in announcement_groups(count) {
                if !self.announce(generation, Cue::Color(color.clone())).await {
                    return;
                }
                tokio::time::sleep(CUE_GAP).await;
                if !self.announce(generation, Cue::Count(units)).await {
                    return;
                }

                let wait = pacing::wait_for(self.pacing.seconds_per_unit(), units);
                tokio::time::sleep(wait).await;
            }

            let mut state = self.lock();
            if state.generation != generation {
                return;
            }
            state.pattern.set_read(id, true);
            state.cursor = id + 1;
            self.publish(&state);
        }
    }
}

impl<C: CuePlayer, P: Pacing> Scheduler<C, P> {
    pub fn new(pattern: Pattern, cues: C, pacing: P) -> Self {
        let state = State::new(pattern);
        let (progress, _) = watch::channel(state.progress());

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                cues,
                pacing,
                progress,
            }),
        }
    }

    /// Start or resume playback from the cursor.
    ///
    /// Does nothing while already playing or once finished; use
    /// [`Scheduler::reset`] or [`Scheduler::toggle`] to start over.
    pub fn play(&self) {
        let (cancel_rx, generation) = {
            let mut state = self.shared.lock();
            if matches!(
                state.status,
                PlaybackStatus::Playing | PlaybackStatus::Finished
            ) {
                return;
            }

            state.generation += 1;
            let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
            state.run = Some(cancel_tx);
            state.status = PlaybackStatus::Playing;
            self.shared.publish(&state);
            tracing::info!("Playing from bead {}", state.cursor);

            (cancel_rx, state.generation)
        };

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_rx => {}
                _ = shared.advance(generation) => {}
            }
        });
    }

    /// Stop the in-flight step without committing it.
    pub fn pause(&self) {
        let mut state = self.shared.lock();
        if state.status != PlaybackStatus::Playing {
            return;
        }
        state.cancel_run();
        self.shared.cues.stop_current();
        state.status = PlaybackStatus::Paused;
        self.shared.publish(&state);
        tracing::info!("Paused at bead {}", state.cursor);
    }

    /// Stop playback, clear all progress and return to the first bead.
    pub fn reset(&self) {
        let mut state = self.shared.lock();
        if state.cancel_run() {
            self.shared.cues.stop_current();
        }
        state.pattern.clear_read();
        state.cursor = 0;
        state.status = PlaybackStatus::Idle;
        self.shared.publish(&state);
        tracing::info!("Playback reset");
    }

    /// Jump to bead `id`, marking it and every earlier bead read.
    ///
    /// Ignored while playing or when `id` is outside the pattern. Returns
    /// whether the seek was applied.
    pub fn seek(&self, id: usize) -> bool {
        let mut state = self.shared.lock();
        if state.status == PlaybackStatus::Playing {
            tracing::debug!("Ignoring seek to {} while playing", id);
            return false;
        }
        if id >= state.pattern.len() {
            tracing::debug!("Ignoring seek to {} (pattern has {} beads)", id, state.pattern.len());
            return false;
        }

        state.cursor = id;
        state.pattern.mark_read_through(id);
        state.status = PlaybackStatus::Paused;
        self.shared.publish(&state);
        true
    }

    /// Play/pause button: pauses while playing, otherwise plays, starting
    /// over first if the pattern has been completed.
    pub fn toggle(&self) {
        let (status, complete) = {
            let state = self.shared.lock();
            (state.status, state.pattern.is_complete())
        };

        match status {
            PlaybackStatus::Playing => self.pause(),
            PlaybackStatus::Finished => {
                self.reset();
                self.play();
            }
            _ if complete => {
                self.reset();
                self.play();
            }
            _ => self.play(),
        }
    }

    /// Replace the pattern and start from scratch.
    pub fn load(&self, pattern: Pattern) {
        let mut state = self.shared.lock();
        if state.cancel_run() {
            self.shared.cues.stop_current();
        }
        let generation = state.generation;
        *state = State::new(pattern);
        state.generation = generation;
        self.shared.publish(&state);
        tracing::info!("Loaded pattern '{}' ({} beads)", state.pattern.name(), state.pattern.len());
    }

    pub fn status(&self) -> PlaybackStatus {
        self.shared.lock().status
    }

    pub fn cursor(&self) -> usize {
        self.shared.lock().cursor
    }

    /// The bead at the cursor, if the cursor is not past the end.
    pub fn current_bead(&self) -> Option<Bead> {
        let state = self.shared.lock();
        state.pattern.bead(state.cursor).cloned()
    }

    /// Copy of the pattern including read flags.
    pub fn pattern(&self) -> Pattern {
        self.shared.lock().pattern.clone()
    }

    pub fn progress(&self) -> Progress {
        self.shared.lock().progress()
    }

    /// Receiver that sees every progress change.
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.shared.progress.subscribe()
    }

    pub fn cue_player(&self) -> &C {
        &self.shared.cues
    }
}

impl<C, P> Drop for Scheduler<C, P> {
    fn drop(&mut self) {
        // The task holds its own Arc, so it has to be told to stop
        self.shared.lock().cancel_run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_small_counts_whole() {
        assert_eq!(announcement_groups(0), vec![0]);
        assert_eq!(announcement_groups(7), vec![7]);
        assert_eq!(announcement_groups(20), vec![20]);
    }

    #[test]
    fn test_groups_large_counts_split() {
        assert_eq!(announcement_groups(21), vec![10, 10, 1]);
        assert_eq!(announcement_groups(25), vec![10, 10, 5]);
        assert_eq!(announcement_groups(30), vec![10, 10, 10, 0]);
        assert_eq!(announcement_groups(47), vec![10, 10, 10, 10, 7]);
    }

    #[test]
    fn test_groups_sum_to_count() {
        for count in 0..200 {
            assert_eq!(announcement_groups(count).iter().sum::<u32>(), count);
        }
    }

    #[test]
    fn test_initial_progress() {
        let pattern = Pattern::new("P", 3, 1, [("red", 1), ("blue", 2)]);
        let state = State::new(pattern);
        assert_eq!(
            state.progress(),
            Progress {
                status: PlaybackStatus::Idle,
                cursor: 0,
                bead_count: 2,
                read_count: 0,
            }
        );
    }
}
