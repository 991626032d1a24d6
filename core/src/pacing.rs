//! Pacing multiplier source

use std::time::Duration;

use tokio::sync::watch;

use crate::config::{DEFAULT_SPEED, PlaybackConfig};

/// Supplies the seconds-per-bead multiplier.
///
/// Read once at the start of every wait, so a change applies to the next
/// wait rather than the one already running.
pub trait Pacing: Send + Sync + 'static {
    fn seconds_per_unit(&self) -> f64;
}

/// Fixed pacing
impl Pacing for f64 {
    fn seconds_per_unit(&self) -> f64 {
        *self
    }
}

/// Live pacing from the settings channel
impl Pacing for watch::Receiver<PlaybackConfig> {
    fn seconds_per_unit(&self) -> f64 {
        self.borrow().speed()
    }
}

/// Wait that gives the user time to string `units` beads.
///
/// Non-finite or non-positive multipliers fall back to [`DEFAULT_SPEED`].
pub fn wait_for(seconds_per_unit: f64, units: u32) -> Duration {
    let speed = if seconds_per_unit.is_finite() && seconds_per_unit > 0.0 {
        seconds_per_unit
    } else {
        DEFAULT_SPEED
    };
    Duration::try_from_secs_f64(speed * f64::from(units)).unwrap_or(Duration::MAX)
}
