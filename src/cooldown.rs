//! Timed mutual-exclusion flag used by the local hit arbiter and the relay.

use std::time::Duration;
use tokio::time::Instant;

/// A cooldown lock: once engaged, it rejects new triggers until a fixed
/// duration has elapsed. There is no early-release path — the lock clears
/// only by elapsed time.
///
/// The lock is deadline-based rather than timer-driven: callers pass the
/// current `Instant`, which keeps every transition testable with tokio's
/// paused clock and with explicit time values.
#[derive(Debug, Clone)]
pub struct CooldownLock {
    duration: Duration,
    held_until: Option<Instant>,
}

impl CooldownLock {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            held_until: None,
        }
    }

    /// True while the lock is held at `now`. The deadline itself is free:
    /// a trigger arriving exactly when the window ends is accepted.
    pub fn is_held(&self, now: Instant) -> bool {
        self.held_until.is_some_and(|until| now < until)
    }

    /// Engage the lock at `now` for the configured duration.
    pub fn engage(&mut self, now: Instant) {
        self.held_until = Some(now + self.duration);
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
