//! Single-owner game state: signal, baseline, local cooldown, hit release.
//!
//! All mutable game state lives in [`GameSession`] and is driven by explicit
//! calls with explicit `now` values — no free-floating globals, no timers
//! inside. The game loop owns the session and supplies the clock, which is
//! what makes the state machine testable without a running signal timer or
//! a network stack.

use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

use super::detector::{self, GameError, ReferencePose};
use crate::cooldown::CooldownLock;
use crate::types::{HitEvent, Keypoint, SignalState};

/// Outcome of observing one pose frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameVerdict {
    /// Signal is green — nothing to compare against.
    Quiescent,
    /// First armed frame: baseline captured. Never a hit, regardless of
    /// the frame's content.
    BaselineCaptured,
    /// Displacement stayed at or below the threshold, or the local
    /// cooldown suppressed the decision.
    Still { movement: f64 },
    /// Aggregate displacement exceeded the threshold with the cooldown free.
    Hit(HitEvent),
}

pub struct GameSession {
    signal: SignalState,
    reference: Option<ReferencePose>,
    /// Local cooldown. Engaged on hit, expires after the hit-hold window.
    cooldown: CooldownLock,
    movement_threshold: f64,
    hit_hold: Duration,
    /// When the current hit resolves: indicator off, baseline cleared.
    /// The cooldown lock expires at the same instant by construction.
    release_at: Option<Instant>,
    hit_visible: bool,
}

impl GameSession {
    /// A new session starts GREEN with no baseline.
    pub fn new(movement_threshold: f64, hit_hold: Duration) -> Self {
        Self {
            signal: SignalState::Green,
            reference: None,
            cooldown: CooldownLock::new(hit_hold),
            movement_threshold,
            hit_hold,
            release_at: None,
            hit_visible: false,
        }
    }

    pub fn signal(&self) -> SignalState {
        self.signal
    }

    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    pub fn hit_visible(&self) -> bool {
        self.hit_visible
    }

    pub fn cooldown_held(&self, now: Instant) -> bool {
        self.cooldown.is_held(now)
    }

    /// Flip the signal. The baseline is cleared unconditionally — arming
    /// starts a fresh capture, disarming invalidates the old one.
    pub fn toggle_signal(&mut self) -> SignalState {
        self.signal = self.signal.toggled();
        self.reference = None;
        self.signal
    }

    /// Score one pose frame against the session state.
    ///
    /// Only decides while RED: the first armed frame captures the baseline,
    /// later frames compare against it. The baseline is fixed for the whole
    /// armed period — it is never advanced by observation.
    pub fn observe(
        &mut self,
        pose: &[Keypoint],
        now: Instant,
    ) -> Result<FrameVerdict, GameError> {
        if !self.signal.is_red() {
            return Ok(FrameVerdict::Quiescent);
        }

        if pose.is_empty() {
            return Err(GameError::InvalidPoseShape {
                got: 0,
                expected: self.reference.as_ref().map_or(0, Vec::len),
            });
        }

        match &self.reference {
            None => {
                self.reference = Some(detector::capture_reference(pose));
                Ok(FrameVerdict::BaselineCaptured)
            }
            Some(reference) => {
                let movement = detector::movement_score(pose, reference)?;
                if movement > self.movement_threshold && !self.cooldown.is_held(now) {
                    Ok(FrameVerdict::Hit(HitEvent { movement }))
                } else {
                    Ok(FrameVerdict::Still { movement })
                }
            }
        }
    }

    /// Consume a hit: engage the local cooldown, light the indicator, and
    /// arm the release deadline.
    ///
    /// Re-checks the cooldown even though [`observe`](Self::observe) already
    /// gated on it — a hit that slips in while the lock is held is dropped,
    /// never double-triggered. Returns whether the hit was accepted; the
    /// caller issues at most one relay request per `true`.
    pub fn arbitrate_hit(&mut self, now: Instant) -> bool {
        if self.cooldown.is_held(now) {
            warn!("Hit event dropped — local cooldown already held");
            return false;
        }

        self.cooldown.engage(now);
        self.hit_visible = true;
        self.release_at = Some(now + self.hit_hold);
        true
    }

    /// Deadline for the pending hit resolution, if one is armed.
    pub fn release_deadline(&self) -> Option<Instant> {
        self.release_at
    }

    /// Resolve the hit once its hold window has elapsed: hide the indicator
    /// and clear the baseline so the next armed frame recaptures a fresh one
    /// instead of comparing against a stale snapshot. The cooldown lock
    /// expires on its own at the same instant.
    pub fn resolve_if_due(&mut self, now: Instant) -> bool {
        match self.release_at {
            Some(at) if now >= at => {
                self.release_at = None;
                self.hit_visible = false;
                self.reference = None;
                true
            }
            _ => false,
        }
    }
}
