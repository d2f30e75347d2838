//! Core data types shared between the sentinel pipeline and the relay.

use serde::{Deserialize, Serialize};

// ============================================================================
// Pose Data
// ============================================================================

/// One detected anatomical landmark in frame pixel coordinates.
///
/// Produced fresh for every frame by the pose capability; never retained
/// across frames except as part of the baseline snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    /// Detection confidence in [0, 1].
    pub score: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, score: f64) -> Self {
        Self { x, y, score }
    }
}

/// Ordered sequence of keypoints for one subject in one frame.
///
/// Positionally aligned across frames: index `i` always refers to the same
/// landmark. Two poses are only comparable at equal length.
pub type Pose = Vec<Keypoint>;

/// One observation from the pose capability.
///
/// Carries the frame dimensions alongside the detection because movement
/// scores are in raw frame pixels — a dimension change mid-game silently
/// rescales them (see the pipeline's mid-arming warning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFrame {
    pub width: u32,
    pub height: u32,
    /// Zero or one detected poses for this frame.
    #[serde(default)]
    pub pose: Option<Pose>,
}

// ============================================================================
// Signal State
// ============================================================================

/// The game signal. Movement is only monitored while `Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalState {
    /// Quiescent — players may move freely.
    Green,
    /// Armed — displacement against the baseline is a violation.
    Red,
}

impl SignalState {
    /// The opposite signal, used by the toggle timer.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Green => Self::Red,
            Self::Red => Self::Green,
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }
}

impl std::fmt::Display for SignalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "GREEN"),
            Self::Red => write!(f, "RED"),
        }
    }
}

// ============================================================================
// Hit Event
// ============================================================================

/// A movement violation observed during a RED period.
///
/// Transient — it only causes side effects (indicator, relay request, serial
/// write). The score that crossed the threshold is carried for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    /// Aggregate displacement in frame pixels.
    pub movement: f64,
}

// ============================================================================
// Relay Wire Types
// ============================================================================

/// Outcome of a report-hit request, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayStatus {
    /// The command was written to the actuator.
    Sent,
    /// The relay-side cooldown is active; no write was attempted.
    Cooldown,
    /// The serial write failed; the cooldown was not engaged.
    SerialError,
}

/// Response body for `POST /api/hit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitResponse {
    pub status: RelayStatus,
}
