//! Visual feedback boundary: status label, hit indicator, keypoint overlay.
//!
//! The overlay is a pure sink — it holds no decision logic. Note the
//! asymmetry with scoring: the overlay drops low-confidence keypoints for
//! display, while the movement score counts every keypoint. Keep the filter
//! here; `game` must never import it.

use tracing::{debug, info, trace};

use crate::types::{Keypoint, SignalState};

/// Minimum confidence for a keypoint to be drawn. Display only.
pub const DISPLAY_SCORE_MIN: f64 = 0.4;

/// Sink for game-visible feedback.
pub trait FeedbackSink: Send {
    /// The signal flipped; update the status label.
    fn signal_changed(&mut self, state: SignalState);

    /// Show or hide the hit indicator.
    fn set_hit_indicator(&mut self, visible: bool);

    /// Render the keypoint overlay for one frame.
    fn draw_pose(&mut self, pose: &[Keypoint]);
}

// ============================================================================
// Console Feedback
// ============================================================================

/// Terminal feedback via tracing — stands in for the canvas overlay.
pub struct ConsoleFeedback;

impl FeedbackSink for ConsoleFeedback {
    fn signal_changed(&mut self, state: SignalState) {
        match state {
            SignalState::Red => info!("🔴 RED — hold still"),
            SignalState::Green => info!("🟢 GREEN — move freely"),
        }
    }

    fn set_hit_indicator(&mut self, visible: bool) {
        if visible {
            info!("🔥 HIT");
        } else {
            debug!("Hit indicator cleared");
        }
    }

    fn draw_pose(&mut self, pose: &[Keypoint]) {
        let drawn = pose
            .iter()
            .filter(|kp| kp.score > DISPLAY_SCORE_MIN)
            .count();
        trace!(
            keypoints = pose.len(),
            drawn = drawn,
            "Overlay frame"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_filter_threshold() {
        let pose = [
            Keypoint::new(0.0, 0.0, 0.41),
            Keypoint::new(0.0, 0.0, 0.4),
            Keypoint::new(0.0, 0.0, 0.1),
        ];
        let drawn = pose
            .iter()
            .filter(|kp| kp.score > DISPLAY_SCORE_MIN)
            .count();

        // Strictly greater than 0.4, matching the overlay contract.
        assert_eq!(drawn, 1);
    }
}
