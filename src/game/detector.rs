//! Movement scoring against the frozen baseline pose.

use thiserror::Error;

use crate::types::Keypoint;

/// Baseline snapshot: one `(x, y)` pair per landmark, captured at arming
/// time. Confidence scores are discarded — the baseline is pure geometry.
pub type ReferencePose = Vec<(f64, f64)>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The current pose cannot be compared against the stored reference.
    /// Recoverable: the frame is skipped, the loop continues.
    #[error("pose has {got} keypoints, reference has {expected}")]
    InvalidPoseShape { got: usize, expected: usize },
}

/// Snapshot a pose as the zero-movement reference.
pub fn capture_reference(pose: &[Keypoint]) -> ReferencePose {
    pose.iter().map(|k| (k.x, k.y)).collect()
}

/// Aggregate displacement: the sum of Euclidean distances between
/// positionally-matched keypoints, in frame pixels.
///
/// Every keypoint contributes regardless of its confidence score. The
/// display overlay filters low-confidence points, this score does not —
/// the two paths are intentionally different.
pub fn movement_score(
    current: &[Keypoint],
    reference: &ReferencePose,
) -> Result<f64, GameError> {
    if current.is_empty() || current.len() != reference.len() {
        return Err(GameError::InvalidPoseShape {
            got: current.len(),
            expected: reference.len(),
        });
    }

    Ok(current
        .iter()
        .zip(reference.iter())
        .map(|(kp, &(rx, ry))| {
            let dx = kp.x - rx;
            let dy = kp.y - ry;
            dx.hypot(dy)
        })
        .sum())
}
