//! Signal/violation state machine.
//!
//! This is the only part of the system with real state and timing invariants:
//! the RED/GREEN signal, the frozen baseline pose, the movement-score
//! threshold decision, and the local cooldown arbitration that keeps a single
//! violation from re-triggering every frame.

mod detector;
mod session;

pub use detector::{capture_reference, movement_score, GameError, ReferencePose};
pub use session::{FrameVerdict, GameSession};
