//! Unified frame processing loop.
//!
//! Runs the whole client side on one logical task: the signal toggle timer,
//! per-frame violation detection, hit arbitration with visual feedback, and
//! the pending-hit release deadline. Relay requests are spawned so the frame
//! path never waits on the network.

use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::source::{PoseEvent, PoseSource};
use crate::game::{FrameVerdict, GameSession};
use crate::relay::RelayClient;
use crate::render::FeedbackSink;
use crate::types::RelayStatus;

// ============================================================================
// Loop Statistics
// ============================================================================

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub frames_processed: u64,
    pub poses_seen: u64,
    pub toggles: u64,
    pub baselines_captured: u64,
    pub hits: u64,
    pub invalid_frames: u64,
}

// ============================================================================
// Game Loop
// ============================================================================

/// Owns all state needed for the client-side frame loop.
///
/// Built with [`new()`](GameLoop::new), then consumed by
/// [`run()`](GameLoop::run).
pub struct GameLoop {
    session: GameSession,
    sink: Box<dyn FeedbackSink>,
    relay: Option<RelayClient>,
    cancel_token: CancellationToken,
    toggle_interval: Duration,
}

/// What woke the loop this iteration.
enum LoopEvent {
    Toggle,
    Release,
    Frame(PoseEvent),
}

impl GameLoop {
    pub fn new(
        session: GameSession,
        sink: Box<dyn FeedbackSink>,
        relay: Option<RelayClient>,
        cancel_token: CancellationToken,
        toggle_interval: Duration,
    ) -> Self {
        Self {
            session,
            sink,
            relay,
            cancel_token,
            toggle_interval,
        }
    }

    /// Run the loop until the source is exhausted or cancellation.
    ///
    /// Returns final statistics.
    pub async fn run<S: PoseSource>(mut self, source: &mut S) -> GameStats {
        let mut stats = GameStats::default();
        // Dimensions at baseline capture, for the mid-RED resize warning.
        let mut baseline_dims: Option<(u32, u32)> = None;

        let mut toggle = tokio::time::interval(self.toggle_interval);
        toggle.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; consume the first tick so the game
        // opens with a full GREEN period.
        toggle.tick().await;

        info!(
            "🎮 Watching pose frames from {}...",
            source.source_name()
        );
        info!(signal = %self.session.signal(), "Game started");

        loop {
            let release_at = self.session.release_deadline();

            // biased: timer events win over a frame arriving the same instant,
            // so a toggle or release is applied before the frame is scored.
            let event = tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => {
                    info!("[GameLoop] Shutdown signal received");
                    break;
                }
                _ = toggle.tick() => LoopEvent::Toggle,
                () = sleep_until_or_never(release_at) => LoopEvent::Release,
                result = source.next_frame() => match result {
                    Ok(ev) => LoopEvent::Frame(ev),
                    Err(e) => {
                        warn!("[GameLoop] Source error: {}", e);
                        break;
                    }
                },
            };

            match event {
                LoopEvent::Toggle => {
                    let state = self.session.toggle_signal();
                    stats.toggles += 1;
                    baseline_dims = None;
                    self.sink.signal_changed(state);
                }

                LoopEvent::Release => {
                    if self.session.resolve_if_due(Instant::now()) {
                        baseline_dims = None;
                        self.sink.set_hit_indicator(false);
                        debug!("Hit resolved — baseline recapture pending");
                    }
                }

                LoopEvent::Frame(PoseEvent::Eof) => {
                    info!(
                        "[GameLoop] Source reached end ({} frames processed)",
                        stats.frames_processed
                    );
                    break;
                }

                LoopEvent::Frame(PoseEvent::Frame(frame)) => {
                    stats.frames_processed += 1;

                    let Some(pose) = frame.pose else {
                        continue;
                    };
                    stats.poses_seen += 1;
                    self.sink.draw_pose(&pose);

                    if self.session.signal().is_red() {
                        if let Some(dims) = baseline_dims {
                            if dims != (frame.width, frame.height) {
                                warn!(
                                    baseline_width = dims.0,
                                    baseline_height = dims.1,
                                    width = frame.width,
                                    height = frame.height,
                                    "Frame dimensions changed mid-RED — raw-pixel movement scale shifted"
                                );
                                baseline_dims = Some((frame.width, frame.height));
                            }
                        }
                    }

                    let now = Instant::now();
                    match self.session.observe(&pose, now) {
                        Ok(FrameVerdict::BaselineCaptured) => {
                            stats.baselines_captured += 1;
                            baseline_dims = Some((frame.width, frame.height));
                            debug!("Baseline captured ({} keypoints)", pose.len());
                        }
                        Ok(FrameVerdict::Hit(hit)) => {
                            if self.session.arbitrate_hit(now) {
                                stats.hits += 1;
                                self.sink.set_hit_indicator(true);
                                info!(
                                    movement = format_args!("{:.1}", hit.movement),
                                    "❌ Moved during RED — HIT"
                                );
                                self.dispatch_relay();
                            }
                        }
                        Ok(FrameVerdict::Still { .. } | FrameVerdict::Quiescent) => {}
                        Err(e) => {
                            stats.invalid_frames += 1;
                            warn!("[GameLoop] Skipping frame: {}", e);
                        }
                    }
                }
            }
        }

        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!("📊 FINAL STATISTICS");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!("   Frames Processed:   {}", stats.frames_processed);
        info!("   Poses Seen:         {}", stats.poses_seen);
        info!("   Signal Toggles:     {}", stats.toggles);
        info!("   Baselines Captured: {}", stats.baselines_captured);
        info!("   Hits:               {}", stats.hits);
        info!("   Invalid Frames:     {}", stats.invalid_frames);
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        stats
    }

    /// Fire the relay request on its own task. At most one per accepted hit,
    /// which the arbiter guarantees is at most one per cooldown window.
    fn dispatch_relay(&self) {
        let Some(client) = self.relay.clone() else {
            return;
        };
        tokio::spawn(async move {
            match client.report_hit().await {
                Ok(RelayStatus::Sent) => info!("Relay accepted hit"),
                Ok(RelayStatus::Cooldown) => debug!("Relay throttled hit"),
                Ok(RelayStatus::SerialError) => warn!("Relay could not reach actuator"),
                Err(e) => warn!("Relay request failed: {}", e),
            }
        });
    }
}

/// Sleep until the deadline, or forever when none is armed.
async fn sleep_until_or_never(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => futures::future::pending().await,
    }
}
