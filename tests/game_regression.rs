//! Game Loop Regression Tests
//!
//! Drives the full client loop (signal timer, detector, arbiter, feedback)
//! over scripted pose frames on tokio's paused clock. The `biased` select in
//! the loop makes timer/frame ordering at equal instants deterministic, so
//! these scenarios are exact.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use redlight::game::GameSession;
use redlight::pipeline::source::ScriptedSource;
use redlight::pipeline::GameLoop;
use redlight::render::FeedbackSink;
use redlight::types::{Keypoint, PoseFrame, SignalState};

// ============================================================================
// Recording Sink
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Signal(SignalState),
    Indicator(bool),
}

#[derive(Clone)]
struct RecordingSink(Arc<Mutex<Vec<Event>>>);

impl RecordingSink {
    fn new() -> (Self, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (Self(Arc::clone(&events)), events)
    }
}

impl FeedbackSink for RecordingSink {
    fn signal_changed(&mut self, state: SignalState) {
        self.0.lock().unwrap().push(Event::Signal(state));
    }

    fn set_hit_indicator(&mut self, visible: bool) {
        self.0.lock().unwrap().push(Event::Indicator(visible));
    }

    fn draw_pose(&mut self, _pose: &[Keypoint]) {}
}

// ============================================================================
// Frame Builders
// ============================================================================

fn frame(points: &[(f64, f64)]) -> PoseFrame {
    PoseFrame {
        width: 640,
        height: 480,
        pose: Some(
            points
                .iter()
                .map(|&(x, y)| Keypoint::new(x, y, 0.9))
                .collect(),
        ),
    }
}

/// Two keypoints at rest.
fn still() -> PoseFrame {
    frame(&[(100.0, 100.0), (200.0, 200.0)])
}

/// Both keypoints shifted 200px: aggregate displacement 400, over threshold.
fn moved() -> PoseFrame {
    frame(&[(300.0, 100.0), (400.0, 200.0)])
}

const TOGGLE: Duration = Duration::from_millis(1000);
const HIT_HOLD: Duration = Duration::from_millis(1500);
const THRESHOLD: f64 = 260.0;
const FRAME_DELAY_MS: u64 = 250;

fn game_loop(sink: RecordingSink) -> GameLoop {
    GameLoop::new(
        GameSession::new(THRESHOLD, HIT_HOLD),
        Box::new(sink),
        None,
        CancellationToken::new(),
        TOGGLE,
    )
}

// ============================================================================
// Scenarios
// ============================================================================

/// One full cycle: GREEN period, arming, baseline, hit, cooldown suppression,
/// disarm, hit resolution, re-arm with fresh baseline.
///
/// Timeline (frames every 250ms, toggle every 1000ms, hold 1500ms):
///   t=0..750     GREEN, frames quiescent
///   t=1000       toggle RED; same-instant frame captures baseline
///   t=1250       moved frame -> HIT (indicator on)
///   t=1500,1750  moved frames suppressed by local cooldown
///   t=2000       toggle GREEN
///   t=2750       hit resolves (indicator off)
///   t=3000       toggle RED; same-instant frame captures baseline #2
///   t=3250       last frame, then EOF
#[tokio::test(start_paused = true)]
async fn test_full_cycle_single_hit() {
    let (sink, events) = RecordingSink::new();

    let frames = vec![
        still(), // t=0
        still(), // t=250
        still(), // t=500
        still(), // t=750
        still(), // t=1000  baseline
        moved(), // t=1250  hit
        moved(), // t=1500  suppressed
        moved(), // t=1750  suppressed
        still(), // t=2000  green
        still(), // t=2250
        still(), // t=2500
        still(), // t=2750  after release
        still(), // t=3000  baseline #2
        still(), // t=3250
    ];
    let mut source = ScriptedSource::new(frames, FRAME_DELAY_MS);

    let stats = game_loop(sink).run(&mut source).await;

    assert_eq!(stats.frames_processed, 14);
    assert_eq!(stats.poses_seen, 14);
    assert_eq!(stats.toggles, 3);
    assert_eq!(stats.baselines_captured, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.invalid_frames, 0);

    let events = events.lock().unwrap();
    assert_eq!(
        events.as_slice(),
        &[
            Event::Signal(SignalState::Red),
            Event::Indicator(true),
            Event::Signal(SignalState::Green),
            Event::Indicator(false),
            Event::Signal(SignalState::Red),
        ]
    );
}

/// A mismatched pose is skipped without killing the loop, and detection
/// continues against the intact baseline.
#[tokio::test(start_paused = true)]
async fn test_shape_mismatch_skips_frame_and_continues() {
    let (sink, events) = RecordingSink::new();

    let frames = vec![
        still(),                  // t=0     green
        still(),                  // t=250
        still(),                  // t=500
        still(),                  // t=750
        still(),                  // t=1000  baseline
        frame(&[(100.0, 100.0)]), // t=1250  wrong cardinality
        moved(),                  // t=1500  hit
    ];
    let mut source = ScriptedSource::new(frames, FRAME_DELAY_MS);

    let stats = game_loop(sink).run(&mut source).await;

    assert_eq!(stats.invalid_frames, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.baselines_captured, 1);

    let events = events.lock().unwrap();
    assert!(events.contains(&Event::Indicator(true)));
}

/// Frames without a detected pose advance the loop but never reach the
/// detector — no baseline, no hit.
#[tokio::test(start_paused = true)]
async fn test_undetected_frames_are_inert() {
    let (sink, events) = RecordingSink::new();

    let empty = PoseFrame {
        width: 640,
        height: 480,
        pose: None,
    };
    let frames = vec![
        empty.clone(), // t=0
        empty.clone(), // t=250
        empty.clone(), // t=500
        empty.clone(), // t=750
        empty.clone(), // t=1000  red, but nothing to capture
        empty,         // t=1250
    ];
    let mut source = ScriptedSource::new(frames, FRAME_DELAY_MS);

    let stats = game_loop(sink).run(&mut source).await;

    assert_eq!(stats.frames_processed, 6);
    assert_eq!(stats.poses_seen, 0);
    assert_eq!(stats.baselines_captured, 0);
    assert_eq!(stats.hits, 0);

    let events = events.lock().unwrap();
    assert_eq!(events.as_slice(), &[Event::Signal(SignalState::Red)]);
}

/// Cancellation stops the loop promptly even with frames pending.
#[tokio::test(start_paused = true)]
async fn test_cancellation_stops_loop() {
    let (sink, _events) = RecordingSink::new();
    let cancel_token = CancellationToken::new();

    let game_loop = GameLoop::new(
        GameSession::new(THRESHOLD, HIT_HOLD),
        Box::new(sink),
        None,
        cancel_token.clone(),
        TOGGLE,
    );

    cancel_token.cancel();

    let frames = vec![still(); 100];
    let mut source = ScriptedSource::new(frames, FRAME_DELAY_MS);
    let stats = game_loop.run(&mut source).await;

    assert_eq!(stats.frames_processed, 0);
}
