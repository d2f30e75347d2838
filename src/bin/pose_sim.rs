//! Pose stream simulation.
//!
//! Generates a synthetic single-subject pose stream for testing redlight
//! without a camera or pose model: a standing subject with small detection
//! jitter, lunging sideways at a fixed cadence. Frames are written to stdout
//! as JSON lines; pipe them into the sentinel:
//!
//! ```bash
//! pose-sim --fps 10 | redlight --stdin
//! ```

use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::io::{self, Write};
use std::time::Duration;

use redlight::types::{Keypoint, PoseFrame};

// ============================================================================
// Subject Layout
// ============================================================================

/// Frame width (px)
const FRAME_WIDTH: u32 = 640;
/// Frame height (px)
const FRAME_HEIGHT: u32 = 480;

/// Base standing pose: 17 landmarks (nose, eyes, ears, shoulders, elbows,
/// wrists, hips, knees, ankles) centered in the frame.
const BASE_POSE: [(f64, f64); 17] = [
    (320.0, 80.0),  // nose
    (310.0, 72.0),  // left eye
    (330.0, 72.0),  // right eye
    (298.0, 78.0),  // left ear
    (342.0, 78.0),  // right ear
    (280.0, 140.0), // left shoulder
    (360.0, 140.0), // right shoulder
    (262.0, 200.0), // left elbow
    (378.0, 200.0), // right elbow
    (254.0, 258.0), // left wrist
    (386.0, 258.0), // right wrist
    (292.0, 260.0), // left hip
    (348.0, 260.0), // right hip
    (288.0, 350.0), // left knee
    (352.0, 350.0), // right knee
    (286.0, 440.0), // left ankle
    (354.0, 440.0), // right ankle
];

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "pose-sim")]
#[command(about = "Synthetic pose stream for redlight testing")]
#[command(version)]
struct Args {
    /// Output frame rate in Hz
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=120))]
    fps: u32,

    /// Total frames to emit (0 = run until killed)
    #[arg(long, default_value = "0")]
    frames: u64,

    /// Seconds between lunges
    #[arg(long, default_value = "9")]
    lunge_every_secs: u64,

    /// Sideways lunge distance per keypoint (px)
    #[arg(long, default_value = "40.0")]
    lunge_px: f64,

    /// Frames a lunge lasts
    #[arg(long, default_value = "5")]
    lunge_frames: u64,

    /// Detection jitter standard deviation (px)
    #[arg(long, default_value = "0.8")]
    jitter_px: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Emit frames as fast as possible (no pacing)
    #[arg(long)]
    no_pacing: bool,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let jitter = Normal::new(0.0, args.jitter_px.max(0.0)).expect("finite jitter std dev");

    let frame_delay = Duration::from_millis(u64::from(1000 / args.fps));
    let lunge_period = args.lunge_every_secs * u64::from(args.fps);

    tracing::info!(
        fps = args.fps,
        lunge_every_secs = args.lunge_every_secs,
        lunge_px = args.lunge_px,
        "Emitting synthetic pose frames"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut frame_idx: u64 = 0;

    loop {
        if args.frames > 0 && frame_idx >= args.frames {
            break;
        }

        // Lunge sideways for a burst of frames once per period.
        let in_lunge = lunge_period > 0 && frame_idx % lunge_period < args.lunge_frames;
        let dx = if in_lunge { args.lunge_px } else { 0.0 };

        let pose: Vec<Keypoint> = BASE_POSE
            .iter()
            .map(|&(x, y)| {
                Keypoint::new(
                    x + dx + jitter.sample(&mut rng),
                    y + jitter.sample(&mut rng),
                    0.55 + 0.4 * rng.gen::<f64>(),
                )
            })
            .collect();

        let frame = PoseFrame {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            pose: Some(pose),
        };

        serde_json::to_writer(&mut out, &frame)?;
        out.write_all(b"\n")?;
        out.flush()?;

        frame_idx += 1;
        if !args.no_pacing {
            std::thread::sleep(frame_delay);
        }
    }

    tracing::info!(frames = frame_idx, "Simulation complete");
    Ok(())
}
