//! redlight - red-light/green-light motion sentinel
//!
//! Consumes pose frames (JSON lines), runs the RED/GREEN signal and the
//! violation detector, and reports hits to the actuator relay.
//!
//! # Usage
//!
//! ```bash
//! # Live pose stream on stdin
//! pose-sim | redlight --stdin
//!
//! # Replay a recorded pose file at 4x
//! redlight --replay session.jsonl --frame-delay-ms 25
//!
//! # Local feedback only, no actuator
//! pose-sim | redlight --stdin --no-relay
//! ```
//!
//! # Environment Variables
//!
//! - `REDLIGHT_CONFIG`: Path to a TOML config file (default: ./redlight.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use redlight::config;
use redlight::game::GameSession;
use redlight::pipeline::source::{ScriptedSource, StdinSource};
use redlight::pipeline::GameLoop;
use redlight::relay::RelayClient;
use redlight::render::ConsoleFeedback;
use redlight::types::PoseFrame;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "redlight")]
#[command(about = "Red-light/green-light motion referee")]
#[command(version)]
struct CliArgs {
    /// Read pose frames from stdin (JSON lines)
    /// Use with the simulator: pose-sim | redlight --stdin
    #[arg(long)]
    stdin: bool,

    /// Replay pose frames from a JSON-lines file
    #[arg(long, value_name = "PATH")]
    replay: Option<String>,

    /// Inter-frame delay for replay mode in milliseconds (0 = no pacing)
    #[arg(long, default_value = "100")]
    frame_delay_ms: u64,

    /// Override the relay base URL (default from config)
    #[arg(long)]
    relay_url: Option<String>,

    /// Disable the actuator relay (local feedback only)
    #[arg(long)]
    no_relay: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let game_config = config::GameConfig::load();
    for warning in game_config.validate() {
        warn!("Config: {}", warning);
    }
    config::init(game_config);
    let cfg = config::get();

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  redlight — red-light/green-light motion referee");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "  Toggle: {}ms | Threshold: {:.0}px | Hit hold: {}ms",
        cfg.game.toggle_interval_ms, cfg.game.movement_threshold, cfg.game.hit_hold_ms
    );
    info!("");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let relay = if args.no_relay {
        info!("📡 Relay: disabled (--no-relay)");
        None
    } else {
        let url = args
            .relay_url
            .unwrap_or_else(|| cfg.client.relay_url.clone());
        info!("📡 Relay: {}", url);
        Some(RelayClient::new(
            &url,
            Duration::from_secs(cfg.client.http_timeout_secs),
        ))
    };

    let session = GameSession::new(
        cfg.game.movement_threshold,
        Duration::from_millis(cfg.game.hit_hold_ms),
    );
    let game_loop = GameLoop::new(
        session,
        Box::new(ConsoleFeedback),
        relay,
        cancel_token,
        Duration::from_millis(cfg.game.toggle_interval_ms),
    );

    // Dispatch to the loop with the appropriate source
    let stats = if let Some(path) = args.replay {
        let frames = load_frames(&path)?;
        info!(
            "📥 Input: replay ({} frames from {}, {}ms between frames)",
            frames.len(),
            path,
            args.frame_delay_ms
        );
        let mut source = ScriptedSource::new(frames, args.frame_delay_ms);
        game_loop.run(&mut source).await
    } else {
        if !args.stdin {
            info!("No input flag given — defaulting to stdin");
        }
        info!("📥 Input: stdin (JSON pose frames)");
        let mut source = StdinSource::new();
        game_loop.run(&mut source).await
    };

    if stats.frames_processed == 0 {
        warn!("No frames were processed — check the input source");
    }

    Ok(())
}

/// Load a JSON-lines pose recording into memory.
fn load_frames(path: &str) -> Result<Vec<PoseFrame>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read replay file {path}"))?;

    let mut frames = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let frame: PoseFrame = serde_json::from_str(line)
            .with_context(|| format!("Invalid pose frame at {path}:{}", idx + 1))?;
        frames.push(frame);
    }

    if frames.is_empty() {
        anyhow::bail!("Replay file {path} contains no frames");
    }
    Ok(frames)
}
