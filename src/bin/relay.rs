//! Actuator relay server.
//!
//! Accepts hit reports over HTTP and forwards them to the physical actuator
//! over a serial link, enforcing its own cooldown so duplicate or contending
//! clients cannot overrun the channel.
//!
//! # Usage
//!
//! ```bash
//! relay --serial /dev/ttyUSB0 --baud 115200
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use redlight::config;
use redlight::relay::{relay_app, RelayState, UartLink};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(about = "Hit relay: HTTP endpoint to serial actuator")]
#[command(version)]
struct CliArgs {
    /// Override the listen address (default from config)
    #[arg(short, long)]
    addr: Option<String>,

    /// Override the serial device path (default from config)
    #[arg(long)]
    serial: Option<String>,

    /// Override the serial baud rate (default from config)
    #[arg(long)]
    baud: Option<u32>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
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
        tracing::warn!("Config: {}", warning);
    }
    config::init(game_config);
    let cfg = config::get();

    let addr = args.addr.unwrap_or_else(|| cfg.relay.listen_addr.clone());
    let serial_path = args
        .serial
        .unwrap_or_else(|| cfg.relay.serial_path.clone());
    let baud_rate = args.baud.unwrap_or(cfg.relay.baud_rate);

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  redlight relay — hit forwarding to actuator");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("");

    // The serial channel opens once at startup. No retry policy: a relay
    // that cannot reach its actuator has nothing to offer.
    let link = UartLink::open(&serial_path, baud_rate)
        .with_context(|| format!("Failed to open serial port {serial_path}"))?;

    let state = RelayState::new(
        Box::new(link),
        std::time::Duration::from_millis(cfg.relay.cooldown_ms),
    );
    let app = relay_app(state);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("✓ Relay listening on {}", addr);
    info!("   POST /api/hit — report a violation");
    info!("   GET  /health  — liveness and counters");
    info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await
        .context("HTTP server error")?;

    info!("[HttpServer] Graceful shutdown complete");
    Ok(())
}
