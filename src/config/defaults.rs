//! System-wide default constants.
//!
//! Centralises the timing and threshold values so the config structs and the
//! docs agree on a single source.

// ============================================================================
// Game
// ============================================================================

/// Signal toggle interval (ms). One full RED or GREEN period.
pub const TOGGLE_INTERVAL_MS: u64 = 4_000;

/// Aggregate displacement threshold for a hit, in frame pixels.
pub const MOVEMENT_THRESHOLD_PX: f64 = 260.0;

/// Hit-hold window (ms): how long the indicator stays lit and the local
/// cooldown suppresses re-triggering. The baseline is recaptured after.
pub const HIT_HOLD_MS: u64 = 1_500;

// ============================================================================
// Relay
// ============================================================================

/// Relay HTTP listen address.
pub const RELAY_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Relay-side cooldown window (ms), independent of the client's pacing.
pub const RELAY_COOLDOWN_MS: u64 = 1_000;

/// Serial device path for the actuator.
pub const SERIAL_PATH: &str = "/dev/ttyUSB0";

/// Serial baud rate.
pub const BAUD_RATE: u32 = 115_200;

// ============================================================================
// Client
// ============================================================================

/// Relay base URL for the sentinel's hit reports.
pub const RELAY_URL: &str = "http://localhost:3000";

/// HTTP client timeout for relay requests (seconds).
pub const RELAY_HTTP_TIMEOUT_SECS: u64 = 5;
