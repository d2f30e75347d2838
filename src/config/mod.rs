//! Game Configuration Module
//!
//! Provides deployment configuration loaded from TOML files, replacing
//! hardcoded timing and threshold values with operator-tunable ones.
//!
//! ## Loading Order
//!
//! 1. `REDLIGHT_CONFIG` environment variable (path to TOML file)
//! 2. `redlight.toml` in the current working directory
//! 3. Built-in defaults (matching the original constants)
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(GameConfig::load());
//!
//! // Anywhere in the codebase:
//! let threshold = config::get().game.movement_threshold;
//! ```

mod game_config;
pub mod defaults;

pub use game_config::*;

use std::sync::OnceLock;

/// Global game configuration, initialized once at startup.
static GAME_CONFIG: OnceLock<GameConfig> = OnceLock::new();

/// Initialize the global game configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: GameConfig) {
    if GAME_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global game configuration.
///
/// Panics if `init()` has not been called. This is by design — a missing
/// config is a fatal startup error, not a recoverable condition.
pub fn get() -> &'static GameConfig {
    GAME_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    GAME_CONFIG.get().is_some()
}
