//! Game configuration — timing and threshold values as operator-tunable TOML.
//!
//! Every struct implements `Default` with values matching the original
//! constants, ensuring zero-change behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a deployment.
///
/// Load with `GameConfig::load()` which searches:
/// 1. `$REDLIGHT_CONFIG` env var
/// 2. `./redlight.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Signal timing and movement threshold
    #[serde(default)]
    pub game: GameRules,

    /// Relay server and serial channel
    #[serde(default)]
    pub relay: RelayConfig,

    /// Sentinel-side relay client
    #[serde(default)]
    pub client: ClientConfig,
}

/// Signal timing and the violation threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRules {
    /// Signal toggle interval in milliseconds
    pub toggle_interval_ms: u64,
    /// Aggregate displacement threshold in frame pixels
    pub movement_threshold: f64,
    /// Hit-hold window in milliseconds (indicator + local cooldown)
    pub hit_hold_ms: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            toggle_interval_ms: defaults::TOGGLE_INTERVAL_MS,
            movement_threshold: defaults::MOVEMENT_THRESHOLD_PX,
            hit_hold_ms: defaults::HIT_HOLD_MS,
        }
    }
}

/// Relay server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// HTTP listen address
    pub listen_addr: String,
    /// Relay-side cooldown window in milliseconds
    pub cooldown_ms: u64,
    /// Serial device path for the actuator
    pub serial_path: String,
    /// Serial baud rate
    pub baud_rate: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: defaults::RELAY_LISTEN_ADDR.to_string(),
            cooldown_ms: defaults::RELAY_COOLDOWN_MS,
            serial_path: defaults::SERIAL_PATH.to_string(),
            baud_rate: defaults::BAUD_RATE,
        }
    }
}

/// Sentinel-side relay client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Relay base URL
    pub relay_url: String,
    /// HTTP timeout in seconds
    pub http_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: defaults::RELAY_URL.to_string(),
            http_timeout_secs: defaults::RELAY_HTTP_TIMEOUT_SECS,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Default config file name searched in the working directory.
const CONFIG_FILE: &str = "redlight.toml";

impl GameConfig {
    /// Load configuration using the standard search order:
    /// 1. `$REDLIGHT_CONFIG` environment variable
    /// 2. `./redlight.toml` in the current working directory
    /// 3. Built-in defaults (original constants)
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("REDLIGHT_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from REDLIGHT_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from REDLIGHT_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "REDLIGHT_CONFIG points to non-existent file, falling back");
            }
        }

        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded config");
                    return config;
                }
                Err(e) => {
                    warn!(path = %local.display(), error = %e, "Failed to load config, using defaults");
                }
            }
        }

        info!("No config file found, using built-in defaults");
        Self::default()
    }

    /// Parse a TOML config file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Range-check the loaded values. Returns warnings, never errors —
    /// a suspicious config still runs.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.game.toggle_interval_ms == 0 {
            warnings.push("game.toggle_interval_ms is 0 — signal will thrash".to_string());
        }
        if self.game.movement_threshold <= 0.0 {
            warnings.push(format!(
                "game.movement_threshold = {} — every armed frame after baseline will hit",
                self.game.movement_threshold
            ));
        }
        if self.game.hit_hold_ms == 0 {
            warnings.push("game.hit_hold_ms is 0 — hits will re-trigger every frame".to_string());
        }
        if self.relay.cooldown_ms == 0 {
            warnings.push("relay.cooldown_ms is 0 — actuator is unprotected".to_string());
        }
        if self.relay.baud_rate < 9_600 {
            warnings.push(format!(
                "relay.baud_rate = {} is unusually low",
                self.relay.baud_rate
            ));
        }

        warnings
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
