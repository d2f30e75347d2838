//! Serial link to the physical actuator.
//!
//! One command token per accepted hit, no acknowledgment read back. The port
//! is opened once at startup; a failed open is fatal for the relay process.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::info;

/// Command line written per accepted hit.
pub const HIT_COMMAND: &[u8] = b"HIT\n";

#[derive(Debug, Error)]
pub enum LinkError {
    /// Startup-only failure; there is no retry-open policy.
    #[error("failed to open serial port {path}: {reason}")]
    Open { path: String, reason: String },

    /// A write failed; the relay stays up and the cooldown is not engaged.
    #[error("serial write failed: {0}")]
    Write(String),
}

/// Trait abstracting the actuator channel.
///
/// The relay service holds the link behind its state mutex, so implementations
/// only need `Send`.
#[async_trait]
pub trait SerialLink: Send {
    /// Write one command line to the actuator.
    async fn write_command(&mut self, command: &[u8]) -> Result<(), LinkError>;

    /// Human-readable name for logging (e.g. "/dev/ttyUSB0").
    fn link_name(&self) -> &str;
}

// ============================================================================
// UART Link
// ============================================================================

/// Production link over a UART serial port.
pub struct UartLink {
    stream: SerialStream,
    path: String,
}

impl UartLink {
    /// Open the port once at startup.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, LinkError> {
        let stream = tokio_serial::new(path, baud_rate)
            .open_native_async()
            .map_err(|e| LinkError::Open {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        info!(path = %path, baud = baud_rate, "✓ Serial link connected");

        Ok(Self {
            stream,
            path: path.to_string(),
        })
    }
}

#[async_trait]
impl SerialLink for UartLink {
    async fn write_command(&mut self, command: &[u8]) -> Result<(), LinkError> {
        self.stream
            .write_all(command)
            .await
            .map_err(|e| LinkError::Write(e.to_string()))?;
        self.stream
            .flush()
            .await
            .map_err(|e| LinkError::Write(e.to_string()))?;
        Ok(())
    }

    fn link_name(&self) -> &str {
        &self.path
    }
}
