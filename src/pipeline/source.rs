//! Pose source abstraction for frame ingestion.
//!
//! Provides a unified trait for reading pose frames from different sources:
//! stdin (JSON lines, one frame per line) and scripted replay (pre-loaded
//! frames with optional pacing). The pose-estimation engine itself sits on
//! the far side of this boundary — whatever produces the JSON owns model
//! choice and inference.

use crate::types::PoseFrame;
use anyhow::Result;
use async_trait::async_trait;

/// Events produced by a pose source.
pub enum PoseEvent {
    /// A frame was observed (with or without a detected pose).
    Frame(PoseFrame),
    /// Source reached end of data.
    Eof,
}

/// Trait abstracting where pose frames come from.
///
/// Implementations handle format parsing and pacing internally. The game
/// loop calls [`next_frame`](PoseSource::next_frame) in a select! with
/// cancellation and timer branches.
#[async_trait]
pub trait PoseSource: Send + 'static {
    /// Read the next frame from the source.
    ///
    /// Returns `PoseEvent::Eof` when no more data is available.
    async fn next_frame(&mut self) -> Result<PoseEvent>;

    /// Human-readable name for logging (e.g. "stdin", "replay").
    fn source_name(&self) -> &str;
}

// ============================================================================
// Scripted Source (file / synthetic replay)
// ============================================================================

/// Replays pre-loaded pose frames with optional inter-frame delay.
pub struct ScriptedSource {
    frames: std::vec::IntoIter<PoseFrame>,
    delay_ms: u64,
    yielded_first: bool,
}

impl ScriptedSource {
    pub fn new(frames: Vec<PoseFrame>, delay_ms: u64) -> Self {
        Self {
            frames: frames.into_iter(),
            delay_ms,
            yielded_first: false,
        }
    }
}

#[async_trait]
impl PoseSource for ScriptedSource {
    async fn next_frame(&mut self) -> Result<PoseEvent> {
        // Delay between frames; no delay before the first so the run starts
        // immediately.
        if self.yielded_first && self.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
        }
        match self.frames.next() {
            Some(f) => {
                self.yielded_first = true;
                Ok(PoseEvent::Frame(f))
            }
            None => Ok(PoseEvent::Eof),
        }
    }

    fn source_name(&self) -> &str {
        "replay"
    }
}

// ============================================================================
// Stdin Source (JSON pose frames, one per line)
// ============================================================================

/// Reads JSON-formatted pose frames from stdin.
///
/// Used with the simulator: `pose-sim | redlight --stdin`
pub struct StdinSource {
    reader: tokio::io::BufReader<tokio::io::Stdin>,
    line_buffer: String,
}

impl StdinSource {
    pub fn new() -> Self {
        Self {
            reader: tokio::io::BufReader::new(tokio::io::stdin()),
            line_buffer: String::with_capacity(2048),
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PoseSource for StdinSource {
    async fn next_frame(&mut self) -> Result<PoseEvent> {
        use tokio::io::AsyncBufReadExt;
        loop {
            self.line_buffer.clear();
            let bytes = self.reader.read_line(&mut self.line_buffer).await?;
            if bytes == 0 {
                return Ok(PoseEvent::Eof);
            }
            let line = self.line_buffer.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<PoseFrame>(line) {
                Ok(frame) => return Ok(PoseEvent::Frame(frame)),
                Err(e) => {
                    tracing::warn!("[StdinSource] Failed to parse frame: {}", e);
                    // Skip malformed lines and keep reading
                }
            }
        }
    }

    fn source_name(&self) -> &str {
        "stdin"
    }
}
