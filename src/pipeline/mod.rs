//! Frame processing pipeline.
//!
//! ```text
//! pose source ──> GameLoop ──┬── signal toggle (fixed interval)
//!                            ├── violation detection (while RED)
//!                            ├── hit arbitration + feedback
//!                            └── relay request (spawned, never blocks frames)
//! ```
//!
//! The pose capability is a suspension point: the loop awaits the next frame,
//! processes it, and re-enters the select — it never recurses and never
//! blocks the frame path on network I/O.

pub mod source;
mod game_loop;

pub use game_loop::{GameLoop, GameStats};
