//! redlight: red-light/green-light motion referee
//!
//! A signal alternates between GREEN and RED on a fixed timer. While RED,
//! detected body poses are compared against a baseline frozen at arming
//! time; enough aggregate displacement is a violation ("hit") that lights
//! the local indicator and is relayed to a physical actuator over serial.
//!
//! ## Architecture
//!
//! - **Game session**: signal state, baseline capture, movement scoring,
//!   local cooldown arbitration
//! - **Pipeline**: pose sources (stdin / replay) and the select!-driven
//!   frame loop
//! - **Relay**: axum endpoint forwarding accepted hits over a serial link,
//!   behind an independent cooldown

pub mod config;
pub mod cooldown;
pub mod game;
pub mod pipeline;
pub mod relay;
pub mod render;
pub mod types;

// Re-export commonly used types
pub use types::{HitEvent, HitResponse, Keypoint, Pose, PoseFrame, RelayStatus, SignalState};

// Re-export the game state machine
pub use game::{movement_score, FrameVerdict, GameError, GameSession};

// Re-export cooldown primitive
pub use cooldown::CooldownLock;

// Re-export relay components
pub use relay::{RelayClient, RelayState, SerialLink, UartLink};
