//! Hit relay: HTTP surface, serial actuator link, and the client used by
//! the sentinel's arbiter.

mod client;
mod routes;
mod serial;
mod service;

pub use client::{RelayClient, RelayClientError};
pub use routes::relay_app;
pub use serial::{LinkError, SerialLink, UartLink, HIT_COMMAND};
pub use service::{RelayState, RelayStats};
