//! Relay request handling: cooldown arbitration and the serial forward.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::serial::{SerialLink, HIT_COMMAND};
use crate::cooldown::CooldownLock;
use crate::types::RelayStatus;

/// Forward counters exposed on the health endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RelayStats {
    pub hits_sent: u64,
    pub hits_throttled: u64,
    pub write_failures: u64,
}

/// Shared relay state.
///
/// One mutex guards both the cooldown lock and the serial link, so the
/// check → write → engage sequence is atomic: a request's cooldown is
/// visibly engaged before its response exists, and two near-simultaneous
/// requests can never both observe "lock free".
#[derive(Clone)]
pub struct RelayState {
    inner: Arc<Mutex<RelayInner>>,
    started: Instant,
    started_at: DateTime<Utc>,
}

struct RelayInner {
    cooldown: CooldownLock,
    link: Box<dyn SerialLink>,
    stats: RelayStats,
}

impl RelayState {
    pub fn new(link: Box<dyn SerialLink>, cooldown: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RelayInner {
                cooldown: CooldownLock::new(cooldown),
                link,
                stats: RelayStats::default(),
            })),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Handle one report-hit request.
    ///
    /// Cooldown held: rejected without touching the channel. Write failure:
    /// surfaced distinctly and the cooldown stays free, so an immediate
    /// retry is allowed.
    pub async fn report_hit(&self) -> RelayStatus {
        let mut inner = self.inner.lock().await;

        if inner.cooldown.is_held(Instant::now()) {
            inner.stats.hits_throttled += 1;
            debug!("Hit rejected — relay cooldown active");
            return RelayStatus::Cooldown;
        }

        info!(link = %inner.link.link_name(), "🎯 Hit received — forwarding to actuator");
        match inner.link.write_command(HIT_COMMAND).await {
            Ok(()) => {
                inner.cooldown.engage(Instant::now());
                inner.stats.hits_sent += 1;
                RelayStatus::Sent
            }
            Err(e) => {
                inner.stats.write_failures += 1;
                warn!("Serial write failed: {}", e);
                RelayStatus::SerialError
            }
        }
    }

    pub async fn stats(&self) -> RelayStats {
        self.inner.lock().await.stats
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
