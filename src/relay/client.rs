//! Relay client — HTTP client for sentinel → relay hit reporting.

use std::time::Duration;

use thiserror::Error;

use crate::types::{HitResponse, RelayStatus};

#[derive(Debug, Error)]
pub enum RelayClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Relay returned status {0}")]
    ServerError(reqwest::StatusCode),
}

/// HTTP client for the relay's report-hit endpoint.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Report one hit. Returns the relay's decision; `Cooldown` and
    /// `SerialError` are outcomes, not transport errors — a caller should
    /// not blindly retry during an active cooldown.
    pub async fn report_hit(&self) -> Result<RelayStatus, RelayClientError> {
        let resp = self
            .http
            .post(format!("{}/api/hit", self.base_url))
            .send()
            .await?;

        let code = resp.status();
        if !matches!(
            code,
            reqwest::StatusCode::OK
                | reqwest::StatusCode::TOO_MANY_REQUESTS
                | reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ) {
            return Err(RelayClientError::ServerError(code));
        }

        let body: HitResponse = resp.json().await?;
        Ok(body.status)
    }
}
