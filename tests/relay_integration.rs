//! Relay Endpoint Integration Tests
//!
//! In-process tests that build the axum app via `relay_app()` and exercise
//! the hit endpoint with `tower::ServiceExt::oneshot()`. Timing tests run
//! on tokio's paused clock. No binary spawn, no network port, no real
//! serial device.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use redlight::relay::{relay_app, LinkError, RelayState, SerialLink};

// ============================================================================
// Fake Serial Link
// ============================================================================

/// Scripted link: pops one outcome per write, records successful writes.
struct FakeLink {
    outcomes: VecDeque<Result<(), ()>>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FakeLink {
    fn new(outcomes: &[Result<(), ()>]) -> (Self, Arc<Mutex<Vec<Vec<u8>>>>) {
        let writes = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                outcomes: outcomes.iter().copied().collect(),
                writes: Arc::clone(&writes),
            },
            writes,
        )
    }
}

#[async_trait]
impl SerialLink for FakeLink {
    async fn write_command(&mut self, command: &[u8]) -> Result<(), LinkError> {
        match self.outcomes.pop_front() {
            Some(Err(())) => Err(LinkError::Write("scripted failure".to_string())),
            _ => {
                self.writes.lock().unwrap().push(command.to_vec());
                Ok(())
            }
        }
    }

    fn link_name(&self) -> &str {
        "fake"
    }
}

const COOLDOWN: Duration = Duration::from_millis(1000);

fn post_hit() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/hit")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Cooldown Window
// ============================================================================

/// Accepted at t=0, throttled at t=500ms, accepted again at t=1001ms.
#[tokio::test(start_paused = true)]
async fn test_cooldown_window_sequence() {
    let (link, writes) = FakeLink::new(&[]);
    let app = relay_app(RelayState::new(Box::new(link), COOLDOWN));

    let first = app.clone().oneshot(post_hit()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await["status"], "sent");

    tokio::time::advance(Duration::from_millis(500)).await;
    let second = app.clone().oneshot(post_hit()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(second).await["status"], "cooldown");

    tokio::time::advance(Duration::from_millis(501)).await;
    let third = app.clone().oneshot(post_hit()).await.unwrap();
    assert_eq!(third.status(), StatusCode::OK);
    assert_eq!(body_json(third).await["status"], "sent");

    // The throttled request never reached the serial channel.
    assert_eq!(writes.lock().unwrap().len(), 2);
}

/// Exactly one command line per accepted request.
#[tokio::test]
async fn test_wire_format_single_hit_line() {
    let (link, writes) = FakeLink::new(&[]);
    let app = relay_app(RelayState::new(Box::new(link), COOLDOWN));

    let response = app.oneshot(post_hit()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let written = writes.lock().unwrap();
    assert_eq!(written.as_slice(), &[b"HIT\n".to_vec()]);
}

// ============================================================================
// Transport Failure
// ============================================================================

/// A failed write must not engage the cooldown: the immediate retry goes
/// through to the channel (and here, succeeds).
#[tokio::test(start_paused = true)]
async fn test_write_failure_allows_immediate_retry() {
    let (link, writes) = FakeLink::new(&[Err(()), Ok(())]);
    let app = relay_app(RelayState::new(Box::new(link), COOLDOWN));

    let failed = app.clone().oneshot(post_hit()).await.unwrap();
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(failed).await["status"], "serial_error");

    tokio::time::advance(Duration::from_millis(1)).await;
    let retry = app.oneshot(post_hit()).await.unwrap();
    assert_eq!(retry.status(), StatusCode::OK);
    assert_eq!(body_json(retry).await["status"], "sent");

    assert_eq!(writes.lock().unwrap().len(), 1);
}

// ============================================================================
// Health
// ============================================================================

/// Health reflects the forward counters.
#[tokio::test(start_paused = true)]
async fn test_health_counters_track_outcomes() {
    let (link, _writes) = FakeLink::new(&[]);
    let app = relay_app(RelayState::new(Box::new(link), COOLDOWN));

    // One accepted, one throttled.
    app.clone().oneshot(post_hit()).await.unwrap();
    tokio::time::advance(Duration::from_millis(100)).await;
    app.clone().oneshot(post_hit()).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let v = body_json(response).await;
    assert_eq!(v["status"], "ok");
    assert_eq!(v["hits_sent"], 1);
    assert_eq!(v["hits_throttled"], 1);
    assert_eq!(v["write_failures"], 0);
}
