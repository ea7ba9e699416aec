//! Integration tests for the route query poller.
//!
//! These drive the poller through the public API with a scripted HTTP
//! client, verifying the contract the selection layer relies on:
//! - a pending marker consumes one attempt; the first ready payload wins
//! - exhaustion after the attempt ceiling, with no extra call
//! - cancellation aborts immediately without consuming attempts

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use flightatlas::client::{ApiClient, AsyncHttpClient, FetchError};
use flightatlas::poller::{RouteQueryPoller, DEFAULT_POLL_ATTEMPTS};

// =============================================================================
// Test Helpers
// =============================================================================

const PENDING: &str = r#"{"query_id": "athena-exec-1"}"#;

const READY: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "geometry": {"type": "LineString",
                     "coordinates": [[-118.408, 33.9425], [-87.9073, 41.9742]]},
        "properties": {"airline_code": "UA", "src_airport": "LAX", "dst_airport": "ORD"}
    }]
}"#;

/// HTTP client that serves a fixed response sequence, repeating the last
/// entry once the script runs out, and counts every call.
struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, FetchError>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedClient {
    fn new(script: Vec<Result<&str, FetchError>>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = Self {
            script: Mutex::new(script.into_iter().map(|r| r.map(String::from)).collect()),
            calls: Arc::clone(&calls),
        };
        (client, calls)
    }
}

impl AsyncHttpClient for ScriptedClient {
    async fn get(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        let response = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().expect("script must not be empty")
        };
        response.map(String::into_bytes)
    }
}

fn poller(
    script: Vec<Result<&str, FetchError>>,
    interval: Duration,
) -> (RouteQueryPoller<ScriptedClient>, Arc<AtomicUsize>) {
    let (client, calls) = ScriptedClient::new(script);
    let api = ApiClient::with_base_url(client, "http://test").with_retry(1, Duration::ZERO);
    (RouteQueryPoller::new(api).with_interval(interval), calls)
}

async fn fetch(
    poller: &RouteQueryPoller<ScriptedClient>,
    cancel: &CancellationToken,
) -> Result<usize, FetchError> {
    poller
        .fetch_routes(Some("LAX"), None, cancel)
        .await
        .map(|routes| routes.len())
}

// =============================================================================
// Termination
// =============================================================================

#[tokio::test]
async fn pending_for_k_calls_then_ready_returns_after_k_plus_one() {
    for k in 0..4usize {
        let mut script: Vec<Result<&str, FetchError>> = vec![Ok(PENDING); k];
        script.push(Ok(READY));
        let (p, calls) = poller(script, Duration::from_millis(1));

        let routes = fetch(&p, &CancellationToken::new()).await.unwrap();
        assert_eq!(routes, 1, "k={k}");
        assert_eq!(calls.load(Ordering::SeqCst), k + 1, "k={k}");
    }
}

#[tokio::test]
async fn pending_for_all_attempts_fails_without_extra_call() {
    let (p, calls) = poller(vec![Ok(PENDING)], Duration::from_millis(1));

    let err = fetch(&p, &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, FetchError::ExhaustedRetries { attempts, .. }
            if attempts == DEFAULT_POLL_ATTEMPTS));
    assert_eq!(calls.load(Ordering::SeqCst), DEFAULT_POLL_ATTEMPTS as usize);
}

#[tokio::test]
async fn transport_errors_and_pending_share_the_attempt_ceiling() {
    let (p, calls) = poller(
        vec![
            Err(FetchError::Transport("connection reset".into())),
            Ok(PENDING),
            Ok(READY),
        ],
        Duration::from_millis(1),
    );

    let routes = fetch(&p, &CancellationToken::new()).await.unwrap();
    assert_eq!(routes, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn worst_case_latency_is_bounded_by_attempts_times_interval() {
    let (p, _calls) = poller(vec![Ok(PENDING)], Duration::from_millis(10));
    let p = p.with_attempts(5);

    let start = Instant::now();
    let err = fetch(&p, &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, FetchError::ExhaustedRetries { .. }));
    // 5 attempts with 4 waits of 10 ms: well under a second even on a
    // loaded test machine, and never unbounded.
    assert!(start.elapsed() < Duration::from_secs(1));
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn cancellation_mid_poll_aborts_without_consuming_attempts() {
    let (p, calls) = poller(vec![Ok(PENDING)], Duration::from_secs(300));
    let cancel = CancellationToken::new();

    let trigger = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        })
    };

    let err = fetch(&p, &cancel).await.unwrap_err();
    assert_eq!(err, FetchError::Cancelled);
    // One call made, then parked in the 300 s wait the cancel cut short.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    trigger.await.unwrap();
}

#[tokio::test]
async fn cancelled_result_is_not_reported_as_a_data_error() {
    let (p, calls) = poller(vec![Ok(PENDING)], Duration::from_millis(1));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = fetch(&p, &cancel).await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(!matches!(err, FetchError::ExhaustedRetries { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
