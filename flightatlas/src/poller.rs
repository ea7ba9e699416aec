//! Route query poller.
//!
//! The `/routes` endpoint may answer with a pending marker while the
//! server is still computing a direct-route set. The poller re-issues the
//! identical query at a fixed interval until a ready payload arrives or
//! the attempt ceiling is hit, bounding worst-case latency to
//! `attempts × interval` (~5 s at the defaults). The wait between
//! attempts is a scheduled resumption, not a blocking sleep: a newer
//! selection can cancel it at any point via the [`CancellationToken`].

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::{ApiClient, AsyncHttpClient, FetchError};
use crate::model::{Route, RouteQueryResult};

/// Default attempt ceiling for a route query.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;

/// Default fixed interval between attempts.
///
/// Fixed rather than backing off: the pending window is dominated by one
/// server-side computation whose completion the next query simply observes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Polls a route query until the server reports it ready.
pub struct RouteQueryPoller<C> {
    api: ApiClient<C>,
    attempts: u32,
    interval: Duration,
}

impl<C: AsyncHttpClient> RouteQueryPoller<C> {
    /// Creates a poller with the default attempt ceiling and interval.
    pub fn new(api: ApiClient<C>) -> Self {
        Self {
            api,
            attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets a custom attempt ceiling (minimum 1).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Sets a custom inter-attempt interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Fetches the route set for the given filters, resolving pending
    /// markers by re-querying.
    ///
    /// Returns the first ready payload. Pending markers and transient
    /// failures each consume one attempt; exhaustion yields
    /// [`FetchError::ExhaustedRetries`]. Cancellation aborts immediately
    /// without consuming remaining attempts and yields
    /// [`FetchError::Cancelled`], which the caller discards silently.
    pub async fn fetch_routes(
        &self,
        origin: Option<&str>,
        operator: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Route>, FetchError> {
        for attempt in 1..=self.attempts {
            let result = tokio::select! {
                biased;

                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                result = self.api.fetch_routes(origin, operator) => result,
            };

            match result {
                Ok(RouteQueryResult::Ready { routes }) => {
                    debug!(
                        origin = origin.unwrap_or("-"),
                        operator = operator.unwrap_or("-"),
                        attempt,
                        routes = routes.len(),
                        "Route query ready"
                    );
                    return Ok(routes);
                }
                Ok(RouteQueryResult::Pending { query_id }) => {
                    debug!(query_id = %query_id, attempt, "Route query still computing");
                }
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => {
                    warn!(attempt, error = %e, "Route query attempt failed");
                }
            }

            if attempt < self.attempts {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }
        }

        warn!(
            origin = origin.unwrap_or("-"),
            operator = operator.unwrap_or("-"),
            attempts = self.attempts,
            "Route query exhausted attempts"
        );
        Err(FetchError::ExhaustedRetries {
            endpoint: "/routes".to_string(),
            attempts: self.attempts,
        })
    }
}
