//! Remote data client for the FlightAtlas query API.
//!
//! Wraps an [`AsyncHttpClient`] with endpoint knowledge, shape validation
//! and a bounded retry envelope. Reference data (`/airports`, `/airlines`)
//! retries transient and schema failures in place; the `/routes` query is
//! single-shot here because the poller owns its retry loop.

use std::time::Duration;

use tracing::{debug, warn};

use super::error::FetchError;
use super::http::AsyncHttpClient;
use super::wire;
use crate::model::{Airline, Airport, RouteQueryResult};

/// Default query API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.flightatlas.io";

/// Attempt ceiling for reference data endpoints.
pub const REFERENCE_FETCH_ATTEMPTS: u32 = 5;

/// Fixed delay between reference data attempts.
pub const REFERENCE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Client for the read-only query API.
///
/// Generic over the HTTP client so tests inject scripted responses.
/// Performs no side effects beyond the network call: it never touches the
/// cache or selection state.
#[derive(Clone)]
pub struct ApiClient<C> {
    http: C,
    base_url: String,
    attempts: u32,
    retry_delay: Duration,
}

impl<C: AsyncHttpClient> ApiClient<C> {
    /// Creates a client against the default API base URL.
    pub fn new(http: C) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL.
    pub fn with_base_url(http: C, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            attempts: REFERENCE_FETCH_ATTEMPTS,
            retry_delay: REFERENCE_RETRY_DELAY,
        }
    }

    /// Overrides the reference-data retry envelope.
    pub fn with_retry(mut self, attempts: u32, retry_delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Access to the underlying HTTP client, for test assertions.
    #[cfg(test)]
    pub(crate) fn http(&self) -> &C {
        &self.http
    }

    /// Fetches and validates the airport reference set.
    pub async fn fetch_airports(&self) -> Result<Vec<Airport>, FetchError> {
        self.fetch_reference("/airports", |value| {
            wire::airports_from_value(value, "/airports")
        })
        .await
    }

    /// Fetches and validates the airline directory.
    pub async fn fetch_airlines(&self) -> Result<Vec<Airline>, FetchError> {
        self.fetch_reference("/airlines", |value| {
            wire::airlines_from_value(value, "/airlines")
        })
        .await
    }

    /// Issues a single route query.
    ///
    /// Returns [`RouteQueryResult::Pending`] when the server is still
    /// computing the result; the caller (the poller) decides whether and
    /// when to re-query.
    pub async fn fetch_routes(
        &self,
        origin: Option<&str>,
        operator: Option<&str>,
    ) -> Result<RouteQueryResult, FetchError> {
        let endpoint = route_query_path(origin, operator);
        let url = format!("{}{}", self.base_url, endpoint);

        let body = self.http.get(&url).await?;
        let value = wire::parse_body(&body, &endpoint)?;
        wire::routes_from_value(&value, &endpoint)
    }

    /// Retry envelope shared by the reference endpoints: a fixed number of
    /// attempts with a fixed inter-attempt delay, absorbing transport and
    /// schema failures until exhaustion.
    async fn fetch_reference<T>(
        &self,
        endpoint: &str,
        validate: impl Fn(&serde_json::Value) -> Result<T, FetchError>,
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);

        for attempt in 1..=self.attempts {
            let result = match self.http.get(&url).await {
                Ok(body) => wire::parse_body(&body, endpoint).and_then(|v| validate(&v)),
                Err(e) => Err(e),
            };

            match result {
                Ok(value) => {
                    debug!(endpoint, attempt, "Reference fetch succeeded");
                    return Ok(value);
                }
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => {
                    warn!(endpoint, attempt, error = %e, "Reference fetch attempt failed");
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Err(FetchError::ExhaustedRetries {
            endpoint: endpoint.to_string(),
            attempts: self.attempts,
        })
    }
}

/// Builds the `/routes` query path for the given filters.
fn route_query_path(origin: Option<&str>, operator: Option<&str>) -> String {
    let mut params = Vec::with_capacity(2);
    if let Some(origin) = origin {
        params.push(format!("airport={}", origin));
    }
    if let Some(operator) = operator {
        params.push(format!("airline_code={}", operator));
    }
    format!("/routes?{}", params.join("&"))
}
