//! Remote data client.
//!
//! Issues network queries against the read-only FlightAtlas API, validates
//! response shape before anything enters the core, and retries transient
//! failures up to a fixed ceiling. See [`ApiClient`] for the operations
//! and [`FetchError`] for the failure taxonomy.

mod api;
mod error;
mod http;
mod wire;

pub use api::{ApiClient, DEFAULT_BASE_URL, REFERENCE_FETCH_ATTEMPTS, REFERENCE_RETRY_DELAY};
pub use error::FetchError;
pub use http::{AsyncHttpClient, ReqwestClient};

#[cfg(test)]
pub(crate) use http::tests::MockHttpClient;
