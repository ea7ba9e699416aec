//! Error types for the remote data client.

use thiserror::Error;

/// Errors that can occur while fetching remote data.
///
/// Transient transport and schema failures are absorbed inside the client's
/// retry envelope; only [`FetchError::ExhaustedRetries`] reaches the
/// selection controller. [`FetchError::Cancelled`] is not a failure at all:
/// it marks a fetch superseded by a newer selection and is discarded
/// silently, never logged as an error and never surfaced to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// HTTP request failed (connection, timeout, non-2xx status).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Response arrived but its shape failed validation.
    #[error("Invalid response shape from {endpoint}: {detail}")]
    Schema { endpoint: String, detail: String },

    /// All attempts for an endpoint were consumed without a usable payload.
    #[error("{endpoint}: exhausted {attempts} attempts")]
    ExhaustedRetries { endpoint: String, attempts: u32 },

    /// The fetch was superseded by a newer selection.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// True for the silent supersession case.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
