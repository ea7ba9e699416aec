//! High-level service facade.
//!
//! Wires the subsystems together for embedders that don't want to
//! assemble them by hand: HTTP client → API client → poller, disk store →
//! reference cache, and a selection controller over the loaded reference
//! data.

use std::sync::Arc;

use thiserror::Error;

use crate::cache::{CacheError, DiskStore, InitOutcome, ReferenceCache};
use crate::client::{ApiClient, FetchError, ReqwestClient};
use crate::config::Settings;
use crate::poller::RouteQueryPoller;
use crate::selection::SelectionController;

/// Errors that can occur while bootstrapping the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Http(FetchError),

    /// Reference data could not be loaded.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// The assembled FlightAtlas core.
pub struct FlightAtlas {
    cache: Arc<ReferenceCache<DiskStore, ReqwestClient>>,
    controller: SelectionController<ReqwestClient>,
    outcome: InitOutcome,
}

impl FlightAtlas {
    /// Bootstraps the core from settings: opens the cache store, loads
    /// reference data (from cache or network), and builds the selection
    /// controller over it.
    pub async fn init(settings: &Settings) -> Result<Self, ServiceError> {
        let http = ReqwestClient::new().map_err(ServiceError::Http)?;
        let api = ApiClient::with_base_url(http.clone(), &settings.api.base_url).with_retry(
            settings.api.reference_attempts,
            settings.api.reference_retry_delay,
        );

        let store = DiskStore::new(&settings.cache.directory)?;
        let cache = Arc::new(
            ReferenceCache::new(store, api.clone()).with_policy(settings.cache.validity),
        );
        let outcome = cache.init().await?;

        let poller = RouteQueryPoller::new(api)
            .with_attempts(settings.api.poll_attempts)
            .with_interval(settings.api.poll_interval);
        let controller = SelectionController::new(
            poller,
            cache.airports().await,
            cache.airline_directory().await,
        );

        Ok(Self {
            cache,
            controller,
            outcome,
        })
    }

    /// What `init` did for reference data: cache hit or network refresh.
    pub fn cache_outcome(&self) -> InitOutcome {
        self.outcome
    }

    /// The reference cache.
    pub fn cache(&self) -> &ReferenceCache<DiskStore, ReqwestClient> {
        &self.cache
    }

    /// The selection controller.
    pub fn controller(&self) -> &SelectionController<ReqwestClient> {
        &self.controller
    }
}
