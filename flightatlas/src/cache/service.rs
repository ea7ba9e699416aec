//! Reference cache service.
//!
//! Owns the fetch-and-store lifecycle for airports and airlines. The
//! service is explicitly constructed and injected rather than reached as
//! ambient global state, and its `init` is idempotent: repeated or concurrent calls
//! while data is loaded-and-valid never trigger duplicate fetches.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::entry::{CachedEntry, ValidityPolicy};
use super::store::KeyValueStore;
use super::CacheError;
use crate::client::{ApiClient, AsyncHttpClient};
use crate::model::{Airline, Airport};

/// Store key for the cached airports payload.
pub const KEY_AIRPORTS: &str = "airports";

/// Store key for the cached airlines payload.
pub const KEY_AIRLINES: &str = "airlines";

/// Store key for the last global refresh timestamp.
pub const KEY_LAST_REFRESH: &str = "last-refresh";

/// What `init` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Data was already loaded this session and still valid.
    AlreadyLoaded,
    /// A valid persisted entry was used; no network call was made.
    CacheHit,
    /// Fresh data was fetched and written back.
    Refreshed,
}

/// Session-spanning cache of airport and airline reference data.
pub struct ReferenceCache<S, C> {
    store: S,
    api: ApiClient<C>,
    policy: ValidityPolicy,
    state: Mutex<LoadedState>,
}

#[derive(Default)]
struct LoadedState {
    airports: Vec<Airport>,
    airlines: Vec<Airline>,
    loaded_at: Option<DateTime<Utc>>,
}

impl<S: KeyValueStore, C: AsyncHttpClient> ReferenceCache<S, C> {
    /// Creates a cache with the default validity policy (24 h max age).
    pub fn new(store: S, api: ApiClient<C>) -> Self {
        Self {
            store,
            api,
            policy: ValidityPolicy::default(),
            state: Mutex::new(LoadedState::default()),
        }
    }

    /// Overrides the validity policy.
    pub fn with_policy(mut self, policy: ValidityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Loads reference data, from the store when a valid entry exists and
    /// from the network otherwise.
    ///
    /// Holds the state lock for the whole sequence, so concurrent callers
    /// serialize: the first one does the work, the rest observe
    /// [`InitOutcome::AlreadyLoaded`]. A fetch failure leaves the previous
    /// state untouched and is surfaced to the caller.
    pub async fn init(&self) -> Result<InitOutcome, CacheError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        if let Some(loaded_at) = state.loaded_at {
            if self.policy.is_valid(loaded_at, now) {
                return Ok(InitOutcome::AlreadyLoaded);
            }
            debug!("In-memory reference data expired, revalidating");
        }

        if self.load_persisted(&mut state, now) {
            info!(
                airports = state.airports.len(),
                airlines = state.airlines.len(),
                "Reference data loaded from cache"
            );
            return Ok(InitOutcome::CacheHit);
        }

        let (airports, airlines) =
            tokio::join!(self.api.fetch_airports(), self.api.fetch_airlines());
        let airports = airports?;
        let airlines = airlines?;

        self.store
            .write(KEY_AIRPORTS, &CachedEntry::new(airports.clone(), now).encode()?)?;
        self.store
            .write(KEY_AIRLINES, &CachedEntry::new(airlines.clone(), now).encode()?)?;
        self.store.write(KEY_LAST_REFRESH, &now.to_rfc3339())?;

        info!(
            airports = airports.len(),
            airlines = airlines.len(),
            "Reference data refreshed from network"
        );

        state.airports = airports;
        state.airlines = airlines;
        state.loaded_at = Some(now);
        Ok(InitOutcome::Refreshed)
    }

    /// Loads both persisted entries into `state` if present, decodable
    /// and inside the validity window. Corrupt entries count as absent.
    fn load_persisted(&self, state: &mut LoadedState, now: DateTime<Utc>) -> bool {
        let (Some(airports_raw), Some(airlines_raw)) =
            (self.store.read(KEY_AIRPORTS), self.store.read(KEY_AIRLINES))
        else {
            return false;
        };

        let airports: CachedEntry<Vec<Airport>> = match CachedEntry::decode(&airports_raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Discarding corrupt cached airports entry");
                return false;
            }
        };
        let airlines: CachedEntry<Vec<Airline>> = match CachedEntry::decode(&airlines_raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Discarding corrupt cached airlines entry");
                return false;
            }
        };

        if !self.policy.is_valid(airports.fetched_at, now)
            || !self.policy.is_valid(airlines.fetched_at, now)
        {
            debug!("Persisted reference data outside validity window");
            return false;
        }

        state.loaded_at = Some(airports.fetched_at.min(airlines.fetched_at));
        state.airports = airports.payload;
        state.airlines = airlines.payload;
        true
    }

    /// Snapshot of the loaded airports.
    pub async fn airports(&self) -> Vec<Airport> {
        self.state.lock().await.airports.clone()
    }

    /// Snapshot of the loaded airlines.
    pub async fn airlines(&self) -> Vec<Airline> {
        self.state.lock().await.airlines.clone()
    }

    /// Operator code → display name directory for the aggregator.
    pub async fn airline_directory(&self) -> HashMap<String, String> {
        self.state
            .lock()
            .await
            .airlines
            .iter()
            .map(|a| (a.code.clone(), a.name.clone()))
            .collect()
    }

    /// Timestamp of the last successful global refresh, if recorded.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        let raw = self.store.read(KEY_LAST_REFRESH)?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
