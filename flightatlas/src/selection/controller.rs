//! Selection controller.
//!
//! Owns the selection state behind an async mutex and publishes a fresh
//! [`RenderPlan`] on every observable change through a watch channel.
//! Route fetches run as spawned tasks; a generation counter plus a
//! [`CancellationToken`] per fetch guarantee that only the most recent
//! origin selection ever mutates state; a superseded fetch's completion
//! is a silent no-op.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{Intent, SelectionPhase, SelectionState};
use crate::aggregate::{aggregate_by_operator, filter_by_operator, OperatorRoutes};
use crate::client::AsyncHttpClient;
use crate::geodesy::weight_for_zoom;
use crate::model::Airport;
use crate::poller::RouteQueryPoller;
use crate::view::RenderPlan;

/// The selection state machine.
///
/// Cheap to clone; all clones share one state.
pub struct SelectionController<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for SelectionController<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<C> {
    poller: RouteQueryPoller<C>,
    airports: Vec<Airport>,
    directory: HashMap<String, String>,
    state: Mutex<SelectionState>,
    /// Token for the in-flight route fetch, if any. At most one fetch is
    /// in flight per origin selection; a new selection cancels it here
    /// before issuing its own.
    active_fetch: std::sync::Mutex<Option<CancellationToken>>,
    plan_tx: watch::Sender<RenderPlan>,
}

impl<C> Inner<C> {
    fn publish(&self, state: &SelectionState) {
        self.plan_tx
            .send_replace(RenderPlan::build(state, &self.airports));
    }

    fn cancel_active_fetch(&self) -> CancellationToken {
        let mut active = self.active_fetch.lock().unwrap();
        if let Some(prev) = active.take() {
            prev.cancel();
        }
        let token = CancellationToken::new();
        *active = Some(token.clone());
        token
    }
}

impl<C: AsyncHttpClient + Send + Sync + 'static> SelectionController<C> {
    /// Creates a controller over a loaded reference data set.
    pub fn new(
        poller: RouteQueryPoller<C>,
        airports: Vec<Airport>,
        directory: HashMap<String, String>,
    ) -> Self {
        let state = SelectionState::new();
        let (plan_tx, _) = watch::channel(RenderPlan::build(&state, &airports));
        Self {
            inner: Arc::new(Inner {
                poller,
                airports,
                directory,
                state: Mutex::new(state),
                active_fetch: std::sync::Mutex::new(None),
                plan_tx,
            }),
        }
    }

    /// Subscribes the rendering surface to plan updates.
    pub fn subscribe(&self) -> watch::Receiver<RenderPlan> {
        self.inner.plan_tx.subscribe()
    }

    /// Dispatches a user intent.
    pub async fn handle(&self, intent: Intent) {
        match intent {
            Intent::SelectOrigin(iata) => {
                // Fire and forget: completion is observed via the plan.
                let _ = self.select_origin(iata).await;
            }
            Intent::SelectOperator(code) => self.select_operator(code).await,
            Intent::ClearOperator => self.clear_operator().await,
            Intent::SelectRoute { dst, operator } => self.select_route(dst, operator).await,
            Intent::Back => self.back().await,
            Intent::SetZoom(zoom) => self.set_zoom(zoom).await,
        }
    }

    /// Selects an origin airport and starts its route fetch.
    ///
    /// Any prior in-flight fetch is cancelled first, so its eventual
    /// completion can never overwrite this selection's data. The returned
    /// handle resolves when the fetch settles; callers that don't care
    /// can drop it.
    pub async fn select_origin(&self, iata: impl Into<String>) -> tokio::task::JoinHandle<()> {
        let iata = iata.into();
        let token = self.inner.cancel_active_fetch();

        let generation = {
            let mut state = self.inner.state.lock().await;
            state.generation += 1;
            state.phase = SelectionPhase::Loading;
            state.origin = Some(iata.clone());
            state.operator = None;
            state.destination = None;
            state.selected.clear();
            state.routes.clear();
            state.filtered.clear();
            state.last_error = None;
            self.inner.publish(&state);
            state.generation
        };

        info!(origin = %iata, "Origin selected, fetching routes");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.poller.fetch_routes(Some(&iata), None, &token).await;

            // Superseded while we were out: drop the result on the floor.
            if token.is_cancelled() {
                return;
            }

            let mut state = inner.state.lock().await;
            if state.generation != generation {
                return;
            }

            match result {
                Ok(routes) => {
                    info!(origin = %iata, routes = routes.len(), "Routes loaded");
                    state.filtered = routes.clone();
                    state.routes = routes;
                    state.phase = SelectionPhase::RoutesLoaded;
                }
                Err(e) if e.is_cancelled() => return,
                Err(e) => {
                    warn!(origin = %iata, error = %e, "Route fetch failed, rolling back");
                    state.phase = SelectionPhase::Idle;
                    state.origin = None;
                    state.last_error = Some(e.to_string());
                }
            }
            inner.publish(&state);
        })
    }

    /// Applies an operator filter over the loaded route set.
    ///
    /// A pure re-filter: never issues a network request. Ignored unless
    /// routes are loaded.
    pub async fn select_operator(&self, code: impl Into<String>) {
        let code = code.into();
        let mut state = self.inner.state.lock().await;
        if state.phase != SelectionPhase::RoutesLoaded {
            debug!(operator = %code, "Operator filter ignored: no routes loaded");
            return;
        }
        state.filtered = filter_by_operator(&state.routes, &code);
        state.operator = Some(code);
        state.destination = None;
        state.selected.clear();
        self.inner.publish(&state);
    }

    /// Drops the operator filter, restoring the full route set.
    pub async fn clear_operator(&self) {
        let mut state = self.inner.state.lock().await;
        if state.phase != SelectionPhase::RoutesLoaded || state.operator.is_none() {
            return;
        }
        state.operator = None;
        state.filtered = state.routes.clone();
        self.inner.publish(&state);
    }

    /// Selects a specific route by destination (and optionally operator).
    ///
    /// Looks the route up in the already-loaded set; no match is a
    /// no-op, not an error.
    pub async fn select_route(&self, dst: impl Into<String>, operator: Option<String>) {
        let dst = dst.into();
        let mut state = self.inner.state.lock().await;
        if state.phase != SelectionPhase::RoutesLoaded {
            return;
        }

        let operator = operator.or_else(|| state.operator.clone());
        let matches: Vec<_> = state
            .routes
            .iter()
            .filter(|r| r.dst == dst && operator.as_deref().map_or(true, |op| r.airline == op))
            .cloned()
            .collect();

        if matches.is_empty() {
            debug!(dst = %dst, "No matching route; selection unchanged");
            return;
        }

        state.destination = Some(dst);
        state.selected = matches;
        self.inner.publish(&state);
    }

    /// Pops exactly one level of refinement.
    ///
    /// Route selection clears first, then the operator filter, then the
    /// origin itself, discarding the loaded route set and cancelling a
    /// fetch still in flight.
    pub async fn back(&self) {
        let mut state = self.inner.state.lock().await;

        if state.destination.is_some() || !state.selected.is_empty() {
            state.destination = None;
            state.selected.clear();
            self.inner.publish(&state);
            return;
        }

        if state.operator.is_some() {
            state.operator = None;
            state.filtered = state.routes.clone();
            self.inner.publish(&state);
            return;
        }

        if state.phase == SelectionPhase::Idle {
            return;
        }

        // Leaving the origin entirely: a fetch still in flight must not
        // resurrect it.
        if let Some(prev) = self.inner.active_fetch.lock().unwrap().take() {
            prev.cancel();
        }
        state.generation += 1;
        state.phase = SelectionPhase::Idle;
        state.origin = None;
        state.routes.clear();
        state.filtered.clear();
        state.last_error = None;
        self.inner.publish(&state);
    }

    /// Records a zoom change, republishing only when the styling step
    /// actually moves, not on every frame.
    pub async fn set_zoom(&self, zoom: u8) {
        let mut state = self.inner.state.lock().await;
        if state.zoom == zoom {
            return;
        }
        let old_weight = weight_for_zoom(state.zoom);
        state.zoom = zoom;
        if weight_for_zoom(zoom) != old_weight {
            self.inner.publish(&state);
        }
    }

    /// Per-operator route counts for the loaded set, for the operator
    /// selection control.
    pub async fn operator_summary(&self) -> Vec<OperatorRoutes> {
        let state = self.inner.state.lock().await;
        aggregate_by_operator(&state.routes, &self.inner.directory)
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SelectionState {
        self.inner.state.lock().await.clone()
    }
}
