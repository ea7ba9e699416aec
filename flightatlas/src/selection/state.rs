//! Selection state and user intents.

use crate::model::Route;

/// Initial map zoom level.
pub const DEFAULT_ZOOM: u8 = 4;

/// Coarse phase of the selection lifecycle.
///
/// Finer refinement (operator filter, selected route) lives in
/// [`SelectionState`] fields: both are reachable only from
/// `RoutesLoaded` and clear back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Nothing selected; the full airport layer is shown.
    Idle,
    /// An origin is selected and its route fetch is in flight.
    Loading,
    /// The origin's route set is loaded.
    RoutesLoaded,
}

/// A user intent consumed by the selection controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Pick an origin airport by code; triggers a route fetch.
    SelectOrigin(String),
    /// Filter the loaded route set by operator; never fetches.
    SelectOperator(String),
    /// Drop the operator filter.
    ClearOperator,
    /// Pick a destination under the current origin, optionally pinned to
    /// one operator.
    SelectRoute { dst: String, operator: Option<String> },
    /// Pop exactly one level of refinement.
    Back,
    /// The map zoom changed.
    SetZoom(u8),
}

/// The controller's complete state.
///
/// `routes` is the full loaded set for the current origin; `filtered` is
/// its operator-filtered view (equal to `routes` when no filter is set).
/// Route data lives only for the duration of the origin selection and is
/// discarded when the origin clears or changes.
#[derive(Debug, Clone)]
pub struct SelectionState {
    pub phase: SelectionPhase,
    pub origin: Option<String>,
    pub operator: Option<String>,
    pub destination: Option<String>,
    /// Routes matching the selected destination (one per operator).
    pub selected: Vec<Route>,
    /// Full route set for the current origin.
    pub routes: Vec<Route>,
    /// Operator-filtered view of `routes`.
    pub filtered: Vec<Route>,
    pub zoom: u8,
    /// Last user-visible data failure, cleared on the next selection.
    pub last_error: Option<String>,
    /// Monotonic counter guarding against stale fetch completions.
    pub generation: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            phase: SelectionPhase::Idle,
            origin: None,
            operator: None,
            destination: None,
            selected: Vec::new(),
            routes: Vec::new(),
            filtered: Vec::new(),
            zoom: DEFAULT_ZOOM,
            last_error: None,
            generation: 0,
        }
    }

    /// The routes the rendering surface should draw: the destination
    /// selection when present, otherwise the filtered view.
    pub fn visible_routes(&self) -> &[Route] {
        if !self.selected.is_empty() {
            &self.selected
        } else {
            &self.filtered
        }
    }

    /// True when a specific route (destination) is selected.
    pub fn has_route_selection(&self) -> bool {
        self.destination.is_some()
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}
