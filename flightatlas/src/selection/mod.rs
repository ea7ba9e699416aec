//! Selection state machine.
//!
//! Ties the cache, client, poller and projection engine together: owns
//! the current origin/operator/route selection, triggers fetches with
//! cancellation, and publishes the derived render plan to whatever
//! rendering surface subscribes. The controller consumes explicit
//! [`Intent`] values rather than callbacks, keeping the state machine
//! testable without any rendering surface attached.

mod controller;
mod state;

pub use controller::SelectionController;
pub use state::{Intent, SelectionPhase, SelectionState, DEFAULT_ZOOM};
