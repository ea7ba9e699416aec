//! FlightAtlas - data synchronization and geometry core for an
//! interactive flight route map.
//!
//! The crate owns everything between the query API and the rendering
//! surface: retry-tolerant retrieval of possibly-not-yet-computed route
//! queries, a session-spanning reference cache, a selection state machine
//! with in-flight cancellation, and a great-circle projection engine that
//! handles the antimeridian. Rendering itself is an external concern; the
//! crate's output is a declarative [`view::RenderPlan`].
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module wires the pieces together:
//!
//! ```ignore
//! use flightatlas::config::Settings;
//! use flightatlas::service::FlightAtlas;
//!
//! let settings = Settings::load_or_default("flightatlas.ini")?;
//! let atlas = FlightAtlas::init(&settings).await?;
//!
//! let mut plans = atlas.controller().subscribe();
//! atlas.controller().select_origin("LAX").await;
//! ```

pub mod aggregate;
pub mod cache;
pub mod client;
pub mod config;
pub mod geo;
pub mod geodesy;
pub mod logging;
pub mod model;
pub mod poller;
pub mod selection;
pub mod service;
pub mod view;

/// Version of the FlightAtlas library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
