//! Domain model: airports, airlines, routes.
//!
//! These are the crate's own strongly typed records, decoupled from the
//! wire format. The [`crate::client`] boundary validates raw payloads and
//! converts them into these types; nothing downstream ever sees untyped
//! JSON. Serde derives exist so the reference cache can persist airports
//! and airlines between sessions.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// An airport keyed by its three-letter code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// IATA code (or FAA fallback), e.g. "LAX"
    pub iata: String,
    /// Display name
    pub name: String,
    /// Location
    pub position: GeoPoint,
    /// Number of direct destinations served from here
    pub destinations: u32,
    /// Optional reference URL for the info popup
    pub url: Option<String>,
}

impl Airport {
    /// Create a new airport record.
    pub fn new(iata: &str, name: &str, position: GeoPoint, destinations: u32) -> Self {
        Self {
            iata: iata.to_string(),
            name: name.to_string(),
            position,
            destinations,
            url: None,
        }
    }

    /// Attach a reference URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// An operator (airline) keyed by its short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    /// Operator code, e.g. "DL"
    pub code: String,
    /// Display name, whitespace-normalized
    pub name: String,
}

impl Airline {
    /// Create an airline, normalizing the raw display name.
    ///
    /// Upstream data carries embedded newlines inside some names; runs of
    /// CR/LF collapse to a single space and the result is trimmed.
    pub fn new(code: &str, raw_name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: normalize_name(raw_name),
        }
    }
}

fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_break = false;
    for c in raw.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out.trim().to_string()
}

/// A direct route between two airports under one operator.
///
/// Identity is the composite key `(airline, src, dst)`: the same airport
/// pair under two operators is two distinct routes.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Operator code
    pub airline: String,
    /// Origin airport code
    pub src: String,
    /// Destination airport code
    pub dst: String,
    /// Origin coordinate
    pub src_position: GeoPoint,
    /// Destination coordinate
    pub dst_position: GeoPoint,
}

impl Route {
    /// Composite identity key.
    pub fn key(&self) -> RouteKey {
        RouteKey {
            airline: self.airline.clone(),
            src: self.src.clone(),
            dst: self.dst.clone(),
        }
    }
}

/// Composite route identity `(operator, origin, destination)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub airline: String,
    pub src: String,
    pub dst: String,
}

/// Result of a route query against the server.
///
/// Computing a direct-route set can be expensive server-side, so the
/// endpoint may answer with a pending marker instead of data. The poller
/// resolves pending markers by re-querying.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteQueryResult {
    /// The server is still computing; re-query to resolve.
    Pending { query_id: String },
    /// The computed route set.
    Ready { routes: Vec<Route> },
}
