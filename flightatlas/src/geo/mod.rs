//! Geographic coordinate types.
//!
//! Everything in the crate that carries a position uses [`GeoPoint`],
//! validated once at construction so the core never sees an out-of-range
//! coordinate. Wrapped copies produced for antimeridian rendering are the
//! one sanctioned exception (see [`GeoPoint::with_lon_offset`]).

mod types;

pub use types::{GeoError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Signed longitude delta from `from` to `to` in degrees.
///
/// The raw difference, not normalized: a pair straddling the antimeridian
/// yields a magnitude above 180, which is exactly what the projection
/// engine keys its wrap handling on.
#[inline]
pub fn lon_delta(from: &GeoPoint, to: &GeoPoint) -> f64 {
    to.lon - from.lon
}

#[cfg(test)]
mod tests;
