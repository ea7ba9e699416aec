//! Coordinate type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, -90 at the south pole
    pub lat: f64,
    /// Longitude, -180 at the west edge of the antimeridian
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// Rejects non-finite values and anything outside the nominal
    /// latitude/longitude ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(GeoError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Returns a copy with the longitude shifted by `degrees`, unvalidated.
    ///
    /// Used for antimeridian wrap duplication, where the shifted copy is
    /// deliberately outside the nominal ±180 range so that a repeating map
    /// view renders the arc continuously.
    #[inline]
    pub fn with_lon_offset(self, degrees: f64) -> Self {
        Self {
            lat: self.lat,
            lon: self.lon + degrees,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Errors that can occur when constructing a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude is outside the valid range (-90 to 90) or not finite
    InvalidLatitude(f64),
    /// Longitude is outside the valid range (-180 to 180) or not finite
    InvalidLongitude(f64),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            GeoError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
        }
    }
}

impl std::error::Error for GeoError {}
