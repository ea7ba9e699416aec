//! Geodesic projection engine.
//!
//! Converts a pair of geographic coordinates into one or two renderable
//! great-circle paths. When the shorter path crosses the antimeridian the
//! engine emits a second copy of the arc with both endpoints shifted a
//! full world-width in longitude, so a repeating map view draws the path
//! continuously instead of as a line across the whole map. Line weight is
//! a step function of zoom, intended to be recomputed on zoom-change
//! events only.

use crate::geo::{lon_delta, GeoPoint};

/// Default arc color.
pub const DEFAULT_ARC_COLOR: &str = "#64b5f7";

/// Arc color while hovered or selected.
pub const HIGHLIGHT_ARC_COLOR: &str = "#02508f";

/// Arc color for a loaded route layer.
pub const ROUTE_ARC_COLOR: &str = "#0076d6";

/// Default arc opacity for a loaded route layer.
pub const ROUTE_ARC_OPACITY: f32 = 0.8;

/// Line weight for the current zoom level.
///
/// Discrete breakpoints: state-level zoom draws heavy lines, regional
/// zoom medium, country-level thin.
pub fn weight_for_zoom(zoom: u8) -> u32 {
    if zoom >= 10 {
        6
    } else if zoom >= 7 {
        4
    } else {
        2
    }
}

/// Visual style attached to an arc descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcStyle {
    pub color: String,
    pub weight: u32,
    pub opacity: f32,
}

impl ArcStyle {
    /// Default route style at the given zoom.
    pub fn for_zoom(zoom: u8) -> Self {
        Self {
            color: ROUTE_ARC_COLOR.to_string(),
            weight: weight_for_zoom(zoom),
            opacity: ROUTE_ARC_OPACITY,
        }
    }

    /// Hover/selection style: heavier and darker than the default.
    pub fn highlighted(zoom: u8) -> Self {
        Self {
            color: HIGHLIGHT_ARC_COLOR.to_string(),
            weight: weight_for_zoom(zoom) + 2,
            opacity: 1.0,
        }
    }
}

/// An ordered endpoint pair describing one renderable great-circle arc.
///
/// Wrapped duplicates carry longitudes outside ±180 on purpose; all arcs
/// emitted for one input are replaced as a unit when the input changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

impl ArcPath {
    /// Samples `segments + 1` points along the great circle between the
    /// endpoints, endpoints included.
    ///
    /// Longitudes are unwrapped to stay continuous with `from`, so a
    /// wrapped duplicate samples in its shifted frame rather than
    /// snapping back inside ±180. Antipodal endpoints have no unique
    /// great circle; that case falls back to linear interpolation.
    pub fn sample(&self, segments: usize) -> Vec<GeoPoint> {
        let segments = segments.max(1);
        let a = unit_vector(&self.from);
        let b = unit_vector(&self.to);
        let dot = (a[0] * b[0] + a[1] * b[1] + a[2] * b[2]).clamp(-1.0, 1.0);
        let angle = dot.acos();

        if angle.sin().abs() < 1e-9 {
            return self.sample_linear(segments);
        }

        let mut points = Vec::with_capacity(segments + 1);
        let mut prev_lon = self.from.lon;
        for i in 0..=segments {
            let f = i as f64 / segments as f64;
            let wa = ((1.0 - f) * angle).sin() / angle.sin();
            let wb = (f * angle).sin() / angle.sin();
            let x = wa * a[0] + wb * b[0];
            let y = wa * a[1] + wb * b[1];
            let z = wa * a[2] + wb * b[2];

            let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
            let mut lon = y.atan2(x).to_degrees();
            // Keep the longitude sequence continuous with the previous
            // sample; this is what preserves a wrapped arc's frame.
            while lon - prev_lon > 180.0 {
                lon -= 360.0;
            }
            while lon - prev_lon < -180.0 {
                lon += 360.0;
            }
            prev_lon = lon;
            points.push(GeoPoint { lat, lon });
        }
        points
    }

    /// Degenerate fallback: identical or antipodal endpoints.
    fn sample_linear(&self, segments: usize) -> Vec<GeoPoint> {
        (0..=segments)
            .map(|i| {
                let f = i as f64 / segments as f64;
                GeoPoint {
                    lat: self.from.lat + f * (self.to.lat - self.from.lat),
                    lon: self.from.lon + f * (self.to.lon - self.from.lon),
                }
            })
            .collect()
    }
}

fn unit_vector(p: &GeoPoint) -> [f64; 3] {
    let lat = p.lat.to_radians();
    let lon = p.lon.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Projects an origin/destination pair into renderable arcs.
///
/// One arc when `|Δlon| ≤ 180°`. When the shorter path crosses the
/// antimeridian, a second arc duplicates the first with both endpoints
/// shifted by ±360° longitude (sign following the delta), covering the
/// adjacent world copy.
pub fn project_route(src: GeoPoint, dst: GeoPoint) -> Vec<ArcPath> {
    let delta = lon_delta(&src, &dst);
    let primary = ArcPath { from: src, to: dst };

    if delta.abs() <= 180.0 {
        return vec![primary];
    }

    let shift = 360.0_f64.copysign(delta);
    let wrapped = ArcPath {
        from: src.with_lon_offset(shift),
        to: dst.with_lon_offset(shift),
    };
    vec![primary, wrapped]
}
