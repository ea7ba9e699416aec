//! Declarative rendering output.
//!
//! The core never draws anything. It produces a [`RenderPlan`] of marker
//! and arc descriptors with intents attached, regenerated whenever
//! selection state, route data or the zoom step changes. Consumers clear
//! the previous plan and draw the new one; every arc emitted for one
//! route replaces as a unit, so nothing leaks when the selection moves.

use std::collections::{HashMap, HashSet};

use crate::geodesy::{project_route, ArcPath, ArcStyle};
use crate::model::Airport;
use crate::selection::{Intent, SelectionPhase, SelectionState};

/// Marker stroke color.
pub const MARKER_STROKE_COLOR: &str = "#000000";

/// Marker fill color keyed on how many destinations an airport serves.
pub fn color_for_destinations(count: u32) -> &'static str {
    if count > 100 {
        "#62eb07"
    } else if count > 50 {
        "#fee08b"
    } else if count > 10 {
        "#fc8d59"
    } else {
        "#ff0000"
    }
}

/// Marker radius grows with destination count, capped at 7.
pub fn radius_for_destinations(count: u32) -> f64 {
    3.0 + (count as f64 / 20.0).min(4.0)
}

/// A renderable circle marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor {
    pub position: crate::geo::GeoPoint,
    pub radius: f64,
    pub color: String,
    pub label: String,
    /// Intent the surface reports when the marker is picked.
    pub intent: Intent,
}

/// A renderable arc.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcDescriptor {
    pub path: ArcPath,
    pub style: ArcStyle,
    /// Intent the surface reports when the arc is picked.
    pub intent: Intent,
}

/// The full declarative output for one state snapshot.
///
/// Replaced wholesale on every change: consumers tear down the previous
/// plan before drawing this one, independent of any view-framework
/// remount semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub generation: u64,
    pub markers: Vec<MarkerDescriptor>,
    pub arcs: Vec<ArcDescriptor>,
}

impl RenderPlan {
    /// Derives the plan for a selection state.
    pub fn build(state: &SelectionState, airports: &[Airport]) -> Self {
        match state.phase {
            SelectionPhase::Idle | SelectionPhase::Loading => Self {
                generation: state.generation,
                markers: airport_markers(airports),
                arcs: Vec::new(),
            },
            SelectionPhase::RoutesLoaded => {
                let by_code: HashMap<&str, &Airport> =
                    airports.iter().map(|a| (a.iata.as_str(), a)).collect();
                Self {
                    generation: state.generation,
                    markers: endpoint_markers(state, &by_code),
                    arcs: route_arcs(state),
                }
            }
        }
    }
}

/// Markers for the whole airport layer, drawn while nothing is selected.
///
/// Sorted ascending by destination count so busier airports draw on top.
fn airport_markers(airports: &[Airport]) -> Vec<MarkerDescriptor> {
    let mut sorted: Vec<&Airport> = airports.iter().collect();
    sorted.sort_by_key(|a| a.destinations);

    sorted
        .into_iter()
        .map(|airport| MarkerDescriptor {
            position: airport.position,
            radius: radius_for_destinations(airport.destinations),
            color: color_for_destinations(airport.destinations).to_string(),
            label: format!("{} ({})", airport.name, airport.iata),
            intent: Intent::SelectOrigin(airport.iata.clone()),
        })
        .collect()
}

/// Markers for the endpoints of the visible routes.
fn endpoint_markers(
    state: &SelectionState,
    by_code: &HashMap<&str, &Airport>,
) -> Vec<MarkerDescriptor> {
    let mut seen = HashSet::new();
    let mut markers = Vec::new();

    for route in state.visible_routes() {
        for (code, position) in [
            (route.src.as_str(), route.src_position),
            (route.dst.as_str(), route.dst_position),
        ] {
            if !seen.insert(code.to_string()) {
                continue;
            }
            let (name, destinations) = match by_code.get(code) {
                Some(airport) => (airport.name.as_str(), airport.destinations),
                None => ("Unknown Airport", 0),
            };
            markers.push(MarkerDescriptor {
                position,
                radius: radius_for_destinations(destinations),
                color: color_for_destinations(destinations).to_string(),
                label: format!("{} ({})", name, code),
                intent: Intent::SelectRoute {
                    dst: code.to_string(),
                    operator: None,
                },
            });
        }
    }
    markers
}

/// Arcs for the visible routes, styled for the current zoom step and
/// highlighted when a specific route is selected.
fn route_arcs(state: &SelectionState) -> Vec<ArcDescriptor> {
    let style = if state.has_route_selection() {
        ArcStyle::highlighted(state.zoom)
    } else {
        ArcStyle::for_zoom(state.zoom)
    };

    let mut arcs = Vec::new();
    for route in state.visible_routes() {
        for path in project_route(route.src_position, route.dst_position) {
            arcs.push(ArcDescriptor {
                path,
                style: style.clone(),
                intent: Intent::SelectRoute {
                    dst: route.dst.clone(),
                    operator: Some(route.airline.clone()),
                },
            });
        }
    }
    arcs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::model::Route;
    use crate::selection::DEFAULT_ZOOM;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn airports() -> Vec<Airport> {
        vec![
            Airport::new("LAX", "Los Angeles International", point(33.94, -118.41), 120),
            Airport::new("JFK", "John F. Kennedy International", point(40.64, -73.78), 95),
            Airport::new("BET", "Bethel", point(60.78, -161.84), 4),
        ]
    }

    fn route(airline: &str, src: &str, dst: &str) -> Route {
        let positions: HashMap<&str, GeoPoint> = [
            ("LAX", point(33.94, -118.41)),
            ("JFK", point(40.64, -73.78)),
            ("SYD", point(-33.95, 151.18)),
        ]
        .into_iter()
        .collect();
        Route {
            airline: airline.to_string(),
            src: src.to_string(),
            dst: dst.to_string(),
            src_position: positions[src],
            dst_position: positions[dst],
        }
    }

    fn loaded_state(routes: Vec<Route>) -> SelectionState {
        let mut state = SelectionState::new();
        state.phase = SelectionPhase::RoutesLoaded;
        state.origin = Some("LAX".to_string());
        state.filtered = routes.clone();
        state.routes = routes;
        state
    }

    #[test]
    fn idle_plan_shows_all_airports_no_arcs() {
        let state = SelectionState::new();
        let plan = RenderPlan::build(&state, &airports());

        assert_eq!(plan.markers.len(), 3);
        assert!(plan.arcs.is_empty());
        // Ascending by destinations: quieter airports first, busy on top
        assert_eq!(plan.markers[0].label, "Bethel (BET)");
        assert_eq!(plan.markers[2].label, "Los Angeles International (LAX)");
    }

    #[test]
    fn marker_style_follows_destination_count() {
        let state = SelectionState::new();
        let plan = RenderPlan::build(&state, &airports());

        let lax = plan.markers.iter().find(|m| m.label.contains("LAX")).unwrap();
        assert_eq!(lax.color, "#62eb07");
        assert!((lax.radius - 7.0).abs() < 1e-9); // capped at 3 + 4
        let bet = plan.markers.iter().find(|m| m.label.contains("BET")).unwrap();
        assert_eq!(bet.color, "#ff0000");
        assert!((bet.radius - 3.2).abs() < 1e-9);
    }

    #[test]
    fn marker_intent_selects_origin() {
        let state = SelectionState::new();
        let plan = RenderPlan::build(&state, &airports());
        assert_eq!(
            plan.markers[2].intent,
            Intent::SelectOrigin("LAX".to_string())
        );
    }

    #[test]
    fn loaded_plan_draws_arcs_and_endpoint_markers() {
        let state = loaded_state(vec![route("DL", "LAX", "JFK")]);
        let plan = RenderPlan::build(&state, &airports());

        assert_eq!(plan.arcs.len(), 1);
        assert_eq!(plan.arcs[0].style.weight, 2); // DEFAULT_ZOOM is below 7
        // Two endpoints, deduplicated
        assert_eq!(plan.markers.len(), 2);
        assert!(plan.markers.iter().any(|m| m.label.contains("JFK")));
    }

    #[test]
    fn endpoint_markers_dedupe_shared_airports() {
        let state = loaded_state(vec![route("DL", "LAX", "JFK"), route("AA", "LAX", "JFK")]);
        let plan = RenderPlan::build(&state, &airports());

        assert_eq!(plan.markers.len(), 2);
        assert_eq!(plan.arcs.len(), 2);
    }

    #[test]
    fn unknown_endpoint_gets_fallback_label() {
        let state = loaded_state(vec![route("QF", "LAX", "SYD")]);
        let plan = RenderPlan::build(&state, &airports());

        let syd = plan.markers.iter().find(|m| m.label.contains("SYD")).unwrap();
        assert_eq!(syd.label, "Unknown Airport (SYD)");
        assert_eq!(syd.color, "#ff0000");
    }

    #[test]
    fn antimeridian_route_contributes_two_arcs() {
        let state = loaded_state(vec![route("QF", "LAX", "SYD")]);
        let plan = RenderPlan::build(&state, &airports());
        assert_eq!(plan.arcs.len(), 2);
    }

    #[test]
    fn selected_route_is_highlighted() {
        let mut state = loaded_state(vec![route("DL", "LAX", "JFK"), route("DL", "LAX", "SYD")]);
        state.destination = Some("JFK".to_string());
        state.selected = vec![route("DL", "LAX", "JFK")];

        let plan = RenderPlan::build(&state, &airports());
        assert_eq!(plan.arcs.len(), 1);
        assert_eq!(plan.arcs[0].style, ArcStyle::highlighted(DEFAULT_ZOOM));
    }

    #[test]
    fn zoom_step_changes_arc_weight() {
        let mut state = loaded_state(vec![route("DL", "LAX", "JFK")]);
        state.zoom = 11;
        let plan = RenderPlan::build(&state, &airports());
        assert_eq!(plan.arcs[0].style.weight, 6);
    }
}
