//! Wire format parsing and shape validation.
//!
//! The query API speaks GeoJSON: `/airports` is a FeatureCollection of
//! Points, `/routes` is either a FeatureCollection of two-point LineStrings
//! or a pending-query marker, and `/airlines` is a flat code → name map.
//! This module turns validated payloads into domain types and rejects
//! malformed shapes before they reach the core. Individual malformed
//! features are skipped with a warning; a malformed collection is a schema
//! error and goes back into the retry envelope.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::error::FetchError;
use crate::geo::GeoPoint;
use crate::model::{Airline, Airport, Route, RouteQueryResult};

/// Parses a response body as JSON, unwrapping one level of
/// string-encoding if the transport double-encoded it.
pub(super) fn parse_body(bytes: &[u8], endpoint: &str) -> Result<Value, FetchError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| FetchError::Schema {
        endpoint: endpoint.to_string(),
        detail: format!("body is not JSON: {}", e),
    })?;

    // Some gateway paths serialize the JSON document itself as a string.
    if let Value::String(inner) = value {
        return serde_json::from_str(&inner).map_err(|e| FetchError::Schema {
            endpoint: endpoint.to_string(),
            detail: format!("string-encoded body is not JSON: {}", e),
        });
    }

    Ok(value)
}

#[derive(Deserialize)]
struct AirportFeature {
    geometry: PointGeometry,
    properties: AirportProperties,
}

#[derive(Deserialize)]
struct PointGeometry {
    #[serde(rename = "type")]
    kind: String,
    /// `[lon, lat]` per GeoJSON
    coordinates: [f64; 2],
}

#[derive(Deserialize)]
struct AirportProperties {
    #[serde(rename = "IATA")]
    iata: Option<String>,
    #[serde(rename = "FAA")]
    faa: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    url: Option<String>,
    #[serde(default)]
    destinations: Option<u32>,
}

/// Validates an `/airports` payload and converts it to domain records.
///
/// The collection must be a `FeatureCollection` carrying a `features`
/// array. Features missing a usable code or coordinate are skipped, not
/// fatal; upstream data is allowed to contain the odd bad row.
pub(super) fn airports_from_value(value: &Value, endpoint: &str) -> Result<Vec<Airport>, FetchError> {
    let features = feature_array(value, endpoint)?;

    let mut airports = Vec::with_capacity(features.len());
    for raw in features {
        let feature: AirportFeature = match serde_json::from_value(raw.clone()) {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "Skipping invalid airport feature");
                continue;
            }
        };
        if feature.geometry.kind != "Point" {
            warn!(kind = %feature.geometry.kind, "Skipping airport with non-Point geometry");
            continue;
        }
        let [lon, lat] = feature.geometry.coordinates;
        let position = match GeoPoint::new(lat, lon) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Skipping airport with invalid coordinate");
                continue;
            }
        };
        // IATA is the key; FAA stands in when IATA is absent.
        let code = match airport_code(&feature.properties) {
            Some(c) => c,
            None => {
                warn!("Skipping airport feature without a usable code");
                continue;
            }
        };
        let Some(name) = feature.properties.name else {
            warn!(code = %code, "Skipping airport feature without a name");
            continue;
        };

        let mut airport = Airport::new(
            &code,
            &name,
            position,
            feature.properties.destinations.unwrap_or(0),
        );
        if let Some(url) = feature.properties.url {
            airport = airport.with_url(url);
        }
        airports.push(airport);
    }

    Ok(airports)
}

fn airport_code(props: &AirportProperties) -> Option<String> {
    let is_code = |s: &str| s.len() == 3 && s.chars().all(|c| c.is_ascii_alphanumeric());
    props
        .iata
        .as_deref()
        .filter(|s| is_code(s))
        .or_else(|| props.faa.as_deref().filter(|s| is_code(s)))
        .map(|s| s.to_ascii_uppercase())
}

/// Validates an `/airlines` payload: a flat JSON object mapping operator
/// code to display name, with no nested values.
pub(super) fn airlines_from_value(value: &Value, endpoint: &str) -> Result<Vec<Airline>, FetchError> {
    let Value::Object(map) = value else {
        return Err(FetchError::Schema {
            endpoint: endpoint.to_string(),
            detail: "expected a JSON object of code -> name".to_string(),
        });
    };

    let mut airlines = Vec::with_capacity(map.len());
    for (code, name) in map {
        let Value::String(name) = name else {
            return Err(FetchError::Schema {
                endpoint: endpoint.to_string(),
                detail: format!("value for '{}' is not a string", code),
            });
        };
        airlines.push(Airline::new(code, name));
    }

    Ok(airlines)
}

#[derive(Deserialize)]
struct RouteFeature {
    geometry: LineGeometry,
    properties: RouteProperties,
}

#[derive(Deserialize)]
struct LineGeometry {
    #[serde(rename = "type")]
    kind: String,
    /// `[[src_lon, src_lat], [dst_lon, dst_lat]]`
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct RouteProperties {
    airline_code: Option<String>,
    src_airport: Option<String>,
    dst_airport: Option<String>,
}

/// Interprets a `/routes` payload as either a pending-query marker or a
/// ready route set.
pub(super) fn routes_from_value(value: &Value, endpoint: &str) -> Result<RouteQueryResult, FetchError> {
    // A pending marker is an object carrying `query_id` instead of data.
    if let Some(query_id) = value.get("query_id") {
        let query_id = match query_id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(RouteQueryResult::Pending { query_id });
    }

    let features = feature_array(value, endpoint)?;

    let mut routes = Vec::with_capacity(features.len());
    for raw in features {
        let feature: RouteFeature = match serde_json::from_value(raw.clone()) {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "Skipping invalid route feature");
                continue;
            }
        };
        if feature.geometry.kind != "LineString" || feature.geometry.coordinates.len() < 2 {
            warn!("Skipping route without a two-point LineString");
            continue;
        }
        let (Some(airline), Some(src), Some(dst)) = (
            feature.properties.airline_code,
            feature.properties.src_airport,
            feature.properties.dst_airport,
        ) else {
            warn!("Skipping route feature with missing identity fields");
            continue;
        };
        let [src_lon, src_lat] = feature.geometry.coordinates[0];
        let [dst_lon, dst_lat] = feature.geometry.coordinates[1];
        let (src_position, dst_position) =
            match (GeoPoint::new(src_lat, src_lon), GeoPoint::new(dst_lat, dst_lon)) {
                (Ok(a), Ok(b)) => (a, b),
                _ => {
                    warn!(airline = %airline, src = %src, dst = %dst,
                          "Skipping route with invalid endpoint coordinate");
                    continue;
                }
            };

        routes.push(Route {
            airline,
            src,
            dst,
            src_position,
            dst_position,
        });
    }

    Ok(RouteQueryResult::Ready { routes })
}

fn feature_array<'a>(value: &'a Value, endpoint: &str) -> Result<&'a Vec<Value>, FetchError> {
    let is_collection = value.get("type").and_then(Value::as_str) == Some("FeatureCollection");
    let features = value.get("features").and_then(Value::as_array);

    match (is_collection, features) {
        (true, Some(features)) => Ok(features),
        _ => Err(FetchError::Schema {
            endpoint: endpoint.to_string(),
            detail: "expected a FeatureCollection with a features array".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────
    // Body parsing
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn plain_json_body_parses() {
        let v = parse_body(br#"{"a": 1}"#, "/airports").unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn double_encoded_body_is_unwrapped() {
        let body = serde_json::to_vec(&"{\"a\": 1}").unwrap();
        let v = parse_body(&body, "/routes").unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn non_json_body_is_schema_error() {
        let err = parse_body(b"<html>oops</html>", "/airports").unwrap_err();
        assert!(matches!(err, FetchError::Schema { .. }));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Airports
    // ─────────────────────────────────────────────────────────────────────

    fn airport_collection(features: &str) -> Value {
        serde_json::from_str(&format!(
            r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
            features
        ))
        .unwrap()
    }

    const LAX_FEATURE: &str = r#"{
        "geometry": {"type": "Point", "coordinates": [-118.408, 33.9425]},
        "properties": {"IATA": "LAX", "FAA": "LAX", "Name": "Los Angeles International",
                       "url": "https://example.org/lax", "destinations": 120}
    }"#;

    #[test]
    fn airport_feature_converts() {
        let v = airport_collection(LAX_FEATURE);
        let airports = airports_from_value(&v, "/airports").unwrap();
        assert_eq!(airports.len(), 1);
        let lax = &airports[0];
        assert_eq!(lax.iata, "LAX");
        assert_eq!(lax.name, "Los Angeles International");
        assert_eq!(lax.destinations, 120);
        assert_eq!(lax.url.as_deref(), Some("https://example.org/lax"));
        assert!((lax.position.lat - 33.9425).abs() < 1e-9);
    }

    #[test]
    fn faa_code_stands_in_for_missing_iata() {
        let v = airport_collection(
            r#"{"geometry": {"type": "Point", "coordinates": [-150.0, 61.0]},
                "properties": {"IATA": null, "FAA": "A23", "Name": "Strip"}}"#,
        );
        let airports = airports_from_value(&v, "/airports").unwrap();
        assert_eq!(airports[0].iata, "A23");
    }

    #[test]
    fn invalid_airport_features_are_skipped_not_fatal() {
        let v = airport_collection(&format!(
            r#"{{"geometry": {{"type": "Point", "coordinates": [-118.4, 95.0]}},
                "properties": {{"IATA": "BAD", "Name": "Out of range"}}}},
               {{"geometry": {{"type": "Point", "coordinates": [0.0, 0.0]}},
                "properties": {{"Name": "No code"}}}},
               {}"#,
            LAX_FEATURE
        ));
        let airports = airports_from_value(&v, "/airports").unwrap();
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].iata, "LAX");
    }

    #[test]
    fn airports_without_feature_collection_rejected() {
        let v = serde_json::json!({"features": []});
        assert!(airports_from_value(&v, "/airports").is_err());
        let v = serde_json::json!({"type": "FeatureCollection"});
        assert!(airports_from_value(&v, "/airports").is_err());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Airlines
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn airlines_flat_map_converts_and_normalizes() {
        let v = serde_json::json!({"DL": "Delta\r\nAir Lines", "AA": "American"});
        let airlines = airlines_from_value(&v, "/airlines").unwrap();
        assert_eq!(airlines.len(), 2);
        let dl = airlines.iter().find(|a| a.code == "DL").unwrap();
        assert_eq!(dl.name, "Delta Air Lines");
    }

    #[test]
    fn airlines_with_nested_value_rejected() {
        let v = serde_json::json!({"DL": {"name": "Delta"}});
        assert!(matches!(
            airlines_from_value(&v, "/airlines"),
            Err(FetchError::Schema { .. })
        ));
    }

    #[test]
    fn airlines_non_object_rejected() {
        let v = serde_json::json!(["DL", "AA"]);
        assert!(airlines_from_value(&v, "/airlines").is_err());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Routes
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn query_id_body_is_pending() {
        let v = serde_json::json!({"query_id": "abc-123"});
        let result = routes_from_value(&v, "/routes").unwrap();
        assert_eq!(
            result,
            RouteQueryResult::Pending {
                query_id: "abc-123".to_string()
            }
        );
    }

    #[test]
    fn route_features_convert() {
        let v = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "geometry": {"type": "LineString",
                             "coordinates": [[-118.408, 33.9425], [-73.7789, 40.6413]]},
                "properties": {"airline_code": "DL", "src_airport": "LAX", "dst_airport": "JFK"}
            }]
        });
        let RouteQueryResult::Ready { routes } = routes_from_value(&v, "/routes").unwrap() else {
            panic!("expected ready");
        };
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].airline, "DL");
        assert!((routes[0].dst_position.lat - 40.6413).abs() < 1e-9);
    }

    #[test]
    fn route_missing_identity_fields_skipped() {
        let v = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "geometry": {"type": "LineString",
                             "coordinates": [[-118.4, 33.9], [-73.8, 40.6]]},
                "properties": {"src_airport": "LAX", "dst_airport": "JFK"}
            }]
        });
        let RouteQueryResult::Ready { routes } = routes_from_value(&v, "/routes").unwrap() else {
            panic!("expected ready");
        };
        assert!(routes.is_empty());
    }

    #[test]
    fn empty_ready_collection_is_ready_with_no_routes() {
        let v = serde_json::json!({"type": "FeatureCollection", "features": []});
        assert_eq!(
            routes_from_value(&v, "/routes").unwrap(),
            RouteQueryResult::Ready { routes: vec![] }
        );
    }
}
