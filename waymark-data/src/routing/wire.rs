//! Wire types for the routing service's `route` endpoint.
//!
//! Requests always ask for pre-encoded geometry to keep payloads small;
//! responses may still carry either encoding, so [`WireGeometry`] accepts
//! both the compact string and a GeoJSON-like coordinate object.

use serde::{Deserialize, Serialize};
use waymark_core::RouteRequest;

/// Profile used when the request names none.
pub const DEFAULT_VEHICLE: &str = "car";

/// JSON body posted to the `route` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequestBody {
    /// Waypoints as `[lng, lat]` pairs.
    pub points: Vec<[f64; 2]>,
    /// Profile key.
    pub vehicle: String,
    /// Instruction language.
    pub locale: String,
    /// Service debug output.
    pub debug: bool,
    /// Ask for compact polyline geometry.
    pub points_encoded: bool,
    /// Ask for turn-by-turn instructions.
    pub instructions: bool,
    /// Ask for three-dimensional geometry.
    pub elevation: bool,
    /// Waypoint reordering, sent as a string flag.
    pub optimize: &'static str,
    /// Upper bound on alternative routes.
    #[serde(rename = "alternative_route.max_paths")]
    pub alternative_route_max_paths: u32,
    /// Disable the contraction-hierarchy speed-up.
    #[serde(rename = "ch.disable")]
    pub ch_disable: bool,
    /// Routing algorithm.
    pub algorithm: &'static str,
}

impl RouteRequestBody {
    /// Build the body for `request` with the fixed service defaults.
    #[must_use]
    pub fn new(request: &RouteRequest, locale: &str) -> Self {
        let vehicle = request
            .profile
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or(DEFAULT_VEHICLE);
        Self {
            points: request.points.iter().map(|point| [point.x, point.y]).collect(),
            vehicle: vehicle.to_owned(),
            locale: locale.to_owned(),
            debug: false,
            points_encoded: true,
            instructions: true,
            elevation: false,
            optimize: "false",
            alternative_route_max_paths: 2,
            ch_disable: true,
            algorithm: "alternative_route",
        }
    }
}

/// Successful `route` response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Attribution and timing.
    #[serde(default)]
    pub info: ResponseInfo,
    /// Best path first, then alternatives.
    #[serde(default)]
    pub paths: Vec<PathResponse>,
}

/// Metadata block of a `route` response.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseInfo {
    /// Data attributions.
    #[serde(default, alias = "copyright")]
    pub copyrights: Vec<String>,
    /// Processing time in milliseconds.
    #[serde(default)]
    pub took: u64,
}

/// One path of a `route` response.
#[derive(Debug, Deserialize)]
pub struct PathResponse {
    /// Length in metres.
    pub distance: f64,
    /// Travel time in milliseconds.
    pub time: u64,
    /// Total climb in metres.
    #[serde(default)]
    pub ascend: f64,
    /// Total descent in metres.
    #[serde(default)]
    pub descend: f64,
    /// `[min_lng, min_lat, max_lng, max_lat]`.
    pub bbox: Option<[f64; 4]>,
    /// Turn-by-turn instructions.
    #[serde(default)]
    pub instructions: Vec<InstructionResponse>,
    /// Order in which the requested points are visited.
    #[serde(default)]
    pub points_order: Vec<usize>,
    /// Route geometry.
    pub points: WireGeometry,
    /// Requested points snapped onto the road network.
    pub snapped_waypoints: Option<WireGeometry>,
}

/// One instruction of a path.
#[derive(Debug, Deserialize)]
pub struct InstructionResponse {
    /// Length in metres.
    pub distance: f64,
    /// Time in milliseconds.
    pub time: u64,
    /// Inclusive `[start, end]` into the path geometry.
    pub interval: [usize; 2],
    /// Turn direction code.
    pub sign: i32,
    /// Localised instruction text.
    #[serde(default)]
    pub text: String,
    /// Street the instruction leads onto.
    #[serde(default)]
    pub street_name: String,
}

/// Geometry in either wire encoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireGeometry {
    /// Compact polyline string.
    Encoded(String),
    /// `{"type": "LineString", "coordinates": [[lng, lat(, ele)], ...]}`.
    Coordinates {
        /// Vertices in `[lng, lat(, ele)]` order.
        coordinates: Vec<Vec<f64>>,
    },
}

/// Body returned with a non-success status.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure summary.
    pub message: String,
    /// Detailed causes, if any.
    #[serde(default)]
    pub hints: Vec<ErrorHint>,
}

/// One hint of an error body.
#[derive(Debug, Deserialize)]
pub struct ErrorHint {
    /// Hint text.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn body_carries_fixed_defaults() {
        let request = RouteRequest {
            points: vec![Coord { x: 13.38, y: 52.52 }, Coord { x: 13.45, y: 52.49 }],
            profile: Some("bike".to_owned()),
        };

        let body = serde_json::to_value(RouteRequestBody::new(&request, "en"))
            .expect("body serialises");

        assert_eq!(
            body,
            json!({
                "points": [[13.38, 52.52], [13.45, 52.49]],
                "vehicle": "bike",
                "locale": "en",
                "debug": false,
                "points_encoded": true,
                "instructions": true,
                "elevation": false,
                "optimize": "false",
                "alternative_route.max_paths": 2,
                "ch.disable": true,
                "algorithm": "alternative_route"
            })
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    fn missing_profile_defaults_to_car(#[case] profile: Option<String>) {
        let request = RouteRequest {
            points: Vec::new(),
            profile,
        };
        assert_eq!(RouteRequestBody::new(&request, "en").vehicle, "car");
    }

    #[rstest]
    fn geometry_accepts_both_encodings() {
        let encoded: WireGeometry = serde_json::from_value(json!("_p~iF~ps|U")).expect("string");
        assert_eq!(encoded, WireGeometry::Encoded("_p~iF~ps|U".to_owned()));

        let object: WireGeometry = serde_json::from_value(json!({
            "type": "LineString",
            "coordinates": [[13.38, 52.52], [13.45, 52.49, 40.0]]
        }))
        .expect("object");
        assert_eq!(
            object,
            WireGeometry::Coordinates {
                coordinates: vec![vec![13.38, 52.52], vec![13.45, 52.49, 40.0]]
            }
        );
    }

    #[rstest]
    fn error_body_collects_hints() {
        let body: ErrorResponse = serde_json::from_value(json!({
            "message": "Point 0 is out of bounds",
            "hints": [{"message": "Point 0 is out of bounds", "details": "PointOutOfBounds"}]
        }))
        .expect("error body");
        assert_eq!(body.message, "Point 0 is out of bounds");
        assert_eq!(body.hints.len(), 1);
    }
}
