//! Decoded route results.
//!
//! A [`RouteResult`] is derived output only. It never feeds back into the
//! query state.

use std::time::Duration;

use geo::{Coord, Rect};

/// A decoded geometry vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Elevation in metres, present for three-dimensional geometry.
    pub elevation: Option<f64>,
}

impl Position {
    /// Planar coordinate, `x = longitude`, `y = latitude`.
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

/// Metadata attached to every route response.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteInfo {
    /// Attribution strings to display with the route.
    pub copyright: Vec<String>,
    /// Server-side processing time in milliseconds.
    pub took_ms: u64,
}

/// A turn-by-turn instruction and the stretch of geometry it covers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Distance covered in metres.
    pub distance: f64,
    /// Time needed for this instruction.
    pub time: Duration,
    /// Inclusive `[start, end]` indices into the path geometry.
    pub interval: (usize, usize),
    /// Turn sign as reported by the service.
    pub sign: i32,
    /// Human readable instruction.
    pub text: String,
    /// Street the instruction refers to, empty when unnamed.
    pub street_name: String,
    /// Slice of the path geometry for `interval`, end inclusive.
    pub geometry: Vec<Position>,
}

/// One candidate route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePath {
    /// Total distance in metres.
    pub distance: f64,
    /// Total travel time.
    pub time: Duration,
    /// Accumulated ascent in metres.
    pub ascend: f64,
    /// Accumulated descent in metres.
    pub descend: f64,
    /// Bounds of the route geometry.
    pub bbox: Option<Rect<f64>>,
    /// Turn-by-turn instructions.
    pub instructions: Vec<Instruction>,
    /// Order in which the requested points are visited.
    pub points_order: Vec<usize>,
    /// Decoded route geometry.
    pub geometry: Vec<Position>,
    /// Requested points snapped onto the road network.
    pub snapped_waypoints: Vec<Position>,
}

/// A complete routing response.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    /// Response metadata.
    pub info: RouteInfo,
    /// Candidate routes, best first.
    pub paths: Vec<RoutePath>,
}

impl RouteResult {
    /// The preferred path, if the service returned any.
    #[must_use]
    pub fn best_path(&self) -> Option<&RoutePath> {
        self.paths.first()
    }
}
