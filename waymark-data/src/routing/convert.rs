//! Turn wire responses into decoded route results.
//!
//! Geometry is decoded per path (route line and snapped waypoints alike),
//! then every instruction receives the slice of its path's geometry named by
//! its interval, end index included.

use std::time::Duration;

use geo::{Coord, Rect};
use waymark_core::{
    Instruction, Position, RouteInfo, RoutePath, RouteResult, RoutingError, decode_polyline,
};

use super::wire::{ErrorResponse, InstructionResponse, PathResponse, RouteResponse, WireGeometry};

/// Convert a successful response, decoding three-dimensional geometry when
/// `with_elevation` is set.
pub(crate) fn convert_route_response(
    response: RouteResponse,
    with_elevation: bool,
) -> Result<RouteResult, RoutingError> {
    let paths = response
        .paths
        .into_iter()
        .map(|path| convert_path(path, with_elevation))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RouteResult {
        info: RouteInfo {
            copyright: response.info.copyrights,
            took_ms: response.info.took,
        },
        paths,
    })
}

fn convert_path(path: PathResponse, with_elevation: bool) -> Result<RoutePath, RoutingError> {
    let geometry = decode_geometry(&path.points, with_elevation)?;
    let snapped_waypoints = path
        .snapped_waypoints
        .as_ref()
        .map(|snapped| decode_geometry(snapped, with_elevation))
        .transpose()?
        .unwrap_or_default();
    let instructions = path
        .instructions
        .into_iter()
        .map(|instruction| convert_instruction(instruction, &geometry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RoutePath {
        distance: path.distance,
        time: Duration::from_millis(path.time),
        ascend: path.ascend,
        descend: path.descend,
        bbox: path.bbox.map(bbox_to_rect),
        instructions,
        points_order: path.points_order,
        geometry,
        snapped_waypoints,
    })
}

fn convert_instruction(
    instruction: InstructionResponse,
    geometry: &[Position],
) -> Result<Instruction, RoutingError> {
    let [start, end] = instruction.interval;
    Ok(Instruction {
        distance: instruction.distance,
        time: Duration::from_millis(instruction.time),
        interval: (start, end),
        sign: instruction.sign,
        text: instruction.text,
        street_name: instruction.street_name,
        geometry: slice_interval(geometry, start, end)?,
    })
}

/// Copy `geometry[start..=end]`.
pub(crate) fn slice_interval(
    geometry: &[Position],
    start: usize,
    end: usize,
) -> Result<Vec<Position>, RoutingError> {
    geometry
        .get(start..=end)
        .map(<[Position]>::to_vec)
        .ok_or(RoutingError::InstructionOutOfRange {
            start,
            end,
            len: geometry.len(),
        })
}

pub(crate) fn decode_geometry(
    geometry: &WireGeometry,
    with_elevation: bool,
) -> Result<Vec<Position>, RoutingError> {
    match geometry {
        WireGeometry::Encoded(encoded) => Ok(decode_polyline(encoded, with_elevation)?),
        WireGeometry::Coordinates { coordinates } => coordinates
            .iter()
            .map(|vertex| position_from_vertex(vertex))
            .collect(),
    }
}

fn position_from_vertex(vertex: &[f64]) -> Result<Position, RoutingError> {
    match *vertex {
        [lng, lat] => Ok(Position {
            lng,
            lat,
            elevation: None,
        }),
        [lng, lat, elevation] => Ok(Position {
            lng,
            lat,
            elevation: Some(elevation),
        }),
        _ => Err(RoutingError::Parse {
            message: format!("coordinate must have 2 or 3 values, got {}", vertex.len()),
        }),
    }
}

/// `[min_lng, min_lat, max_lng, max_lat]` as a rectangle.
pub(crate) fn bbox_to_rect([min_lng, min_lat, max_lng, max_lat]: [f64; 4]) -> Rect<f64> {
    Rect::new(
        Coord {
            x: min_lng,
            y: min_lat,
        },
        Coord {
            x: max_lng,
            y: max_lat,
        },
    )
}

/// Build the error for a non-success `status` from the raw response body.
pub(crate) fn service_error(status: u16, body: &str) -> RoutingError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => RoutingError::Service {
            status,
            message: parsed.message,
            hints: parsed
                .hints
                .into_iter()
                .map(|hint| hint.message)
                .filter(|message| !message.is_empty())
                .collect(),
        },
        Err(_) => {
            let trimmed = body.trim();
            RoutingError::Service {
                status,
                message: if trimmed.is_empty() {
                    format!("HTTP status {status}")
                } else {
                    trimmed.to_owned()
                },
                hints: Vec::new(),
            }
        }
    }
}
