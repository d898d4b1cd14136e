//! The closed catalogue of intents and results carried over the bus.

use std::sync::Arc;

use geo::Coord;

use crate::bus::EventBus;
use crate::profile::{ApiInfo, Profile};
use crate::query::QueryState;
use crate::route::RouteResult;
use crate::routing::RoutingError;
use crate::waypoint::Waypoint;

/// The bus every component of a session shares.
pub type Dispatcher = EventBus<Action>;

/// Everything that can happen to a route query.
///
/// UI intents change the query; results arrive from the routing client;
/// [`Action::QueryChanged`] is the store's change notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the waypoint with the same id.
    SetPoint(Waypoint),
    /// Replace the waypoint with the same id and mark it uninitialised.
    InvalidatePoint(Waypoint),
    /// Reset the query text and initialisation flag of every waypoint.
    ClearPoints,
    /// Insert a new waypoint.
    AddPoint {
        /// Insertion index, clamped to the number of waypoints.
        at_index: usize,
        /// Location of the new waypoint.
        coordinate: Coord<f64>,
        /// Whether `coordinate` is a resolved location.
        is_initialized: bool,
    },
    /// Remove the waypoint with the same id.
    RemovePoint(Waypoint),
    /// Select a travel profile.
    SetVehicle(Profile),
    /// Service info arrived.
    InfoReceived(ApiInfo),
    /// A route request succeeded.
    RouteReceived(Arc<RouteResult>),
    /// A route request failed.
    RouteFailed(RoutingError),
    /// The query state changed; carries the new snapshot.
    QueryChanged(Arc<QueryState>),
}

impl Action {
    /// Short name of the variant, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetPoint(_) => "SetPoint",
            Self::InvalidatePoint(_) => "InvalidatePoint",
            Self::ClearPoints => "ClearPoints",
            Self::AddPoint { .. } => "AddPoint",
            Self::RemovePoint(_) => "RemovePoint",
            Self::SetVehicle(_) => "SetVehicle",
            Self::InfoReceived(_) => "InfoReceived",
            Self::RouteReceived(_) => "RouteReceived",
            Self::RouteFailed(_) => "RouteFailed",
            Self::QueryChanged(_) => "QueryChanged",
        }
    }
}
