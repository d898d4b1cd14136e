use geo::Coord;

/// Everything needed to ask the routing service for a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Waypoint coordinates in visiting order, `x = longitude`.
    pub points: Vec<Coord<f64>>,
    /// Profile key; `None` lets the client fall back to its default.
    pub profile: Option<String>,
}

/// Receives route requests emitted by the query store.
///
/// Implementations must not block: the store calls this from inside a bus
/// dispatch. Outcomes are expected to come back as
/// [`Action::RouteReceived`](crate::Action::RouteReceived) or
/// [`Action::RouteFailed`](crate::Action::RouteFailed).
pub trait RouteRequester: Send + Sync {
    /// Start fetching a route for `request`.
    fn request_route(&self, request: RouteRequest);
}
