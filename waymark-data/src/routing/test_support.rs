//! Test utilities for routing clients.
//!
//! [`StubRoutingService`] is a deterministic [`RoutingService`] that answers
//! from pre-configured outcomes without making HTTP requests. The sample
//! payloads mirror real service responses.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::json;
use waymark_core::{ApiInfo, RouteRequest, RouteResult, RoutingError};

use super::service::RoutingService;

/// A `route` response with one path over the reference polyline.
#[must_use]
pub fn sample_route_json() -> String {
    json!({
        "info": {
            "copyrights": ["GraphHopper", "OpenStreetMap contributors"],
            "took": 7
        },
        "paths": [{
            "distance": 789_456.5,
            "time": 702_000,
            "ascend": 0.0,
            "descend": 0.0,
            "points_encoded": true,
            "bbox": [-126.453, 38.5, -120.2, 43.252],
            "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@",
            "snapped_waypoints": "_p~iF~ps|U_c_\\fhde@",
            "points_order": [0, 1],
            "details": {},
            "instructions": [
                {
                    "distance": 250_000.0,
                    "time": 200_000,
                    "interval": [0, 1],
                    "sign": 0,
                    "text": "Continue onto Main Street",
                    "street_name": "Main Street"
                },
                {
                    "distance": 0.0,
                    "time": 0,
                    "interval": [2, 2],
                    "sign": 4,
                    "text": "Arrive at destination"
                }
            ]
        }]
    })
    .to_string()
}

/// An `info` response advertising `foot` and `car`, plus fields the client
/// does not model.
#[must_use]
pub fn sample_info_json() -> String {
    json!({
        "bbox": [13.0, 52.3, 13.8, 52.7],
        "foot": {"version": "5", "import_date": "2024-05-01T00:00:00Z"},
        "car": {"version": "6", "import_date": "2024-05-02T00:00:00Z"},
        "features": {
            "foot": {"elevation": true},
            "car": {"elevation": false}
        },
        "version": "9.1",
        "import_date": "2024-05-02T00:00:00Z",
        "build_date": "2024-04-30T10:00:00Z"
    })
    .to_string()
}

/// `RoutingService` returning pre-configured outcomes.
///
/// Every route request is recorded so tests can assert what was asked.
#[derive(Debug)]
pub struct StubRoutingService {
    info: Result<ApiInfo, RoutingError>,
    route: Result<RouteResult, RoutingError>,
    requests: Mutex<Vec<RouteRequest>>,
}

impl StubRoutingService {
    /// A service answering with `info` and `route`.
    #[must_use]
    pub const fn new(info: ApiInfo, route: RouteResult) -> Self {
        Self {
            info: Ok(info),
            route: Ok(route),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A service failing every request with `error`.
    #[must_use]
    pub fn with_error(error: RoutingError) -> Self {
        Self {
            info: Err(error.clone()),
            route: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Route requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RoutingService for StubRoutingService {
    async fn fetch_info(&self) -> Result<ApiInfo, RoutingError> {
        self.info.clone()
    }

    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResult, RoutingError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.route.clone()
    }
}
