//! Test doubles for the routing seam, shared with downstream crates through
//! the `test-support` feature.

use std::sync::{Mutex, PoisonError};

use crate::routing::{RouteRequest, RouteRequester};

/// `RouteRequester` that records every request instead of fetching.
#[derive(Debug, Default)]
pub struct RecordingRouteRequester {
    requests: Mutex<Vec<RouteRequest>>,
}

impl RecordingRouteRequester {
    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RouteRequester for RecordingRouteRequester {
    fn request_route(&self, request: RouteRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}
