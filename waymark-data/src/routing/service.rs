//! The asynchronous seam between orchestration and the routing backend.

use async_trait::async_trait;
use waymark_core::{ApiInfo, RouteRequest, RouteResult, RoutingError};

/// A source of service info and routes.
///
/// [`HttpRoutingClient`](super::HttpRoutingClient) is the production
/// implementation; tests substitute
/// [`StubRoutingService`](super::test_support::StubRoutingService).
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Fetch the profiles and coverage the service offers.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError`] when the request fails or the document is
    /// malformed.
    async fn fetch_info(&self) -> Result<ApiInfo, RoutingError>;

    /// Fetch a route through `request.points`, decoded and sliced per
    /// instruction.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError`] when the request fails, the service rejects
    /// it, or the geometry cannot be decoded.
    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResult, RoutingError>;
}
