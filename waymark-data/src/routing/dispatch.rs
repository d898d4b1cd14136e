//! Bridge between the synchronous bus and the asynchronous routing service.

use std::fmt;
use std::sync::{Arc, Weak};

use log::{debug, warn};
use tokio::runtime::Handle;
use waymark_core::{Action, ApiInfo, Dispatcher, RouteRequest, RouteRequester, RoutingError};

use super::service::RoutingService;

/// Runs routing flows on a tokio runtime and republishes their outcomes.
///
/// Installed as the [`RouteRequester`] of a
/// [`QueryStore`](waymark_core::QueryStore): each request is spawned as an
/// independent task, so the store never blocks inside a dispatch. Requests
/// are neither cancelled nor de-duplicated; when several overlap, every one
/// publishes its outcome and the last to resolve is the latest on the bus.
pub struct BusRouter<S> {
    service: Arc<S>,
    bus: Weak<Dispatcher>,
    runtime: Handle,
}

impl<S> BusRouter<S>
where
    S: RoutingService + 'static,
{
    /// Create a router publishing to `bus` and spawning on `runtime`.
    ///
    /// Only a weak reference to the bus is kept, so a router owned by a
    /// store subscribed to the same bus does not keep the bus alive.
    #[must_use]
    pub fn new(service: Arc<S>, bus: &Arc<Dispatcher>, runtime: Handle) -> Self {
        Self {
            service,
            bus: Arc::downgrade(bus),
            runtime,
        }
    }

    /// Fetch service info and publish it as [`Action::InfoReceived`].
    ///
    /// # Errors
    ///
    /// Returns the fetch error; nothing is published in that case.
    pub async fn load_info(&self) -> Result<ApiInfo, RoutingError> {
        let info = self.service.fetch_info().await?;
        debug!("service offers {} profiles", info.vehicles.len());
        publish(&self.bus, Action::InfoReceived(info.clone()));
        Ok(info)
    }
}

impl<S> RouteRequester for BusRouter<S>
where
    S: RoutingService + 'static,
{
    fn request_route(&self, request: RouteRequest) {
        let service = Arc::clone(&self.service);
        let bus = self.bus.clone();
        self.runtime.spawn(async move {
            let action = match service.fetch_route(&request).await {
                Ok(result) => {
                    debug!("route received with {} paths", result.paths.len());
                    Action::RouteReceived(Arc::new(result))
                }
                Err(err) => {
                    warn!("route request failed: {err}");
                    Action::RouteFailed(err)
                }
            };
            publish(&bus, action);
        });
    }
}

impl<S> fmt::Debug for BusRouter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusRouter")
            .field("bus_alive", &(self.bus.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

fn publish(bus: &Weak<Dispatcher>, action: Action) {
    let Some(bus) = bus.upgrade() else {
        debug!("bus dropped; discarding {}", action.name());
        return;
    };
    if let Err(err) = bus.publish(action) {
        warn!("failed to publish routing outcome: {err}");
    }
}
