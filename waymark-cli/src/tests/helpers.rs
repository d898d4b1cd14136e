//! Test helpers wiring the CLI to a stub routing service.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use waymark_core::{
    ApiInfo, Instruction, Profile, ProfileFeatures, RouteInfo, RoutePath, RouteResult,
    decode_polyline,
};
use waymark_data::routing::test_support::StubRoutingService;

use crate::service::{ServiceBuilder, ServiceConfig};
use crate::CliError;

/// Hands out a shared stub instead of an HTTP client.
pub(super) struct StubServiceBuilder {
    service: Arc<StubRoutingService>,
}

impl StubServiceBuilder {
    pub(super) fn new(service: StubRoutingService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub(super) fn service(&self) -> &StubRoutingService {
        &self.service
    }
}

impl ServiceBuilder for StubServiceBuilder {
    type Service = StubRoutingService;

    fn build(&self, _config: &ServiceConfig) -> Result<Arc<Self::Service>, CliError> {
        Ok(Arc::clone(&self.service))
    }
}

pub(super) fn runtime() -> Runtime {
    Runtime::new().expect("runtime builds")
}

/// Service info advertising `foot` before `car`.
pub(super) fn sample_info() -> ApiInfo {
    let foot = Profile {
        features: ProfileFeatures { elevation: true },
        ..Profile::named("foot")
    };
    ApiInfo {
        vehicles: vec![foot, Profile::named("car")],
        version: "9.1".to_owned(),
        ..ApiInfo::default()
    }
}

/// A single-path route over the reference polyline.
pub(super) fn sample_route() -> RouteResult {
    let geometry = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", false).expect("valid polyline");
    RouteResult {
        info: RouteInfo {
            copyright: vec!["GraphHopper".to_owned()],
            took_ms: 4,
        },
        paths: vec![RoutePath {
            distance: 789_456.5,
            time: Duration::from_secs(702),
            ascend: 0.0,
            descend: 0.0,
            bbox: None,
            instructions: vec![Instruction {
                distance: 789_456.5,
                time: Duration::from_secs(702),
                interval: (0, 2),
                sign: 0,
                text: "Continue".to_owned(),
                street_name: "Main Street".to_owned(),
                geometry: geometry.clone(),
            }],
            points_order: vec![0, 1],
            snapped_waypoints: Vec::new(),
            geometry,
        }],
    }
}

pub(super) fn stub_builder() -> StubServiceBuilder {
    StubServiceBuilder::new(StubRoutingService::new(sample_info(), sample_route()))
}
