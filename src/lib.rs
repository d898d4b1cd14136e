//! Facade crate for the Waymark route planner.
//!
//! This crate re-exports the core domain types and exposes the HTTP routing
//! client behind the `http` feature.

#![forbid(unsafe_code)]

pub use waymark_core::{
    Action, ApiInfo, DispatchError, Dispatcher, EventBus, Instruction, MAX_DISPATCH_DEPTH,
    PREFERRED_PROFILE, PolylineError, Position, Profile, ProfileFeatures, QueryState, QueryStore,
    Role, RouteInfo, RoutePath, RouteRequest, RouteRequester, RouteResult, RoutingError,
    SubscriptionToken, Transition, Waypoint, coordinate_text, decode_polyline, reduce,
};

#[cfg(feature = "http")]
pub use waymark_data::routing::{
    BusRouter, ClientBuildError, HttpRoutingClient, HttpRoutingClientConfig, RoutingService,
};
