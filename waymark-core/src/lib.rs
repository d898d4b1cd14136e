//! Core domain types for the Waymark route planner.
//!
//! Responsibilities:
//! - Model waypoints, travel profiles and decoded route results.
//! - Decode the compact polyline geometry returned by the routing service.
//! - Carry user intents as [`Action`] values over a synchronous [`EventBus`].
//! - Reduce actions into immutable [`QueryState`] snapshots and decide when a
//!   route request is warranted.
//!
//! Boundaries:
//! - No network code lives here; route requests leave through the
//!   [`RouteRequester`] seam and results come back as actions.
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude`.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod action;
pub mod bus;
pub mod polyline;
pub mod profile;
pub mod query;
pub mod route;
pub mod routing;
pub mod waypoint;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use action::{Action, Dispatcher};
pub use bus::{DispatchError, EventBus, MAX_DISPATCH_DEPTH, SubscriptionToken};
pub use polyline::{PolylineError, decode_polyline};
pub use profile::{ApiInfo, PREFERRED_PROFILE, Profile, ProfileFeatures};
pub use query::{QueryState, QueryStore, Transition, reduce};
pub use route::{Instruction, Position, RouteInfo, RoutePath, RouteResult};
pub use routing::{RouteRequest, RouteRequester, RoutingError};
pub use waypoint::{Role, Waypoint, coordinate_text};
