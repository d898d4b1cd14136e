//! Route requests and the seam through which they leave the core.
//!
//! The query store never talks to the network. When a transition warrants a
//! route it hands a [`RouteRequest`] to a [`RouteRequester`]; the outcome
//! comes back later as an [`Action`](crate::Action) on the bus.

mod error;
mod request;

pub use error::RoutingError;
pub use request::{RouteRequest, RouteRequester};
