//! Routing service access.
//!
//! [`HttpRoutingClient`] talks to a GraphHopper-compatible HTTP API and
//! implements [`RoutingService`]. [`BusRouter`] connects any service to the
//! bus: it is the [`RouteRequester`](waymark_core::RouteRequester) a
//! [`QueryStore`](waymark_core::QueryStore) hands requests to, and it
//! republishes outcomes as actions.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use waymark_core::{Dispatcher, QueryStore};
//! use waymark_data::routing::{BusRouter, HttpRoutingClient};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let bus = Arc::new(Dispatcher::new());
//! let client = Arc::new(HttpRoutingClient::new("http://localhost:8989")?);
//! let router = Arc::new(BusRouter::new(client, &bus, tokio::runtime::Handle::current()));
//! let (store, _token) = QueryStore::new(router.clone()).attach(&bus);
//!
//! router.load_info().await?;
//! println!("profile: {}", store.state().selected_profile.key);
//! # Ok(())
//! # }
//! ```

mod client;
mod convert;
mod dispatch;
mod info;
mod service;
pub mod wire;

#[doc(hidden)]
pub mod test_support;

pub use client::{
    ClientBuildError, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpRoutingClient,
    HttpRoutingClientConfig,
};
pub use dispatch::BusRouter;
pub use service::RoutingService;
