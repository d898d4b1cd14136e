//! Route command implementation for the Waymark CLI.
//!
//! The command drives the same pipeline an interactive client would: the
//! waypoints are fed to a [`QueryStore`] over the bus one action at a time,
//! the store decides when the query is complete, and the [`BusRouter`]
//! publishes the outcome back on the bus.

use std::io::Write;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use geo::Coord;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use waymark_core::{Action, ApiInfo, Dispatcher, Profile, QueryStore, RouteResult, RoutingError};
use waymark_data::routing::BusRouter;

use crate::service::{HttpServiceBuilder, ServiceBuilder, ServiceConfig};
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_ROUTE_POINTS, ARG_ROUTE_PROFILE, ARG_TIMEOUT_SECS, CliError,
    ENV_ROUTE_POINTS, write_json,
};

/// Extra time granted to a route outcome beyond the request timeout.
const OUTCOME_GRACE: Duration = Duration::from_secs(5);

const POINT_SEPARATOR: char = ';';
const COORDINATE_SEPARATOR: char = ',';

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a route through two or more waypoints. Waypoints are \
                 given as `lng,lat` pairs separated by semicolons; the first \
                 is the start and the last the destination. The decoded \
                 route is printed as JSON.",
    about = "Plan a route through waypoints"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct RouteArgs {
    /// Waypoints as `lng,lat` pairs separated by `;`.
    #[arg(long = ARG_ROUTE_POINTS, value_name = "lng,lat;lng,lat")]
    #[serde(default)]
    pub(crate) points: Option<String>,
    /// Travel profile; defaults to the service's preferred profile.
    #[arg(long = ARG_ROUTE_PROFILE, value_name = "key")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Base URL of the routing service (e.g. "http://localhost:8989").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// API key sent with every request.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    /// Waypoints in visiting order, `x = longitude`.
    pub(crate) points: Vec<Coord<f64>>,
    /// Requested profile key, if any.
    pub(crate) profile: Option<String>,
    pub(crate) service: ServiceConfig,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let raw = args.points.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE_POINTS,
            env: ENV_ROUTE_POINTS,
        })?;
        let points = parse_points(&raw)?;
        let service = ServiceConfig::resolve(args.base_url, args.api_key, args.timeout_secs)?;
        Ok(Self {
            points,
            profile: args.profile.filter(|key| !key.is_empty()),
            service,
        })
    }
}

/// Parse `"lng,lat;lng,lat;..."` into coordinates.
///
/// Blank entries, such as a trailing separator, are ignored.
pub(crate) fn parse_points(raw: &str) -> Result<Vec<Coord<f64>>, CliError> {
    let points = raw
        .split(POINT_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()?;
    if points.len() < 2 {
        return Err(CliError::TooFewPoints {
            count: points.len(),
        });
    }
    Ok(points)
}

fn parse_point(entry: &str) -> Result<Coord<f64>, CliError> {
    let invalid = |reason: &str| CliError::InvalidPoint {
        value: entry.to_owned(),
        reason: reason.to_owned(),
    };
    let Some((lng, lat)) = entry.split_once(COORDINATE_SEPARATOR) else {
        return Err(invalid("expected `lng,lat`"));
    };
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| invalid("longitude is not a number"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| invalid("latitude is not a number"))?;
    if !(-180.0..=180.0).contains(&lng) {
        return Err(invalid("longitude must lie within [-180, 180]"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(invalid("latitude must lie within [-90, 90]"));
    }
    Ok(Coord { x: lng, y: lat })
}

pub(super) fn run_route(args: RouteArgs, runtime: &Runtime) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_route_with(&config, &HttpServiceBuilder, runtime, &mut stdout)
}

pub(super) fn run_route_with<B: ServiceBuilder>(
    config: &RouteConfig,
    builder: &B,
    runtime: &Runtime,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let result = plan_route(config, builder, runtime)?;
    write_json(writer, &*result)
}

/// Route `config.points` through the bus and wait for the outcome.
pub(crate) fn plan_route<B: ServiceBuilder>(
    config: &RouteConfig,
    builder: &B,
    runtime: &Runtime,
) -> Result<Arc<RouteResult>, CliError> {
    let service = builder.build(&config.service)?;
    let bus = Arc::new(Dispatcher::new());
    let router = Arc::new(BusRouter::new(service, &bus, runtime.handle().clone()));
    let (store, _token) = QueryStore::new(router.clone()).attach(&bus);

    let (tx, outcomes) = mpsc::channel();
    bus.subscribe(move |action| {
        let outcome = match action {
            Action::RouteReceived(result) => Ok(Arc::clone(result)),
            Action::RouteFailed(err) => Err(err.clone()),
            _ => return,
        };
        let _ = tx.send(outcome);
    });

    let service_info = runtime.block_on(router.load_info())?;
    if let Some(key) = &config.profile {
        bus.publish(Action::SetVehicle(select_profile(&service_info, key)?))?;
    }
    info!(
        "routing {} waypoints with profile {:?}",
        config.points.len(),
        store.state().selected_profile.key
    );
    feed_waypoints(&bus, &store, &config.points)?;

    let waited = config.service.timeout + OUTCOME_GRACE;
    let outcome: Result<Arc<RouteResult>, RoutingError> = outcomes
        .recv_timeout(waited)
        .map_err(|_| CliError::NoRouteOutcome {
            waited_secs: waited.as_secs(),
        })?;
    Ok(outcome?)
}

fn select_profile(info: &ApiInfo, key: &str) -> Result<Profile, CliError> {
    info.profile(key)
        .cloned()
        .ok_or_else(|| CliError::UnknownProfile {
            key: key.to_owned(),
            available: info
                .vehicles
                .iter()
                .map(|profile| profile.key.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Publish the actions that turn a fresh query into `points`.
///
/// The destination is set last so the query completes exactly once.
fn feed_waypoints(
    bus: &Dispatcher,
    store: &QueryStore,
    points: &[Coord<f64>],
) -> Result<(), CliError> {
    let [first, middle @ .., last] = points else {
        return Err(CliError::TooFewPoints {
            count: points.len(),
        });
    };

    let state = store.state();
    let Some(start) = state.waypoints.first() else {
        return Err(CliError::TooFewPoints { count: 0 });
    };
    bus.publish(Action::SetPoint(start.clone().located_at(*first)))?;

    for (offset, coordinate) in middle.iter().enumerate() {
        bus.publish(Action::AddPoint {
            at_index: offset + 1,
            coordinate: *coordinate,
            is_initialized: true,
        })?;
    }

    let state = store.state();
    let Some(end) = state.waypoints.last() else {
        return Err(CliError::TooFewPoints { count: 0 });
    };
    debug!("setting destination on waypoint {}", end.id);
    bus.publish(Action::SetPoint(end.clone().located_at(*last)))?;
    Ok(())
}
