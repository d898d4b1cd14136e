//! Error types emitted by the Waymark CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;
use waymark_core::{DispatchError, RoutingError};
use waymark_data::routing::ClientBuildError;

/// Errors emitted by the Waymark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A waypoint could not be read from the `--points` list.
    #[error("invalid waypoint {value:?}: {reason}")]
    InvalidPoint {
        /// The offending entry.
        value: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Fewer than two waypoints were given.
    #[error("a route needs at least two waypoints, got {count}")]
    TooFewPoints {
        /// Number of waypoints parsed.
        count: usize,
    },
    /// The request timeout must be positive.
    #[error("{field} must be greater than zero")]
    InvalidTimeout {
        /// Flag name carrying the timeout.
        field: &'static str,
    },
    /// The requested profile is not offered by the service.
    #[error("profile {key:?} is not offered by the service (available: {available})")]
    UnknownProfile {
        /// Requested profile key.
        key: String,
        /// Comma-separated keys the service offers.
        available: String,
    },
    /// Constructing the routing client failed.
    #[error("failed to build routing client for {base_url:?}: {source}")]
    BuildClient {
        /// Base URL the client was built for.
        base_url: String,
        /// Underlying construction failure.
        #[source]
        source: ClientBuildError,
    },
    /// Starting the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Installing the log subscriber failed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] Box<dyn StdError + Send + Sync>),
    /// The routing service failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),
    /// Publishing on the bus failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// No route outcome arrived in time.
    #[error("no route outcome within {waited_secs}s")]
    NoRouteOutcome {
        /// Seconds spent waiting.
        waited_secs: u64,
    },
    /// Serialising the output failed.
    #[error("failed to serialise output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
