//! Command-line interface for the Waymark route planner.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod error;
mod info;
mod route;
mod service;

pub use error::CliError;

use info::{InfoArgs, run_info};
use route::{RouteArgs, run_route};

const ARG_BASE_URL: &str = "base-url";
const ARG_API_KEY: &str = "api-key";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_ROUTE_POINTS: &str = "points";
const ARG_ROUTE_PROFILE: &str = "profile";
const ENV_ROUTE_POINTS: &str = "WAYMARK_CMDS_ROUTE_POINTS";

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Run the Waymark CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    match cli.command {
        Command::Info(args) => run_info(args, &runtime),
        Command::Route(args) => run_route(args, &runtime),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Plan routes against a GraphHopper-compatible routing service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the coverage and travel profiles of the routing service.
    Info(InfoArgs),
    /// Plan a route through two or more waypoints.
    Route(RouteArgs),
}

fn init_logging() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(CliError::Logging)
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(CliError::SerializeOutput)?;
    writeln!(writer).map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
