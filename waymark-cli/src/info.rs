//! Info command implementation for the Waymark CLI.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use waymark_core::ApiInfo;
use waymark_data::routing::RoutingService;

use crate::service::{HttpServiceBuilder, ServiceBuilder, ServiceConfig};
use crate::{ARG_API_KEY, ARG_BASE_URL, ARG_TIMEOUT_SECS, CliError, write_json};

/// CLI arguments for the `info` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Query the routing service for its coverage and travel \
                 profiles. Connection settings can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "List the profiles the routing service offers"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct InfoArgs {
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

impl InfoArgs {
    pub(crate) fn into_config(self) -> Result<InfoConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        InfoConfig::try_from(merged)
    }
}

/// Resolved `info` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InfoConfig {
    pub(crate) service: ServiceConfig,
}

impl TryFrom<InfoArgs> for InfoConfig {
    type Error = CliError;

    fn try_from(args: InfoArgs) -> Result<Self, Self::Error> {
        let service = ServiceConfig::resolve(args.base_url, args.api_key, args.timeout_secs)?;
        Ok(Self { service })
    }
}

pub(super) fn run_info(args: InfoArgs, runtime: &Runtime) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_info_with(&config, &HttpServiceBuilder, runtime, &mut stdout)
}

pub(super) fn run_info_with<B: ServiceBuilder>(
    config: &InfoConfig,
    builder: &B,
    runtime: &Runtime,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let info = fetch_info(config, builder, runtime)?;
    write_json(writer, &info)
}

fn fetch_info<B: ServiceBuilder>(
    config: &InfoConfig,
    builder: &B,
    runtime: &Runtime,
) -> Result<ApiInfo, CliError> {
    let service = builder.build(&config.service)?;
    Ok(runtime.block_on(service.fetch_info())?)
}
