//! Routing service settings shared by every subcommand.

use std::sync::Arc;
use std::time::Duration;

use waymark_data::routing::{HttpRoutingClient, HttpRoutingClientConfig, RoutingService};

use crate::{ARG_TIMEOUT_SECS, CliError};

/// Resolved connection settings for the routing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServiceConfig {
    /// Base URL of the routing service.
    pub(crate) base_url: String,
    /// API key appended to every request, if any.
    pub(crate) api_key: Option<String>,
    /// Per-request timeout.
    pub(crate) timeout: Duration,
}

impl ServiceConfig {
    /// Apply defaults to the optional layered values.
    pub(crate) fn resolve(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, CliError> {
        let defaults = HttpRoutingClientConfig::default();
        let timeout = match timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidTimeout {
                    field: ARG_TIMEOUT_SECS,
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };
        Ok(Self {
            base_url: base_url.unwrap_or(defaults.base_url),
            api_key: api_key.filter(|key| !key.is_empty()),
            timeout,
        })
    }

    fn client_config(&self) -> HttpRoutingClientConfig {
        let config =
            HttpRoutingClientConfig::new(self.base_url.clone()).with_timeout(self.timeout);
        match &self.api_key {
            Some(key) => config.with_api_key(key.clone()),
            None => config,
        }
    }
}

/// Builds the routing service for the current invocation.
pub(crate) trait ServiceBuilder {
    type Service: RoutingService + 'static;

    fn build(&self, config: &ServiceConfig) -> Result<Arc<Self::Service>, CliError>;
}

/// Builds an [`HttpRoutingClient`].
pub(crate) struct HttpServiceBuilder;

impl ServiceBuilder for HttpServiceBuilder {
    type Service = HttpRoutingClient;

    fn build(&self, config: &ServiceConfig) -> Result<Arc<Self::Service>, CliError> {
        HttpRoutingClient::with_config(config.client_config())
            .map(Arc::new)
            .map_err(|source| CliError::BuildClient {
                base_url: config.base_url.clone(),
                source,
            })
    }
}
