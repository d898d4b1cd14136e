//! HTTP routing client.
//!
//! [`HttpRoutingClient`] speaks JSON over HTTP to a GraphHopper-compatible
//! routing service: `GET /info` for the available profiles and
//! `POST /route` for routes. Geometry is always requested pre-encoded and
//! decoded locally.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use waymark_core::RouteRequest;
//! use waymark_data::routing::{HttpRoutingClient, HttpRoutingClientConfig, RoutingService};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpRoutingClientConfig::new("https://graphhopper.com/api/1")
//!     .with_api_key("secret");
//! let client = HttpRoutingClient::with_config(config)?;
//!
//! let info = client.fetch_info().await?;
//! let route = client
//!     .fetch_route(&RouteRequest {
//!         points: vec![Coord { x: 13.38, y: 52.52 }, Coord { x: 13.45, y: 52.49 }],
//!         profile: info.default_profile().map(|profile| profile.key.clone()),
//!     })
//!     .await?;
//! println!("{} paths", route.paths.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;
use waymark_core::{ApiInfo, RouteRequest, RouteResult, RoutingError};

use super::convert::{convert_route_response, service_error};
use super::info::parse_info;
use super::service::RoutingService;
use super::wire::{RouteRequestBody, RouteResponse};

/// Error type for [`HttpRoutingClient`] construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Default user agent for routing requests.
pub const DEFAULT_USER_AGENT: &str = "waymark-routing/0.1";

/// Default base URL, a local GraphHopper instance.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8989";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default instruction locale.
const DEFAULT_LOCALE: &str = "en";

/// Configuration for [`HttpRoutingClient`].
#[derive(Debug, Clone)]
pub struct HttpRoutingClientConfig {
    /// Base URL of the routing service (e.g., `"http://localhost:8989"`).
    pub base_url: String,
    /// API key sent as the `key` query parameter, if any.
    pub api_key: Option<String>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Locale for turn instructions.
    pub locale: String,
}

impl Default for HttpRoutingClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            locale: DEFAULT_LOCALE.to_owned(),
        }
    }
}

impl HttpRoutingClientConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the instruction locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

/// Routing client for a GraphHopper-compatible HTTP API.
///
/// Failures are returned to the caller unchanged: nothing is retried and
/// no response is cached.
#[derive(Debug, Clone)]
pub struct HttpRoutingClient {
    client: Client,
    base_url: Url,
    config: HttpRoutingClientConfig,
}

impl HttpRoutingClient {
    /// Create a new client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpRoutingClientConfig::new(base_url))
    }

    /// Create a new client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpRoutingClientConfig) -> Result<Self, ClientBuildError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpRoutingClientConfig {
        &self.config
    }

    /// Build the URL for `endpoint`, appending the API key when configured.
    fn endpoint_url(&self, endpoint: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/{endpoint}", url.path().trim_end_matches('/'));
        url.set_path(&path);
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }

    /// Convert a reqwest error to a `RoutingError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> RoutingError {
        if error.is_timeout() {
            return RoutingError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if error.is_decode() {
            return RoutingError::Parse {
                message: error.to_string(),
            };
        }

        RoutingError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    /// Turn a non-success response into a service error.
    async fn check_status(&self, response: Response, url: &Url) -> Result<Response, RoutingError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        Err(service_error(status.as_u16(), &body))
    }
}

#[async_trait]
impl RoutingService for HttpRoutingClient {
    async fn fetch_info(&self) -> Result<ApiInfo, RoutingError> {
        let url = self.endpoint_url("info");
        debug!("fetching service info from {}", self.base_url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let response = self.check_status(response, &url).await?;
        let document: Map<String, Value> = response
            .json()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        parse_info(document)
    }

    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResult, RoutingError> {
        let url = self.endpoint_url("route");
        let body = RouteRequestBody::new(request, &self.config.locale);
        debug!(
            "requesting {} route over {} points",
            body.vehicle,
            body.points.len()
        );

        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let response = self.check_status(response, &url).await?;
        let payload: RouteResponse = response
            .json()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        convert_route_response(payload, body.elevation)
    }
}
