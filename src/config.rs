//! Environment configuration.
//!
//! All configuration is loaded from environment variables at startup; a
//! `.env` file is honored for local development.

use std::net::SocketAddr;

/// Default Product Hunt GraphQL v2 endpoint.
pub const DEFAULT_API_URL: &str = "https://api.producthunt.com/v2/api/graphql";

/// Default bind address for the HTTP service.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is absent
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    /// Environment variable present but unusable
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Configuration loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Developer token for the Product Hunt API. Optional at load time so
    /// that `serve` can start without one; validated when an export begins.
    pub api_token: Option<String>,
    /// GraphQL endpoint URL. Overridable so tests can target a mock server.
    pub api_url: String,
    /// Bind address for the HTTP service.
    pub bind_address: SocketAddr,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file when present, except under `cfg(test)` so tests
    /// stay hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_token = std::env::var("PRODUCT_HUNT_API_TOKEN").ok();

        let api_url = std::env::var("PRODUCT_HUNT_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let bind_str = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS", e.to_string()))?;

        Ok(Self {
            api_token,
            api_url,
            bind_address,
        })
    }

    /// The API token, or a configuration error if it was never provided.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.api_token
            .as_deref()
            .ok_or(ConfigError::MissingVar("PRODUCT_HUNT_API_TOKEN"))
    }
}
