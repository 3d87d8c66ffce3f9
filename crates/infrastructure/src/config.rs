//! Client configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! file (TOML, YAML or JSON, picked by extension), then `PORTAL_*`
//! environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use portal_application::GatewayConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::adapters::TransportOptions;

/// Environment variable prefix, e.g. `PORTAL_API_BASE_URL`.
pub const ENV_PREFIX: &str = "PORTAL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";
const APP_DIR: &str = "coop-portal";
const TOKEN_FILE: &str = "token";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// `api_base_url` is not an absolute http(s) URL.
    #[error("invalid api_base_url '{url}': {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PortalConfig {
    /// Root of the portal API; endpoint paths are resolved against it.
    pub api_base_url: String,
    /// File holding the access token between runs.
    pub token_path: PathBuf,
    /// Bound on one token refresh call, in seconds.
    pub refresh_timeout_secs: u64,
    /// Bound on every other request, in seconds.
    pub request_timeout_secs: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl PortalConfig {
    /// Loads the configuration from defaults, `file` (if given) and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(file, None)
    }

    /// Like [`load`](Self::load), reading `PORTAL_*` variables from `env`
    /// instead of the process environment when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is invalid.
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let defaults = TransportOptions::default();
        let mut builder = config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("token_path", default_token_path().to_string_lossy().into_owned())?
            .set_default("refresh_timeout_secs", 10)?
            .set_default("request_timeout_secs", defaults.timeout.as_secs())?
            .set_default("user_agent", defaults.user_agent)?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(true));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.base_url()?;
        Ok(config)
    }

    /// Parsed and validated `api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the value is an absolute http(s) URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason,
        };
        let url = Url::parse(&self.api_base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        Ok(url)
    }

    /// Gateway settings derived from this configuration.
    #[must_use]
    pub const fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            refresh_timeout: Duration::from_secs(self.refresh_timeout_secs),
        }
    }

    /// Transport settings derived from this configuration.
    #[must_use]
    pub fn transport(&self) -> TransportOptions {
        TransportOptions {
            timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// `<config dir>/coop-portal/token`, or a relative path when the platform
/// has no config directory.
#[must_use]
pub fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .map_or_else(|| PathBuf::from(".").join(APP_DIR), |dir| dir.join(APP_DIR))
        .join(TOKEN_FILE)
}
