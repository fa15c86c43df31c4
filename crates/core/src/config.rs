//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the API client and
//! link builders. Libraries in this workspace never read process environment variables
//! themselves, which keeps behaviour consistent across tests and binaries.

use crate::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use crate::{ConfigError, ConfigResult};
use std::time::Duration;
use url::Url;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_base_url: Url,
    portal_base_url: Url,
    api_token: Option<String>,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// Both URLs must be absolute `http`/`https` URLs. A blank token is treated as no token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - either URL fails to parse or uses another scheme,
    /// - `request_timeout` is zero.
    pub fn new(
        api_base_url: &str,
        portal_base_url: &str,
        api_token: Option<String>,
        request_timeout: Duration,
    ) -> ConfigResult<Self> {
        let api_base_url = parse_http_url("API", api_base_url)?;
        let portal_base_url = parse_http_url("portal", portal_base_url)?;

        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        let api_token = api_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            api_base_url,
            portal_base_url,
            api_token,
            request_timeout,
        })
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn portal_base_url(&self) -> &Url {
        &self.portal_base_url
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn parse_http_url(name: &'static str, value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidInput(format!(
            "{name} URL must use http or https, got {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Parse the HTTP timeout from an optional string value holding whole seconds.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn timeout_from_env_value(value: Option<String>) -> ConfigResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|_| {
            ConfigError::InvalidInput(format!("timeout must be a whole number of seconds: {v}"))
        })?,
        None => DEFAULT_HTTP_TIMEOUT_SECS,
    };

    Ok(Duration::from_secs(secs))
}
