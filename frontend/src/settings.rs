//! Frontend configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{Route, UnknownRouteError};

const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8000/api/";
const DEFAULT_POST_REGISTRATION_ROUTE: &str = "/loginTwo";

/// Errors raised when a configured value cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The authentication base URL does not parse.
    #[error("invalid authentication base URL {value:?}: {source}")]
    BaseUrl {
        /// Configured value.
        value: String,
        /// Parser failure.
        source: url::ParseError,
    },
    /// The request timeout is zero.
    #[error("request timeout must be greater than zero seconds")]
    ZeroTimeout,
    /// The post-registration route is not in the routing table.
    #[error("invalid post-registration route: {0}")]
    Route(#[from] UnknownRouteError),
}

/// Configuration values controlling how registrations are submitted.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AFFITNITY")]
pub struct FrontendSettings {
    /// Base URL of the authentication API.
    #[ortho_config(default = String::from(DEFAULT_AUTH_BASE_URL))]
    pub auth_base_url: String,
    /// Optional deadline for one registration request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Path shown after a successful registration.
    #[ortho_config(default = String::from(DEFAULT_POST_REGISTRATION_ROUTE))]
    pub post_registration_route: String,
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_owned(),
            request_timeout_secs: None,
            post_registration_route: DEFAULT_POST_REGISTRATION_ROUTE.to_owned(),
        }
    }
}

impl FrontendSettings {
    /// Parse the authentication base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BaseUrl`] when the value does not parse.
    pub fn auth_base_url(&self) -> Result<Url, SettingsError> {
        Url::parse(&self.auth_base_url).map_err(|source| SettingsError::BaseUrl {
            value: self.auth_base_url.clone(),
            source,
        })
    }

    /// Return the request deadline, or `None` when requests may run
    /// indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Option<Duration>, SettingsError> {
        match self.request_timeout_secs {
            Some(0) => Err(SettingsError::ZeroTimeout),
            Some(secs) => Ok(Some(Duration::from_secs(secs))),
            None => Ok(None),
        }
    }

    /// Resolve the post-registration path against the routing table.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Route`] when the path is not registered.
    pub fn post_registration_route(&self) -> Result<Route, SettingsError> {
        Ok(self.post_registration_route.parse()?)
    }
}
