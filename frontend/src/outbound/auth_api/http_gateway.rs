//! Reqwest-backed authentication gateway.
//!
//! This adapter owns transport details only: endpoint resolution, request
//! serialisation, optional timeout, and HTTP error mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::dto::{RegisterUserRequestDto, RejectionDto};
use crate::domain::ports::{AuthenticationGateway, RegistrationGatewayError};
use crate::domain::{RegistrationPayload, TRACE_ID_HEADER, TraceId};

/// Registration path, relative to the configured API base URL.
pub const REGISTER_PATH: &str = "users/register/";

/// Banner used when a rejection body carries no readable message.
const GENERIC_REJECTION: &str = "Registration was rejected. Please review your details.";

/// Errors raised while constructing [`AuthApiHttpGateway`].
#[derive(Debug, thiserror::Error)]
pub enum AuthApiSetupError {
    /// The base URL cannot host the registration path.
    #[error("invalid authentication endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Gateway that registers users with `POST {base}/users/register/`.
pub struct AuthApiHttpGateway {
    client: Client,
    register_url: Url,
}

impl AuthApiHttpGateway {
    /// Build a gateway for `base_url`.
    ///
    /// With `timeout` unset the request runs until the service answers or
    /// the connection fails.
    ///
    /// # Errors
    ///
    /// Returns an error when the registration URL cannot be derived from
    /// `base_url` or the reqwest client cannot be constructed.
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> Result<Self, AuthApiSetupError> {
        let register_url = register_endpoint(base_url)?;
        let builder = Client::builder();
        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        Ok(Self {
            client: builder.build()?,
            register_url,
        })
    }

    /// Fully resolved registration URL.
    #[must_use]
    pub fn register_url(&self) -> &Url {
        &self.register_url
    }
}

#[async_trait]
impl AuthenticationGateway for AuthApiHttpGateway {
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<(), RegistrationGatewayError> {
        let mut request = self
            .client
            .post(self.register_url.clone())
            .header(ACCEPT, "application/json")
            .json(&RegisterUserRequestDto::from(payload));
        if let Some(trace_id) = TraceId::current() {
            request = request.header(TRACE_ID_HEADER, trace_id.to_string());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            // A 2xx status is final even when the body is cut short.
            if let Err(error) = response.bytes().await {
                warn!(status = status.as_u16(), %error, "failed to read success body");
            }
            debug!(status = status.as_u16(), "registration accepted by service");
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

/// Append [`REGISTER_PATH`] to `base`, treating `base` as a directory.
fn register_endpoint(base: &Url) -> Result<Url, url::ParseError> {
    if base.path().ends_with('/') {
        return base.join(REGISTER_PATH);
    }
    let mut directory = base.clone();
    let path = format!("{}/", base.path());
    directory.set_path(&path);
    directory.join(REGISTER_PATH)
}

fn map_transport_error(error: reqwest::Error) -> RegistrationGatewayError {
    if error.is_timeout() {
        RegistrationGatewayError::timeout(error.to_string())
    } else {
        RegistrationGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RegistrationGatewayError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RegistrationGatewayError::timeout(status_message(status, body))
        }
        _ if status.is_client_error() => {
            let rejection = RejectionDto::from_body(body);
            let message = rejection
                .summary()
                .unwrap_or_else(|| GENERIC_REJECTION.to_owned());
            RegistrationGatewayError::rejected(message, rejection.fields)
        }
        _ => RegistrationGatewayError::transport(status_message(status, body)),
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
        format!("{preview}...")
    } else {
        compact
    }
}
