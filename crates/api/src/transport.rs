// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authenticated HTTP transport with a one-time TLS trust fallback.
//!
//! The TLS decision is made once, when the session first checks the API,
//! and is kept for every later request. Responses are classified rather than
//! turned into errors: a non-success status is an ordinary [`Outcome`]
//! that carries the raw body.

use std::error::Error;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// Statuses treated as success.
const SUCCESS_STATUSES: [StatusCode; 3] =
    [StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT];

/// Query parameters that are never written to the log.
const SECRET_PARAMS: &[&str] = &["key", "access_token"];

/// Query string parameters.
pub type QueryParams = serde_json::Map<String, Value>;

/// What a request carries besides headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Nothing.
    Empty,
    /// Query string parameters.
    Query(QueryParams),
    /// A JSON body.
    Json(Value),
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "{{}}"),
            Self::Query(params) => {
                let mut shown: QueryParams = params.clone();
                for secret in SECRET_PARAMS {
                    if let Some(value) = shown.get_mut(*secret) {
                        *value = Value::from("[REDACTED]");
                    }
                }
                write!(f, "{}", Value::Object(shown))
            }
            Self::Json(body) => write!(f, "{body}"),
        }
    }
}

/// A classified response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Success with a JSON body.
    Json(Value),
    /// Success with a body that is not JSON (possibly empty).
    Text(String),
    /// Any status outside 200, 201 and 204.
    Failure {
        /// The HTTP status.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },
}

impl Outcome {
    /// Classifies a status and body.
    #[must_use]
    pub fn classify(status: StatusCode, body: String) -> Self {
        if !SUCCESS_STATUSES.contains(&status) {
            return Self::Failure { status, body };
        }
        serde_json::from_str::<Value>(&body).map_or(Self::Text(body), Self::Json)
    }

    /// Returns true for the two success variants.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failure { .. })
    }
}

/// An authenticated HTTP session.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    verify_tls: bool,
}

impl Transport {
    /// Opens a session by requesting `check_url`.
    ///
    /// The check runs with certificate verification on. If the handshake
    /// fails because the server's certificate is not trusted, it is retried
    /// once without verification and the session keeps that setting.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token cannot be used as a header value
    /// - The check cannot reach the server
    /// - The check returns anything other than 200
    pub async fn connect(config: &ClientConfig, check_url: &str) -> ApiResult<Self> {
        info!("Testing API connection...");

        let secure: Client = build_client(config, true)?;
        let (client, verify_tls, response) = match secure.get(check_url).send().await {
            Ok(response) => (secure, true, response),
            Err(err) if is_tls_trust_failure(&err) => {
                warn!("SSL error. Trying again without SSL verification...");
                let insecure: Client = build_client(config, false)?;
                let response = insecure.get(check_url).send().await?;
                (insecure, false, response)
            }
            Err(err) => return Err(err.into()),
        };

        let status: StatusCode = response.status();
        if status != StatusCode::OK {
            let body: String = response.text().await.unwrap_or_default();
            error!("Unable to connect to API. Please check your URL and API token.");
            return Err(ApiError::ConnectionFailed { status, body });
        }

        info!("API connection successful");
        Ok(Self { client, verify_tls })
    }

    /// Whether certificates are verified for this session.
    #[must_use]
    pub const fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Sends one request and classifies the response.
    ///
    /// Non-success responses are logged together with the payload that was
    /// sent and returned as [`Outcome::Failure`].
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    pub async fn request(&self, method: Method, url: &str, payload: &Payload) -> ApiResult<Outcome> {
        let mut request = self.client.request(method, url);
        match payload {
            Payload::Empty => {}
            Payload::Query(params) => request = request.query(&query_pairs(params)),
            Payload::Json(body) => request = request.json(body),
        }

        let response = request.send().await?;
        let status: StatusCode = response.status();
        let body: String = response.text().await?;

        let outcome: Outcome = Outcome::classify(status, body);
        if let Outcome::Failure { status, body } = &outcome {
            error!("API call to {url} failed with status code {status}");
            error!("{body}");
            error!("Payload data: {payload}");
        }
        Ok(outcome)
    }
}

/// Returns true if a request failed because the server's certificate was
/// not accepted.
///
/// Only connect errors qualify, and only when the TLS layer rejected the
/// peer certificate. Refused connections, DNS failures and resets never do,
/// whatever the URL or message text says.
#[must_use]
pub fn is_tls_trust_failure(err: &reqwest::Error) -> bool {
    err.is_connect() && has_certificate_rejection(err.source())
}

/// Walks a source chain looking for a rustls certificate rejection.
///
/// The TLS stream reports handshake failures as an `io::Error` wrapping the
/// rustls error, and `io::Error` hides that payload from `source()`, so it
/// is unwrapped explicitly.
#[must_use]
pub fn has_certificate_rejection(mut current: Option<&(dyn Error + 'static)>) -> bool {
    while let Some(cause) = current {
        let tls_error: Option<&rustls::Error> = cause.downcast_ref::<rustls::Error>().or_else(|| {
            cause
                .downcast_ref::<std::io::Error>()
                .and_then(std::io::Error::get_ref)
                .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        });
        if matches!(tls_error, Some(rustls::Error::InvalidCertificate(_))) {
            return true;
        }
        current = cause.source();
    }
    false
}

fn build_client(config: &ClientConfig, verify_tls: bool) -> ApiResult<Client> {
    let mut auth: HeaderValue = HeaderValue::from_str(&format!("Bearer {}", config.token))?;
    auth.set_sensitive(true);

    let mut headers: HeaderMap = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);

    Ok(Client::builder()
        .default_headers(headers)
        .user_agent(config.user_agent.as_str())
        .danger_accept_invalid_certs(!verify_tls)
        .build()?)
}

fn query_pairs(params: &QueryParams) -> Vec<(&str, String)> {
    params
        .iter()
        .map(|(key, value)| {
            let value: String = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), value)
        })
        .collect()
}
