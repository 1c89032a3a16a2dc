// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias using `ApiError`.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while talking to the platform or reading local input.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required setting was not provided.
    #[error("Missing required argument. {0}")]
    MissingConfiguration(&'static str),

    /// The base URL does not have a shape this client understands.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as given.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The platform variant cannot be synchronized by this tool.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The API token cannot be sent as a header.
    #[error("Invalid API token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    /// The connectivity check did not return 200.
    #[error(
        "Unable to connect to API (status {status}). Please check your URL and API token. {body}"
    )]
    ConnectionFailed {
        /// The check's HTTP status.
        status: StatusCode,
        /// The check's response body.
        body: String,
    },

    /// The platform answered a request with a non-success status.
    #[error("API call to {url} failed with status {status}: {body}")]
    Rejected {
        /// The endpoint URL.
        url: String,
        /// The HTTP status.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },

    /// A success response whose body is not the expected record.
    #[error("Unexpected response from {url}: {body}")]
    UnexpectedBody {
        /// The endpoint URL.
        url: String,
        /// The raw response body.
        body: String,
    },

    /// A paginated fetch stopped before the last page; fetched pages were discarded.
    #[error("Pagination stopped after {pages_fetched} page(s): {failure}")]
    IncompletePagination {
        /// Pages fetched before the failure.
        pages_fetched: u64,
        /// The raw failure text.
        failure: String,
    },

    /// The membership CSV is malformed.
    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
