//! Error types for Travis API operations.

use thiserror::Error;

/// Errors that can occur during Travis API operations.
#[derive(Debug, Error)]
pub enum TravisError {
    /// Configuration is missing or incomplete.
    #[error("Travis configuration required: {0}")]
    ConfigMissing(String),

    /// API request failed with an unexpected status.
    #[error("Travis API error {status}: {body}")]
    Api { status: u16, body: String },

    /// A list response body did not contain the requested resource array.
    #[error("Travis API response has no '{resource}' array")]
    UnexpectedBody { resource: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A configured value cannot be used as an HTTP header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Result type alias for Travis API operations.
pub type Result<T> = core::result::Result<T, TravisError>;
