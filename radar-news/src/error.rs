//! Error types for the news module

use thiserror::Error;

/// Errors that can occur in the news module
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body from API
        message: String,
    },

    /// Failed to parse API response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Search parameters outside the accepted ranges
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client credentials are not configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl From<radar_core::RadarError> for NewsError {
    fn from(err: radar_core::RadarError) -> Self {
        NewsError::InvalidRequest(err.to_string())
    }
}
