//! Error types for the radar

use thiserror::Error;

/// Radar-wide error type
#[derive(Error, Debug)]
pub enum RadarError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RadarError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        RadarError::InvalidParameter(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        RadarError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        RadarError::Internal(msg.into())
    }
}

/// Result type alias for radar operations
pub type RadarResult<T> = Result<T, RadarError>;
