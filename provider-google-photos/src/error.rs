//! Error types for Google Photos provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Google Photos provider errors
#[derive(Error, Debug)]
pub enum GooglePhotosError {
    /// Token missing, expired, or lacking the required scope (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// API request returned an error
    #[error("Google Photos API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Transport failed before a response arrived
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Cancellation, deadline, or a bridge failure unrelated to the network
    #[error(transparent)]
    Bridge(BridgeError),
}

/// Result type for Google Photos operations
pub type Result<T> = std::result::Result<T, GooglePhotosError>;

impl From<BridgeError> for GooglePhotosError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::OperationFailed(msg) => GooglePhotosError::NetworkError(msg),
            other => GooglePhotosError::Bridge(other),
        }
    }
}

impl From<GooglePhotosError> for BridgeError {
    fn from(error: GooglePhotosError) -> Self {
        match error {
            GooglePhotosError::Bridge(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}
