//! TasteDive API error types

use thiserror::Error;

/// TasteDive API client errors
#[derive(Error, Debug)]
pub enum TasteDiveError {
    /// API key is missing
    #[error("API key is required for TasteDive API access")]
    MissingApiKey,

    /// Invalid input provided to API method
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse TasteDive response: {0}")]
    Parse(#[from] serde_json::Error),

    /// TasteDive returned a non-success status or an error payload
    #[error("TasteDive API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Request timeout
    #[error("Request to TasteDive timed out")]
    Timeout,
}

/// Result type for TasteDive operations
pub type TasteDiveResult<T> = Result<T, TasteDiveError>;
