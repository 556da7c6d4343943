//! Error handling for the Tunebridge API
//!
//! One error type for every handler, mapped to an HTTP status via Axum's
//! `IntoResponse`. Upstream failures carry a public context message and a
//! private detail: only the context reaches the client, the detail is logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tunebridge_spotify_client::SpotifyError;
use tunebridge_tastedive_client::TasteDiveError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// Missing, tampered, or expired session on a guarded route
    #[error("authentication required")]
    Unauthorized,

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{0}")]
    NotFound(String),

    /// Resource already exists
    #[error("{0}")]
    Conflict(String),

    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("{0}")]
    ValidationError(String),

    // ========== External Service Errors ==========
    /// Spotify or TasteDive call failed
    #[error("{context}")]
    Upstream {
        /// Public message returned to the client
        context: &'static str,
        /// Underlying failure, logged only
        detail: String,
    },

    // ========== Session Errors ==========
    /// Session store operation failed
    #[error("{0}")]
    Session(&'static str),

    // ========== Database Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    // ========== Configuration Errors ==========
    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    // ========== Internal Errors ==========
    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. }
            | Self::Session(_)
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Session(_) => "SESSION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to the client
    ///
    /// Server-side failures never leak their cause.
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) | Self::Configuration(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Wrap a failed upstream call under a public context message
    pub fn upstream(context: &'static str, detail: impl ToString) -> Self {
        Self::Upstream {
            context,
            detail: detail.to_string(),
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            match self {
                Self::Upstream { context, detail } => tracing::error!(
                    context = %context,
                    detail = %detail,
                    code = self.error_code(),
                    status = status.as_u16(),
                    "Upstream call failed"
                ),
                _ => tracing::error!(
                    error = %self,
                    code = self.error_code(),
                    status = status.as_u16(),
                    "Server error occurred"
                ),
            }
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authorization error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.public_message(),
            details: None,
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}

/// Extension for tagging client-crate failures with the public context of
/// the operation that issued them
pub trait UpstreamContext<T> {
    /// Map the error into [`ApiError::Upstream`] unless it is a caller mistake
    fn upstream_context(self, context: &'static str) -> ApiResult<T>;
}

impl<T> UpstreamContext<T> for Result<T, SpotifyError> {
    fn upstream_context(self, context: &'static str) -> ApiResult<T> {
        self.map_err(|e| match e {
            SpotifyError::InvalidInput(message) => ApiError::ValidationError(message),
            SpotifyError::MissingCredentials => {
                ApiError::Configuration("Spotify credentials not configured".into())
            }
            other => ApiError::upstream(context, other),
        })
    }
}

impl<T> UpstreamContext<T> for Result<T, TasteDiveError> {
    fn upstream_context(self, context: &'static str) -> ApiResult<T> {
        self.map_err(|e| match e {
            TasteDiveError::InvalidInput(message) => ApiError::ValidationError(message),
            TasteDiveError::MissingApiKey => {
                ApiError::Configuration("TasteDive API key not configured".into())
            }
            other => ApiError::upstream(context, other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("No artists found on Spotify".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("Email already in use".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::ValidationError("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::upstream("Spotify search failed", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Session("Logout failed").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::Unauthorized.error_code(), "UNAUTHORIZED");
        assert_eq!(
            ApiError::upstream("Spotify search failed", "boom").error_code(),
            "UPSTREAM_ERROR"
        );
    }

    #[test]
    fn test_upstream_message_hides_detail() {
        let err = ApiError::upstream(
            "Failed to fetch recommendations",
            "Spotify API error 502: secret upstream body",
        );
        assert_eq!(err.public_message(), "Failed to fetch recommendations");
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_internal_message_is_sanitized() {
        let err = ApiError::Internal("password hash format broken".into());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_spotify_invalid_input_is_validation_error() {
        let result: Result<(), SpotifyError> =
            Err(SpotifyError::InvalidInput("ids cannot be empty".into()));
        let err = result.upstream_context("whatever").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_spotify_api_error_is_upstream() {
        let result: Result<(), SpotifyError> = Err(SpotifyError::Api {
            status: 500,
            message: "oops".into(),
        });
        let err = result.upstream_context("Spotify search failed").unwrap_err();
        assert_eq!(err.public_message(), "Spotify search failed");
    }

    #[test]
    fn test_tastedive_error_is_upstream() {
        let result: Result<(), TasteDiveError> = Err(TasteDiveError::Timeout);
        let err = result
            .upstream_context("Failed to fetch artists by preference")
            .unwrap_err();
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    }

    #[test]
    fn test_tastedive_invalid_input_is_validation_error() {
        let result: Result<(), TasteDiveError> =
            Err(TasteDiveError::InvalidInput("artist name too long".into()));
        let err = result
            .upstream_context("Failed to fetch artists by preference")
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "artist name too long");
    }

    #[test]
    #[traced_test]
    fn test_upstream_detail_is_logged_not_returned() {
        let response = ApiError::upstream(
            "Spotify search failed",
            "Spotify API error 502: secret upstream body",
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(logs_contain("Upstream call failed"));
        assert!(logs_contain("secret upstream body"));
    }
}
