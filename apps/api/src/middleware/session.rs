//! Session extractor for cookie-authenticated handlers
//!
//! ```rust,ignore
//! async fn dashboard(session: SessionUser) -> impl IntoResponse {
//!     format!("Hello, {}!", session.user.username)
//! }
//! ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ApiError, ErrorResponse};
use crate::models::{Session, User};
use crate::services::AuthService;

/// User behind a valid signed cookie and live session row
///
/// Rejects with 401 when the cookie is missing, tampered, or names an
/// unknown or expired session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub session: Session,
}

/// Session rejection types
#[derive(Debug)]
pub enum SessionRejection {
    /// No session cookie on the request
    MissingCookie,
    /// Cookie failed verification or its session is gone
    InvalidSession,
    /// Session store lookup failed
    DatabaseError(String),
    /// AuthService was not layered into the router
    MissingServices,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            SessionRejection::MissingCookie => {
                tracing::debug!("Session rejected: missing cookie");
                (StatusCode::UNAUTHORIZED, ApiError::Unauthorized)
            }
            SessionRejection::InvalidSession => {
                tracing::debug!("Session rejected: invalid or expired session");
                (StatusCode::UNAUTHORIZED, ApiError::Unauthorized)
            }
            SessionRejection::DatabaseError(e) => {
                tracing::error!(error = %e, "Session rejected: database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::Internal(format!("Failed to load session: {}", e)),
                )
            }
            SessionRejection::MissingServices => {
                tracing::error!("Session rejected: AuthService missing from extensions");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::Internal("Authentication services not configured".to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: error.error_code(),
            message: error.public_message(),
            details: None,
        });

        (status, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = parts
            .extensions
            .get::<AuthService>()
            .ok_or(SessionRejection::MissingServices)?;

        let cookie = auth_service
            .cookies()
            .read(&parts.headers)
            .ok_or(SessionRejection::MissingCookie)?;

        let (user, session) = auth_service
            .authenticate(cookie)
            .await
            .map_err(|e| SessionRejection::DatabaseError(e.to_string()))?
            .ok_or(SessionRejection::InvalidSession)?;

        Ok(SessionUser { user, session })
    }
}
