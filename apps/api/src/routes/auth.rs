//! Authentication REST route handlers for Tunebridge
//!
//! Provides endpoints for cookie-session authentication:
//! - `POST /register` - Create an account and start a session
//! - `POST /login` - Authenticate and start a session
//! - `POST /logout` - Destroy the current session
//! - `GET /dashboard` - Session-guarded landing endpoint

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::SessionUser;
use crate::models::User;
use crate::services::{AuthService, Registration};

/// Shared application state for auth handlers
#[derive(Clone)]
pub struct AuthState {
    /// Authentication service
    pub auth_service: Arc<AuthService>,
}

impl AuthState {
    /// Create new auth state
    pub fn new(auth_service: AuthService) -> Self {
        Self {
            auth_service: Arc::new(auth_service),
        }
    }
}

/// Create authentication router
///
/// `/dashboard` needs `AuthService` available as a request extension.
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/dashboard", get(dashboard))
        .with_state(state)
}

// ========== Request/Response Types ==========

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "profilePhoto")]
    pub profile_photo: Option<String>,
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User response (safe to return to client)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_photo: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            profile_photo: user.profile_photo,
        }
    }
}

/// Response body shared by every auth endpoint
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl MessageResponse {
    fn new(message: &'static str) -> Self {
        Self {
            message,
            user: None,
        }
    }

    fn with_user(message: &'static str, user: User) -> Self {
        Self {
            message,
            user: Some(user.into()),
        }
    }
}

// ========== Route Handlers ==========

/// Register a new user account
///
/// # Response
/// - 201 Created: account created, session cookie set
/// - 400 Bad Request: invalid username, email, phone, photo URL, or short password
/// - 409 Conflict: email already registered
async fn register(
    State(state): State<AuthState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, session) = state
        .auth_service
        .register(Registration {
            username: request.username,
            email: request.email,
            phone: request.phone,
            profile_photo: request.profile_photo,
            password: request.password,
        })
        .await?;

    let cookie = state.auth_service.cookies().issue(session.id);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::with_user("User registered successfully", user)),
    ))
}

/// Login with email and password
///
/// # Response
/// - 200 OK: session cookie set
/// - 401 Unauthorized: invalid credentials (same for unknown email and wrong password)
async fn login(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, session) = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    let cookie = state.auth_service.cookies().issue(session.id);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::with_user("Logged in successfully", user)),
    ))
}

/// Logout and clear the session cookie
///
/// # Response
/// - 200 OK: session destroyed, or there was none
/// - 500 Internal Server Error: session store failure ("Logout failed")
async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let cookies = state.auth_service.cookies();
    state.auth_service.logout(cookies.read(&headers)).await?;

    Ok((
        [(header::SET_COOKIE, cookies.clear())],
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// Session-guarded dashboard
///
/// # Response
/// - 200 OK: valid session
/// - 401 Unauthorized: missing, tampered, or expired session
async fn dashboard(session: SessionUser) -> impl IntoResponse {
    Json(MessageResponse::with_user(
        "Welcome to your dashboard",
        session.user,
    ))
}
