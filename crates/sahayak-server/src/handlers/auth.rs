//! Signup, login, logout, and identity handlers

use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{bearer_token, AppError, AppState, SuccessResponse};
use sahayak_core::models::{NewUser, User};
use sahayak_core::Error as CoreError;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Response for registration
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: i64,
}

/// POST /api/signup - Register a new user
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    let id = state
        .db
        .create_user(&NewUser {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
        })
        .map_err(|e| match e {
            CoreError::Duplicate(_) => AppError::conflict("Email already registered"),
            CoreError::InvalidData(_) => AppError::bad_request("Please fill all fields"),
            other => AppError::from(other),
        })?;

    info!(user_id = id, "New user registered");

    Ok(Json(SignupResponse { id }))
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user: User,
}

/// POST /api/login - Verify credentials and open a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<std::net::SocketAddr>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .db
        .verify_credentials(&payload.email, &payload.password)?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    let now = Utc::now();
    let ip = connect_info.map(|ci| ci.0.ip().to_string());
    let login_id = state.db.record_login(user.id, ip.as_deref(), now)?;
    state.db.touch_last_login(user.id, now)?;

    let token = state.sessions.create(Some(user.id), Some(login_id)).await;

    info!(user_id = user.id, "User logged in");

    // Re-read so the response carries the just-stamped last_login
    let user = state
        .db
        .get_user(user.id)?
        .ok_or_else(|| AppError::internal("User record missing after login"))?;

    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/logout - End the session and close its login record
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        if let Some(session) = state.sessions.remove(token).await {
            if let Some(login_id) = session.login_id {
                state.db.close_login(login_id, Utc::now())?;
            }
            if let Some(user_id) = session.user_id {
                info!(user_id, "User logged out");
            }
        }
    }

    Ok(Json(SuccessResponse { success: true }))
}

/// Response for the /api/me endpoint
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// The authenticated user, if the session belongs to one
    pub user: Option<User>,
    /// How the caller was authenticated
    pub auth_method: String,
}

/// GET /api/me - Identify the current caller
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        if let Some(session) = state.sessions.get(token).await {
            let user = match session.user_id {
                Some(id) => state.db.get_user(id)?,
                None => None,
            };
            let auth_method = if user.is_some() {
                "session"
            } else {
                "anonymous_session"
            };
            return Ok(Json(MeResponse {
                user,
                auth_method: auth_method.to_string(),
            }));
        }

        // A bearer value that is not a session can only have passed the
        // middleware as an API key (or auth is disabled).
        if !state.config.api_keys.is_empty() {
            return Ok(Json(MeResponse {
                user: None,
                auth_method: "api_key".to_string(),
            }));
        }
    }

    Ok(Json(MeResponse {
        user: None,
        auth_method: "none".to_string(),
    }))
}
