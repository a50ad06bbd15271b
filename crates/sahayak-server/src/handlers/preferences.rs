//! Session preference handlers
//!
//! Language and state selections are session-scoped key-value cells: they
//! live exactly as long as the session and are never persisted.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::{bearer_token, AppError, AppState};
use sahayak_core::Language;

/// Current session preferences
#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub language: Language,
    pub state: Option<String>,
}

/// GET /api/preferences - Read the session's language and state selections
pub async fn get_preferences(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PreferencesResponse>, AppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::unauthorized("Session required"))?;
    let session = app
        .sessions
        .get(token)
        .await
        .ok_or_else(|| AppError::unauthorized("Session expired"))?;

    Ok(Json(PreferencesResponse {
        language: session.language,
        state: session.state,
    }))
}

/// Request body for updating preferences; omitted fields stay unchanged
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub language: Option<String>,
    pub state: Option<String>,
}

/// POST /api/preferences - Update the session's language and/or state
pub async fn set_preferences(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferencesResponse>, AppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::unauthorized("Session required"))?;

    let language = payload
        .language
        .as_deref()
        .map(|s| s.parse::<Language>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let (language, state) = app
        .sessions
        .with_session(token, |session| {
            if let Some(lang) = language {
                session.language = lang;
            }
            if let Some(name) = payload.state.clone() {
                session.state = Some(name);
            }
            (session.language, session.state.clone())
        })
        .await
        .ok_or_else(|| AppError::unauthorized("Session expired"))?;

    Ok(Json(PreferencesResponse { language, state }))
}
