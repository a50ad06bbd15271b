//! Chat boundary and history handlers
//!
//! `POST /api/chat` is the single message-handling entry point. A request
//! whose body lacks a string `message` field is rejected by the JSON
//! extractor before any of this code runs (client error), which is distinct
//! from the dialogue manager's own in-band reply for a present-but-blank
//! message.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{bearer_token, AppError, AppState};
use sahayak_core::models::{Category, Exchange, NewExchange};
use sahayak_core::DialogueManager;

/// Request to the chat assistant
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Optional conversation session to continue. Only consulted when the
    /// request carries no login session (anonymous / auth-disabled use).
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response from the chat assistant
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Category this turn resolved to, if any
    pub category: Option<Category>,
    /// Session carrying the conversation context for follow-up turns
    pub session_id: String,
}

/// POST /api/chat - Process one chat message
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let token = resolve_session(&state, &headers, payload.session_id.as_deref()).await;

    let (reply, user_id) = state
        .sessions
        .with_session(&token, |session| {
            let dialogue = DialogueManager::new(&state.kb, &state.lexicon);
            let reply = dialogue.respond(&mut session.context, &payload.message);
            (reply, session.user_id)
        })
        .await
        .ok_or_else(|| AppError::unauthorized("Session expired"))?;

    debug!(
        session = %token,
        category = ?reply.category,
        kind = ?reply.kind,
        "Chat turn processed"
    );

    if reply.should_record() {
        let exchange = NewExchange {
            user_id,
            question: payload.message.trim().to_string(),
            reply: reply.reply.clone(),
            category: reply.category,
            timestamp: Utc::now(),
        };
        // Logging is best-effort: a storage failure never blocks the reply.
        if let Err(e) = state.db.record_exchange(&exchange) {
            warn!(error = %e, "Failed to record exchange");
        }
    }

    Ok(Json(ChatResponse {
        reply: reply.reply,
        category: reply.category,
        session_id: token,
    }))
}

/// Resolve the conversation session: the login session when the bearer token
/// names one, else the session from the body, else a fresh anonymous session.
async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
    session_id: Option<&str>,
) -> String {
    if let Some(token) = bearer_token(headers) {
        if state.sessions.contains(token).await {
            return token.to_string();
        }
    }
    if let Some(token) = session_id {
        if state.sessions.contains(token).await {
            return token.to_string();
        }
    }
    state.sessions.create(None, None).await
}

/// GET /api/chat/history - The logged-in user's exchanges, oldest first
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Exchange>>, AppError> {
    let user_id = match bearer_token(&headers) {
        Some(token) => state.sessions.get(token).await.and_then(|s| s.user_id),
        None => None,
    };

    let Some(user_id) = user_id else {
        return Err(AppError::unauthorized("Sign in to view chat history"));
    };

    let history = state.db.list_exchanges(user_id)?;
    Ok(Json(history))
}
