//! # HTTP Handlers
//!
//! Each public function here is an Axum handler, mapped to a route in
//! [`super::create_router()`]. All endpoints speak JSON.
//!
//! | Handler | Method | Returns |
//! |---------|--------|---------|
//! | `post_message` | POST | [`ConversationResult`] |
//! | `get_history` | GET | recent [`ConversationRecord`]s |
//! | `delete_history` | DELETE | deletion count |
//! | `post_feedback` | POST | recorded feedback id |
//! | `get_analytics` | GET | [`AnalyticsReport`] (privileged) |
//! | `status` | GET | liveness + corpus stats |
//!
//! Validation failures come back as `422` with a `{"detail": ...}`
//! body; the analytics role check fails with `403`.
//!
//! [`ConversationResult`]: crate::orchestrator::ConversationResult
//! [`ConversationRecord`]: crate::model::ConversationRecord
//! [`AnalyticsReport`]: crate::store::AnalyticsReport

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::state::AppState;
use crate::corpus::CORPUS;
use crate::error::ChatError;
use crate::model::FeedbackRecord;

const DEFAULT_HISTORY_LIMIT: usize = 20;
const MAX_HISTORY_LIMIT: usize = 100;

/// Caller identity from the `x-user-id` header. The host application
/// authenticates upstream; absent headers act as a shared anonymous
/// user.
fn user_id(headers: &HeaderMap) -> String {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("anonymous")
        .to_string()
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

// ─── POST /chatbot/message ───────────────────────────────────────

#[derive(Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

pub async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<MessageRequest>,
) -> Response {
    let user = user_id(&headers);
    match state.engine.process_message(&user, &body.message).await {
        Ok(result) => Json(result).into_response(),
        Err(e @ (ChatError::EmptyMessage | ChatError::MessageTooLong { .. })) => {
            detail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

// ─── GET/DELETE /chatbot/history ─────────────────────────────────

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let user = user_id(&headers);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    Json(state.log.list_history(&user, limit)).into_response()
}

pub async fn delete_history(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = user_id(&headers);
    let deleted = state.log.purge_history(&user);
    tracing::info!(user = %user, deleted, "conversation history purged");
    Json(json!({ "deleted": deleted })).into_response()
}

// ─── POST /chatbot/feedback ──────────────────────────────────────

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub conversation_id: String,
    pub helpful: bool,
    pub comment: Option<String>,
}

pub async fn post_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<FeedbackRequest>,
) -> Response {
    if body.conversation_id.trim().is_empty() {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "conversation_id is empty");
    }
    let record = FeedbackRecord {
        id: Uuid::new_v4().to_string(),
        conversation_id: body.conversation_id,
        user_id: user_id(&headers),
        helpful: body.helpful,
        comment: body.comment,
        timestamp: Utc::now(),
    };
    let id = record.id.clone();
    state.log.record_feedback(record);
    Json(json!({ "id": id, "status": "recorded" })).into_response()
}

// ─── GET /chatbot/analytics ──────────────────────────────────────

pub async fn get_analytics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let role = headers
        .get("x-user-role")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !matches!(role, "admin" | "specialist") {
        return detail(
            StatusCode::FORBIDDEN,
            "analytics requires the admin or specialist role",
        );
    }
    Json(state.log.analytics()).into_response()
}

// ─── GET /status ─────────────────────────────────────────────────

pub async fn status(State(state): State<AppState>) -> Response {
    Json(json!({
        "ready": true,
        "intents": CORPUS.len(),
        "tracked_users": state.engine.tracked_users(),
    }))
    .into_response()
}
