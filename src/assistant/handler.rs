//! HTTP handlers for the Assistant API
//!
//! - GET  /api/v1/sessions/:id/assistant/messages - conversation log
//! - POST /api/v1/sessions/:id/assistant/messages - send a message

use crate::assistant::bridge::AssistantBridge;
use crate::assistant::types::*;
use crate::error::ApiError;
use crate::session::handler::session_error_response;
use crate::session::manager::SessionManager;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Shared state for assistant handlers
#[derive(Clone)]
pub struct AssistantState {
    pub bridge: Arc<AssistantBridge>,
    pub sessions: Arc<SessionManager>,
}

/// Create the assistant router
pub fn assistant_router(state: AssistantState) -> Router {
    Router::new()
        .route(
            "/api/v1/sessions/:id/assistant/messages",
            get(list_messages).post(send_message),
        )
        .with_state(state)
}

/// GET /api/v1/sessions/:id/assistant/messages
async fn list_messages(
    State(state): State<AssistantState>,
    Path(id): Path<String>,
) -> Response {
    match state.sessions.conversation(&id).await {
        Ok(messages) => Json(messages).into_response(),
        Err(err) => session_error_response(err),
    }
}

/// POST /api/v1/sessions/:id/assistant/messages
///
/// The turn runs on its own task so a dropped connection cannot leave the
/// session stuck in the pending state.
async fn send_message(
    State(state): State<AssistantState>,
    Path(id): Path<String>,
    Json(request): Json<AskRequest>,
) -> Response {
    let text = request.text;
    if text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request("Message text is required")),
        )
            .into_response();
    }

    let turn = match state.sessions.begin_turn(&id, &text).await {
        Ok(turn) => turn,
        Err(err) => return session_error_response(err),
    };

    let task = tokio::spawn(async move {
        let reply = state.bridge.ask(&text, &turn.history, turn.role).await;
        let message = state.sessions.finish_turn(&id, &reply).await;
        (reply, message)
    });

    match task.await {
        Ok((reply, Ok(message))) => Json(AskResponse {
            reply: message,
            outcome: reply.outcome,
            attempts: reply.attempts,
        })
        .into_response(),
        Ok((_, Err(err))) => session_error_response(err),
        Err(e) => {
            tracing::error!("Assistant task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal("Assistant task failed")),
            )
                .into_response()
        }
    }
}
