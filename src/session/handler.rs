//! HTTP handlers for the Sessions API
//!
//! - POST /api/v1/sessions                 - create anonymous session
//! - GET  /api/v1/sessions/:id             - session info
//! - POST /api/v1/sessions/:id/login       - authenticate
//! - POST /api/v1/sessions/:id/logout      - back to anonymous
//! - PUT  /api/v1/sessions/:id/view        - set category and/or search term
//! - POST /api/v1/sessions/:id/view/clear  - clear filters

use crate::error::ApiError;
use crate::session::manager::{SessionError, SessionManager};
use crate::session::types::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for session handlers
#[derive(Clone)]
pub struct SessionsState {
    pub manager: Arc<SessionManager>,
}

/// Create the sessions router
pub fn sessions_router(state: SessionsState) -> Router {
    Router::new()
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", get(get_session))
        .route("/api/v1/sessions/:id/login", post(login))
        .route("/api/v1/sessions/:id/logout", post(logout))
        .route("/api/v1/sessions/:id/view", put(update_view))
        .route("/api/v1/sessions/:id/view/clear", post(clear_view))
        .with_state(state)
}

/// Map a session failure onto its HTTP status and error envelope
pub(crate) fn session_error_response(err: SessionError) -> Response {
    let (status, body) = match &err {
        SessionError::NotFound(_) => (StatusCode::NOT_FOUND, ApiError::not_found(err.to_string())),
        SessionError::Auth(_) => (StatusCode::UNAUTHORIZED, ApiError::unauthorized(err.to_string())),
        SessionError::Busy => (StatusCode::CONFLICT, ApiError::conflict(err.to_string())),
    };
    (status, Json(body)).into_response()
}

fn respond(result: Result<SessionInfo, SessionError>) -> Response {
    match result {
        Ok(info) => Json(info).into_response(),
        Err(err) => session_error_response(err),
    }
}

/// POST /api/v1/sessions
async fn create_session(State(state): State<SessionsState>) -> impl IntoResponse {
    let info = state.manager.create().await;
    (StatusCode::CREATED, Json(info))
}

/// GET /api/v1/sessions/:id
async fn get_session(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
) -> Response {
    respond(state.manager.info(&id).await)
}

/// POST /api/v1/sessions/:id/login
async fn login(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(request): Json<LoginRequest>,
) -> Response {
    respond(
        state
            .manager
            .login(&id, &request.username, &request.password)
            .await,
    )
}

/// POST /api/v1/sessions/:id/logout
async fn logout(State(state): State<SessionsState>, Path(id): Path<String>) -> Response {
    respond(state.manager.logout(&id).await)
}

/// PUT /api/v1/sessions/:id/view
async fn update_view(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateViewRequest>,
) -> Response {
    respond(state.manager.update_view(&id, request).await)
}

/// POST /api/v1/sessions/:id/view/clear
async fn clear_view(State(state): State<SessionsState>, Path(id): Path<String>) -> Response {
    respond(state.manager.clear_view(&id).await)
}
