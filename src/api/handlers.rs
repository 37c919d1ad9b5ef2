//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{ChatRequest, ChatResponse, ErrorResponse, SuccessResponse};
use super::AppState;
use crate::chat;
use crate::session::{ApiValidity, SessionHandle};
use crate::view::{render, View};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the chat page
        .route("/", get(serve_page))
        // Static assets
        .route("/assets/*path", get(serve_static))
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
        // User actions
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/clear", post(clear_history))
        .route("/api/sessions/:id/retry", post(retry_connection))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Page
// ============================================================

async fn serve_page() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<View> {
    let (_, handle) = state.sessions.create();
    let mut session = handle.lock().await;
    chat::resolve_validity(&mut session, &state.gateway).await;
    Json(render(&session))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<View>, AppError> {
    let handle = lookup(&state, &id)?;
    let mut session = handle.lock().await;
    chat::resolve_validity(&mut session, &state.gateway).await;
    Ok(Json(render(&session)))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if state.sessions.remove(&id) {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(AppError::NotFound(format!("Session not found: {id}")))
    }
}

// ============================================================
// User Actions
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("Message text is empty".to_string()));
    }

    let handle = lookup(&state, &id)?;
    let mut session = handle.lock().await;

    if chat::resolve_validity(&mut session, &state.gateway).await != ApiValidity::Valid {
        return Err(AppError::Unavailable(
            "Please configure your Gemini API key to start chatting".to_string(),
        ));
    }

    let outcome = chat::submit(&mut session, &state.gateway, &req.text).await;

    Ok(Json(ChatResponse {
        view: render(&session),
        error: outcome.error,
    }))
}

async fn clear_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<View>, AppError> {
    let handle = lookup(&state, &id)?;
    let mut session = handle.lock().await;
    session.clear();
    Ok(Json(render(&session)))
}

async fn retry_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<View>, AppError> {
    let handle = lookup(&state, &id)?;
    let mut session = handle.lock().await;
    session.reset_validity();
    chat::resolve_validity(&mut session, &state.gateway).await;
    Ok(Json(render(&session)))
}

fn lookup(state: &AppState, id: &str) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {id}")))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("local-assistant ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
