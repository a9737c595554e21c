use crate::cookies::SessionCookies;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use uigen_core::tool_badge::{badge_for, ToolBadge, ToolInvocation};

// ── Health ──────────────────────────────────────────────────────────────

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ── Sessions ────────────────────────────────────────────────────────────

/// Minting sessions; sits behind the bearer-token layer.
pub fn session_issue_routes() -> Router<AppState> {
    Router::new().route("/api/sessions", post(issue_session))
}

/// The caller's own session, authenticated by its cookie.
pub fn current_session_routes() -> Router<AppState> {
    Router::new().route("/api/session", get(current_session).delete(delete_session))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueSessionRequest {
    user_id: String,
    email: String,
}

async fn issue_session(
    State(state): State<AppState>,
    mut cookies: SessionCookies,
    Json(req): Json<IssueSessionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let payload = state
        .issuer
        .issue(&mut cookies, &req.user_id, &req.email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to issue session: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok((StatusCode::CREATED, cookies, Json(payload)))
}

async fn current_session(
    State(state): State<AppState>,
    cookies: SessionCookies,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .issuer
        .session_from_jar(&cookies)
        .map(Json)
        .ok_or((StatusCode::UNAUTHORIZED, "No valid session".into()))
}

async fn delete_session(State(state): State<AppState>, mut cookies: SessionCookies) -> impl IntoResponse {
    state.issuer.clear(&mut cookies);
    (StatusCode::NO_CONTENT, cookies, ())
}

// ── Tool badges ─────────────────────────────────────────────────────────

pub fn badge_routes() -> Router<AppState> {
    Router::new().route("/api/tool-badges", post(tool_badges))
}

async fn tool_badges(Json(invocations): Json<Vec<ToolInvocation>>) -> Json<Vec<ToolBadge>> {
    Json(invocations.iter().map(badge_for).collect())
}
