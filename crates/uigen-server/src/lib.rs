pub mod cookies;
pub mod routes;
pub mod state;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use subtle::ConstantTimeEq;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uigen_core::config::AppConfig;

pub use cookies::SessionCookies;
pub use state::AppState;

/// Middleware that validates a bearer token from the Authorization header.
///
/// Uses constant-time comparison (`subtle::ConstantTimeEq`) so the
/// token cannot be recovered through response timing.
async fn auth_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let expected = match &state.config.server.auth_token {
        Some(t) => t,
        None => return next.run(req).await,
    };

    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header.and_then(|v| v.strip_prefix("Bearer ")) {
        Some(provided) if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) => {
            next.run(req).await
        }
        _ => (StatusCode::UNAUTHORIZED, "Invalid or missing bearer token").into_response(),
    }
}

/// Build the axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    // Session minting requires the bearer token when one is configured.
    let protected = Router::new()
        .merge(routes::session_issue_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public = Router::new()
        .merge(routes::health_routes())
        .merge(routes::current_session_routes())
        .merge(routes::badge_routes());

    let mut app = Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state.clone());

    app = app.layer(TraceLayer::new_for_http());

    if config.server.cors {
        let cors = if config.server.auth_token.is_some() {
            CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::DELETE,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_origin(Any)
        } else {
            CorsLayer::permissive()
        };
        app = app.layer(cors);
    }

    app
}

/// Start the HTTP server.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::new(config.clone());
    let router = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        "Starting server on {} ({} environment)",
        addr,
        config.auth.environment
    );

    if config.server.auth_token.is_none() {
        tracing::warn!("No auth_token configured — anyone can mint sessions!");
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
