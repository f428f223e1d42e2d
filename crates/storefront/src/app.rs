//! Router assembly.

use axum::{
    Router,
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::error::AppError;
use crate::middleware::{auth_gate, request_id_middleware, security_headers_middleware};
use crate::routes::{self, health};
use crate::state::AppState;

/// Build the full storefront router over the given session layer.
///
/// The binary passes a Postgres-backed layer; tests pass an in-memory one.
pub fn router<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), auth_gate))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                user_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("that page".to_string())
}
