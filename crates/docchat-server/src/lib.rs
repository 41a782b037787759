//! docchat-server
//!
//! HTTP surface for the document chat service: chat turns, history, and
//! PDF uploads, runnable standalone or behind AWS Lambda.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use eyre::WrapErr;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::upload::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Chat bodies carry the full extracted document text, which can be far
/// larger than the part that ends up in the prompt.
pub const CHAT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Multipart framing on top of the file itself.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        .route(
            "/api/chat",
            post(routes::chat::post_chat).layer(DefaultBodyLimit::max(CHAT_BODY_LIMIT)),
        )
        .route("/api/chat/history", get(routes::chat::get_history))
        .route(
            "/api/upload",
            post(routes::upload::upload_document).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::resolve_caller,
        ))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .with_state(state)
}

/// Any origin without credentials, or a single credentialed origin so the
/// session cookie can travel cross-site.
pub fn cors_layer(origin: Option<&str>) -> eyre::Result<CorsLayer> {
    match origin {
        None => Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)),
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .wrap_err("DOCCHAT_CORS_ORIGIN is not a valid header value")?;
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true))
        }
    }
}
