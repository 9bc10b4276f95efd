//! # notes-api
//!
//! HTTP surface of the notes service: router, handlers, error mapping,
//! configuration and logging setup.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod openapi;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use notes_db::Database;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers::{health, notes};
use crate::middleware::{cors::cors_layer, request_id::MakeRequestUuidV7};
use crate::openapi::ApiDoc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router with all routes and middleware.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(health::root).fallback(method_not_allowed))
        .route(
            "/health",
            get(health::health_check).fallback(method_not_allowed),
        )
        .route(
            "/openapi.json",
            get(openapi_json).fallback(method_not_allowed),
        )
        .route(
            "/notes",
            get(notes::list_notes)
                .post(notes::create_note)
                .fallback(method_not_allowed),
        )
        .route(
            "/notes/:note_id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note)
                .fallback(method_not_allowed),
        )
        .route(
            "/notes/:note_id/audit",
            get(notes::get_note_audit).fallback(method_not_allowed),
        )
        .fallback(not_found)
        // enforced by the body extractors, so a 413 carries the JSON envelope
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(config.allowed_origins.as_deref()))
        .with_state(state)
}
