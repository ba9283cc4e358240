//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the demo API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ChatPayload, ChatResponse, ErrorResponse, MessageResponse, SessionSummary, SpeakPayload,
        StartResponse, StatusResponse,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::start_session,
        handlers::speak,
        handlers::chat,
        handlers::stop_session,
        handlers::session_status,
    ),
    components(
        schemas(SpeakPayload, ChatPayload, StartResponse, MessageResponse, ChatResponse, StatusResponse, SessionSummary, ErrorResponse)
    ),
    tags(
        (name = "Avatar Demo API", description = "Restaurant avatar session control")
    )
)]
pub struct ApiDoc;

/// The endpoints served under `/api/demo`, for startup logging.
pub const ENDPOINTS: [(&str, &str); 5] = [
    ("POST /api/demo/start", "Start avatar session"),
    ("POST /api/demo/speak", "Make avatar speak"),
    ("POST /api/demo/chat", "Chat with avatar"),
    ("POST /api/demo/stop", "Stop session"),
    ("GET  /api/demo/status", "Get session status"),
];

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/api/demo/start", post(handlers::start_session))
        .route("/api/demo/speak", post(handlers::speak))
        .route("/api/demo/chat", post(handlers::chat))
        .route("/api/demo/stop", post(handlers::stop_session))
        .route("/api/demo/status", get(handlers::session_status))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
