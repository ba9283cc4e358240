//! Axum Handlers for the demo API
//!
//! Each handler forwards to the session orchestrator and shapes the result
//! into the `{success, ...}` envelope. It uses `utoipa` doc comments to
//! generate OpenAPI documentation.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use avatar_demo_core::error::DemoError;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

use crate::{
    models::{
        ChatPayload, ChatResponse, ErrorResponse, MessageResponse, SessionSummary, SpeakPayload,
        StartResponse, StatusResponse,
    },
    state::AppState,
};

pub enum ApiError {
    /// The request body could not be read as the expected payload.
    BadRequest(String),
    Demo(DemoError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(reason) => {
                warn!(%reason, "Rejected request body");
                (StatusCode::BAD_REQUEST, Value::String(reason))
            }
            ApiError::Demo(DemoError::NoActiveSession) => {
                warn!("Rejected request: no active session");
                (
                    StatusCode::BAD_REQUEST,
                    Value::String(DemoError::NoActiveSession.to_string()),
                )
            }
            ApiError::Demo(DemoError::Remote(err)) => {
                error!(error = %err, "Provider call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.payload())
            }
        };
        (status, Json(ErrorResponse::new(error))).into_response()
    }
}

impl From<DemoError> for ApiError {
    fn from(err: DemoError) -> Self {
        ApiError::Demo(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Start a new avatar streaming session, replacing any current one.
#[utoipa::path(
    post,
    path = "/api/demo/start",
    responses(
        (status = 200, description = "Session started", body = StartResponse),
        (status = 500, description = "Avatar provider failure", body = ErrorResponse)
    )
)]
pub async fn start_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StartResponse>, ApiError> {
    let session = state.orchestrator.start().await?;
    Ok(Json(StartResponse {
        success: true,
        session,
    }))
}

/// Make the avatar speak the given text.
#[utoipa::path(
    post,
    path = "/api/demo/speak",
    request_body = SpeakPayload,
    responses(
        (status = 200, description = "Talk task accepted", body = MessageResponse),
        (status = 400, description = "No active session or unreadable body", body = ErrorResponse),
        (status = 500, description = "Avatar provider failure", body = ErrorResponse)
    )
)]
pub async fn speak(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeakPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            // Without a session the body is irrelevant; report the session first.
            if state.orchestrator.status().await.is_none() {
                return Err(DemoError::NoActiveSession.into());
            }
            return Err(rejection.into());
        }
    };
    state.orchestrator.speak(&payload.text).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Avatar is speaking".to_string(),
    }))
}

/// Generate a reply to the customer's message and have the avatar speak it.
#[utoipa::path(
    post,
    path = "/api/demo/chat",
    request_body = ChatPayload,
    responses(
        (status = 200, description = "Generated reply", body = ChatResponse),
        (status = 400, description = "Unreadable body", body = ErrorResponse),
        (status = 500, description = "Generation or avatar provider failure", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload?;
    let response = state.orchestrator.chat(&payload.message).await?;
    Ok(Json(ChatResponse {
        success: true,
        response,
    }))
}

/// Stop the current session, if any.
#[utoipa::path(
    post,
    path = "/api/demo/stop",
    responses(
        (status = 200, description = "Session stopped", body = MessageResponse),
        (status = 500, description = "Avatar provider failure", body = ErrorResponse)
    )
)]
pub async fn stop_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.orchestrator.stop().await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Session stopped".to_string(),
    }))
}

/// Report whether a session is active and for how long.
#[utoipa::path(
    get,
    path = "/api/demo/status",
    responses(
        (status = 200, description = "Session status", body = StatusResponse)
    )
)]
pub async fn session_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let session = state.orchestrator.status().await.map(SessionSummary::from);
    Json(StatusResponse {
        success: true,
        active: session.is_some(),
        session,
    })
}
