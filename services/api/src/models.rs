//! API Models
//!
//! Request payloads and the `{success, ...}` response envelopes returned by
//! every endpoint, annotated for OpenAPI generation with `utoipa`.

use avatar_demo_core::{orchestrator::SessionStatus, session::Session};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SpeakPayload {
    #[schema(example = "Welcome!")]
    pub text: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ChatPayload {
    #[schema(example = "What's on the menu?")]
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct StartResponse {
    pub success: bool,
    /// `{sessionId, sdp, iceServers, createdAt}`
    #[schema(value_type = Object)]
    pub session: Session,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

#[derive(Serialize, ToSchema, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    /// Whole seconds since the session was started.
    pub uptime: u64,
}

impl From<SessionStatus> for SessionSummary {
    fn from(status: SessionStatus) -> Self {
        Self {
            session_id: status.session_id,
            uptime: status.uptime_secs,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    pub active: bool,
    pub session: Option<SessionSummary>,
}

/// The uniform failure envelope. `error` is either a message or the
/// provider's error payload, passed through verbatim.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub error: Value,
}

impl ErrorResponse {
    pub fn new(error: Value) -> Self {
        Self {
            success: false,
            error,
        }
    }
}
