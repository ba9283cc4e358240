//! Error types shared by the provider clients and the session orchestrator.

use serde_json::Value;

/// A failure of a single outbound call to one of the external providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: Value },
    /// The provider answered successfully but the payload did not have the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Builds an `Api` error from a raw response body, keeping JSON bodies verbatim.
    pub fn from_body(status: u16, raw: &str) -> Self {
        let body = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Self::Api { status, body }
    }

    /// The most specific human-readable message the provider gave us.
    ///
    /// Avatar provider errors carry a top-level `message`, generation provider
    /// errors nest it under `error.message`.
    pub fn message(&self) -> String {
        if let Self::Api { body, .. } = self {
            let nested = body
                .get("message")
                .or_else(|| body.get("error").and_then(|e| e.get("message")))
                .and_then(Value::as_str);
            if let Some(msg) = nested {
                return msg.to_string();
            }
            if let Some(raw) = body.as_str() {
                return raw.to_string();
            }
        }
        self.to_string()
    }

    /// The payload surfaced to HTTP clients: the provider body verbatim when we have one.
    pub fn payload(&self) -> Value {
        match self {
            Self::Api { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

/// Failure of a session orchestrator operation.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("No active session. Start session first.")]
    NoActiveSession,
    #[error(transparent)]
    Remote(#[from] ProviderError),
}
