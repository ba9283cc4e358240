//! Streaming Avatar Provider
//!
//! Contract for the external streaming-avatar service and its HTTP client.
//! The service hands out a remote session (WebRTC offer plus ICE servers),
//! accepts "talk" tasks against that session and tears it down on request.

use crate::{config::AvatarConfig, error::ProviderError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Quality tier requested for every new session.
pub const SESSION_QUALITY: &str = "medium";
/// Speaking rate requested for every new session.
pub const VOICE_RATE: f32 = 1.0;
const API_VERSION: &str = "v2";

/// What the provider hands back when a streaming session is created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewSession {
    pub session_id: String,
    #[serde(default)]
    pub sdp: Value,
    #[serde(default)]
    pub ice_servers: Value,
}

/// Remaining account credit as reported by the provider.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CreditBalance {
    pub remaining: Option<f64>,
}

/// Defines the contract for the streaming-avatar service.
#[async_trait]
pub trait AvatarProvider: Send + Sync {
    /// Opens a new remote streaming session.
    async fn create_session(&self) -> Result<NewSession, ProviderError>;

    /// Queues `text` to be spoken by the avatar of `session_id`.
    ///
    /// Returns once the provider has accepted the task, not when speech ends.
    async fn talk(&self, session_id: &str, text: &str) -> Result<(), ProviderError>;

    /// Asks the provider to tear down `session_id`.
    async fn stop_session(&self, session_id: &str) -> Result<(), ProviderError>;

    /// Reads the account's credit balance. Used only as a credential check.
    async fn credit_balance(&self) -> Result<CreditBalance, ProviderError>;
}

#[derive(Serialize)]
struct VoiceSetting<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_id: Option<&'a str>,
    rate: f32,
}

#[derive(Serialize)]
struct NewSessionRequest<'a> {
    avatar_id: &'a str,
    quality: &'a str,
    voice: VoiceSetting<'a>,
    version: &'a str,
}

#[derive(Serialize)]
struct TaskRequest<'a> {
    session_id: &'a str,
    text: &'a str,
    task_type: &'a str,
}

#[derive(Serialize)]
struct StopRequest<'a> {
    session_id: &'a str,
}

/// Every provider response wraps its payload in a `data` object.
#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// An implementation of `AvatarProvider` for the HeyGen streaming API.
pub struct HeyGenClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    avatar_id: String,
    voice_id: Option<String>,
}

impl HeyGenClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: SecretString,
        avatar_id: impl Into<String>,
        voice_id: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            avatar_id: avatar_id.into(),
            voice_id,
        }
    }

    pub fn from_config(http: Client, config: &AvatarConfig) -> Self {
        Self::new(
            http,
            config.base_url.clone(),
            SecretString::new(config.api_key.expose_secret().into()),
            config.avatar_id.clone(),
            config.voice_id.clone(),
        )
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.http
            .post(format!("{}/v1/{}", self.base_url, endpoint))
            .header("X-Api-Key", self.api_key.expose_secret())
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ProviderError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_body(status.as_u16(), &raw));
        }
        Ok(response)
    }

    async fn data<T: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, ProviderError> {
        let body: Value = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("{}: {}", what, e)))?;
        let envelope: Envelope<T> = serde_json::from_value(body)
            .map_err(|e| ProviderError::Malformed(format!("{}: {}", what, e)))?;
        envelope
            .data
            .ok_or_else(|| ProviderError::Malformed(format!("{}: missing `data`", what)))
    }
}

#[async_trait]
impl AvatarProvider for HeyGenClient {
    async fn create_session(&self) -> Result<NewSession, ProviderError> {
        let body = NewSessionRequest {
            avatar_id: &self.avatar_id,
            quality: SESSION_QUALITY,
            voice: VoiceSetting {
                voice_id: self.voice_id.as_deref(),
                rate: VOICE_RATE,
            },
            version: API_VERSION,
        };
        let session: NewSession = self
            .data(self.post("streaming.new").json(&body), "streaming.new")
            .await?;
        debug!(session_id = %session.session_id, "Avatar session created");
        Ok(session)
    }

    async fn talk(&self, session_id: &str, text: &str) -> Result<(), ProviderError> {
        let body = TaskRequest {
            session_id,
            text,
            task_type: "talk",
        };
        self.send(self.post("streaming.task").json(&body)).await?;
        Ok(())
    }

    async fn stop_session(&self, session_id: &str) -> Result<(), ProviderError> {
        self.send(self.post("streaming.stop").json(&StopRequest { session_id }))
            .await?;
        Ok(())
    }

    async fn credit_balance(&self) -> Result<CreditBalance, ProviderError> {
        let request = self
            .http
            .get(format!("{}/v1/user.credit", self.base_url))
            .header("X-Api-Key", self.api_key.expose_secret());
        self.data(request, "user.credit").await
    }
}
