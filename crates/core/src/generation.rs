//! Text Generation Provider
//!
//! Contract for the external generative-text service, a client for the
//! Gemini `generateContent` endpoint, and the fixed restaurant framing used
//! by the chat flow.

use crate::{config::GenerationConfig, error::ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Defines the contract for any service that turns a prompt into a reply.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Makes a single, non-streaming generation call and returns the reply text.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Wraps the customer's message in the assistant persona, menu and length instruction.
pub fn restaurant_prompt(message: &str) -> String {
    format!(
        "You are a friendly restaurant AI assistant. Customer said: \"{message}\".\n\n\
         Respond naturally in under 30 words. Be warm and helpful.\n\n\
         Menu: Burger ($12), Pizza ($15), Salad ($9), Coke ($3)"
    )
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// The first candidate's first text part.
    fn into_reply(self) -> Result<String, ProviderError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("no candidates in response".to_string()))?;
        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| ProviderError::Malformed("first candidate has no text part".to_string()))
    }
}

/// An implementation of `GenerationProvider` for the Gemini REST API.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme and host of the API, without a trailing slash.
    /// * `model` - The model identifier used in the request path (e.g., "gemini-pro").
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: SecretString,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(http: Client, config: &GenerationConfig) -> Self {
        Self::new(
            http,
            config.base_url.clone(),
            SecretString::new(config.api_key.expose_secret().into()),
            config.model.clone(),
        )
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_body(status.as_u16(), &raw));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        parsed.into_reply()
    }
}
