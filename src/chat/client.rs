//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::LlmConfig;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("invalid response: {0}")]
    JsonError(String),
    #[error("empty response")]
    EmptyResponse,
}

/// Coarse category used to pick the user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    Network,
    Api,
    EmptyReply,
}

impl LlmError {
    pub fn kind(&self) -> LlmErrorKind {
        match self {
            LlmError::NetworkError(_) => LlmErrorKind::Network,
            LlmError::ApiError(_) | LlmError::JsonError(_) => LlmErrorKind::Api,
            LlmError::EmptyResponse => LlmErrorKind::EmptyReply,
        }
    }
}

/// A language model that answers one user message.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(&self, user_message: &str) -> Result<String, LlmError>;
}

#[derive(serde::Deserialize, Debug)]
struct LenientMessage {
    content: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct LenientChoice {
    message: LenientMessage,
}

#[derive(serde::Deserialize, Debug)]
struct LenientResponse {
    #[serde(default)]
    choices: Vec<LenientChoice>,
}

/// Client for any `POST {base}/chat/completions` endpoint.
pub struct OpenAiCompatClient {
    http_client: HttpClient,
    api_base: String,
    api_key: SecretString,
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
}

impl OpenAiCompatClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http_client = create_http_client(config.timeout)?;
        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

fn create_http_client(timeout: Duration) -> Result<HttpClient, LlmError> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::NetworkError(e.to_string()))
}

#[async_trait]
impl InferenceClient for OpenAiCompatClient {
    async fn complete(&self, user_message: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": self.system_prompt },
                { "role": "user", "content": user_message }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        });

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let truncated: String = error_text.chars().take(500).collect();
            return Err(LlmError::ApiError(format!("{status} - {truncated}")));
        }

        let res_json: LenientResponse = response
            .json()
            .await
            .map_err(|e| LlmError::JsonError(e.to_string()))?;

        let content = res_json
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content)
    }
}
