//! Completion backends
//!
//! [`CompletionClient`] is the seam between the bridge and a hosted model.
//! [`GeminiClient`] talks to the Generative Language REST API.

use crate::assistant::types::{ChatMessage, Speaker};
use crate::config::AssistantConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a completion attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistantError {
    #[error("assistant timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("service returned no text")]
    EmptyResponse,

    #[error("assistant not configured: {0}")]
    NotConfigured(String),
}

impl AssistantError {
    /// Whether another attempt might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Transport(_) => true,
            Self::Service { status, .. } => *status == 429 || *status >= 500,
            Self::EmptyResponse | Self::NotConfigured(_) => false,
        }
    }
}

/// One completion call: model settings, preamble, prior turns and the new message
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub system_preamble: String,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// A hosted chat-completion backend
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the request and return the reply text
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, AssistantError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Build the client named by `config.provider`
pub fn from_config(config: &AssistantConfig) -> Result<Arc<dyn CompletionClient>> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::new(config)?)),
        other => Err(Error::Config(format!(
            "Unsupported assistant provider '{}'",
            other
        ))),
    }
}

// =============================================================================
// Gemini
// =============================================================================

/// Default Generative Language API endpoint
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("edunexus/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!(
                "No API key found in ${}; assistant replies will fall back to the apology",
                config.api_key_ref
            );
        }

        Ok(Self {
            http_client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn content<'a>(role: &'static str, text: &'a str) -> Content<'a> {
    Content {
        role: Some(role),
        parts: vec![Part { text }],
    }
}

fn wire_role(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "user",
        Speaker::Assistant => "model",
    }
}

/// Request body for `generateContent`
fn build_body(request: &CompletionRequest) -> GenerateContentRequest<'_> {
    let mut contents: Vec<Content<'_>> = request
        .history
        .iter()
        .map(|m| content(wire_role(m.speaker), &m.text))
        .collect();
    contents.push(content("user", &request.message));

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: &request.system_preamble,
            }],
        },
        contents,
        generation_config: GenerationConfig {
            temperature: request.temperature,
        },
    }
}

/// Concatenated text of the first candidate
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    Some(text)
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AssistantError::NotConfigured("missing API key".to_string()))?;

        let response = self
            .http_client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AssistantError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Transport(format!("invalid response body: {}", e)))?;

        match extract_text(parsed) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AssistantError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
