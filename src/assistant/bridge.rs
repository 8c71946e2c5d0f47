//! Assistant bridge
//!
//! Wraps a [`CompletionClient`] with the catalogue context, a per-attempt
//! timeout and bounded retries. `ask` never fails: every outcome is turned
//! into user-facing text plus an explicit [`ReplyOutcome`].

use crate::assistant::client::{AssistantError, CompletionClient, CompletionRequest};
use crate::assistant::prompt;
use crate::assistant::types::*;
use crate::catalogue::store::CatalogueStore;
use crate::catalogue::types::Role;
use crate::config::{AssistantConfig, MAX_RETRIES};
use std::sync::Arc;
use std::time::Duration;

/// Model and retry settings for the bridge
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub model: String,
    pub temperature: f32,
    /// Upper bound on a single attempt
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub max_retries: u32,
    /// Pause before each retry
    pub retry_backoff: Duration,
}

impl From<&AssistantConfig> for BridgeSettings {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
            max_retries: config.max_retries.min(MAX_RETRIES),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::from(&AssistantConfig::default())
    }
}

/// Conversational assistant over the catalogue
pub struct AssistantBridge {
    client: Arc<dyn CompletionClient>,
    catalogue: Arc<CatalogueStore>,
    settings: BridgeSettings,
}

impl AssistantBridge {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        catalogue: Arc<CatalogueStore>,
        settings: BridgeSettings,
    ) -> Self {
        Self {
            client,
            catalogue,
            settings,
        }
    }

    /// Ask the assistant.
    ///
    /// `history` is every turn before `message`. The catalogue snapshot is
    /// taken now, so resources created earlier in the session are included.
    pub async fn ask(&self, message: &str, history: &[ChatMessage], role: Role) -> AssistantReply {
        let resources = self.catalogue.snapshot().await;
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            system_preamble: prompt::build_system_preamble(
                self.catalogue.categories(),
                &resources,
                role,
            ),
            history: history.to_vec(),
            message: message.to_string(),
        };

        let max_attempts = self.settings.max_retries.saturating_add(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let error = match self.attempt(&request).await {
                Ok(text) => {
                    return AssistantReply {
                        text,
                        outcome: ReplyOutcome::Answered,
                        attempts: attempt,
                    }
                }
                Err(AssistantError::EmptyResponse) => {
                    tracing::warn!(backend = self.client.name(), "Assistant returned no text");
                    return AssistantReply {
                        text: EMPTY_REPLY.to_string(),
                        outcome: ReplyOutcome::Empty,
                        attempts: attempt,
                    };
                }
                Err(e) => e,
            };

            if attempt < max_attempts && error.is_retryable() {
                tracing::warn!(
                    backend = self.client.name(),
                    attempt,
                    "Assistant attempt failed, retrying: {}",
                    error
                );
                tokio::time::sleep(self.settings.retry_backoff).await;
                continue;
            }

            tracing::warn!(
                backend = self.client.name(),
                attempts = attempt,
                "Assistant unavailable: {}",
                error
            );
            return AssistantReply {
                text: APOLOGY.to_string(),
                outcome: ReplyOutcome::Failed {
                    reason: error.to_string(),
                },
                attempts: attempt,
            };
        }
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<String, AssistantError> {
        match tokio::time::timeout(self.settings.timeout, self.client.complete(request)).await {
            Ok(Ok(text)) if text.trim().is_empty() => Err(AssistantError::EmptyResponse),
            Ok(result) => result,
            Err(_) => Err(AssistantError::Timeout(self.settings.timeout)),
        }
    }
}
