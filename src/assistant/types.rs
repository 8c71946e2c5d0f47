//! Assistant wire types
//!
//! Conversation turns, the per-viewer conversation log and the explicit
//! reply outcome returned by the bridge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First turn of every conversation
pub const GREETING: &str = "¡Hola! Soy NexusBot. ¿En qué puedo ayudarte a encontrar hoy?";

/// User-facing text when the backend cannot be reached
pub const APOLOGY: &str =
    "Hubo un error al conectar con el asistente inteligente. Por favor intenta más tarde.";

/// User-facing text when the backend answers with nothing
pub const EMPTY_REPLY: &str = "Lo siento, no pude generar una respuesta en este momento.";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    /// Unix millis
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }

    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// How a reply came about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReplyOutcome {
    /// The backend produced text
    Answered,
    /// The backend answered with no text; a fallback was substituted
    Empty,
    /// Every attempt failed; the apology was substituted
    Failed { reason: String },
}

/// Bridge result: text to show plus how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub text: String,
    pub outcome: ReplyOutcome,
    pub attempts: u32,
}

impl AssistantReply {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ReplyOutcome::Failed { .. })
    }
}

/// A send was attempted while a previous turn is still outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a reply is still pending")]
pub struct TurnPending;

/// Append-only conversation log with a single outstanding-turn guard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl Conversation {
    /// New conversation opening with the assistant greeting
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            pending: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Record the user's turn and mark the conversation pending.
    ///
    /// Returns the turns that preceded it.
    pub fn begin_turn(&mut self, text: &str) -> Result<Vec<ChatMessage>, TurnPending> {
        if self.pending {
            return Err(TurnPending);
        }
        let prior = self.messages.clone();
        self.messages.push(ChatMessage::user(text));
        self.pending = true;
        Ok(prior)
    }

    /// Record the assistant's turn and clear the pending flag
    pub fn finish_turn(&mut self, reply: &AssistantReply) -> ChatMessage {
        let message = ChatMessage::assistant(reply.text.clone());
        self.messages.push(message.clone());
        self.pending = false;
        message
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body for sending a message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub text: String,
}

/// Response body for a sent message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub reply: ChatMessage,
    pub outcome: ReplyOutcome,
    pub attempts: u32,
}
