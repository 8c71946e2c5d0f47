//! Conversational assistant
//!
//! Answers questions about the catalogue through a hosted language model.
//! Each session keeps its own conversation; backend failures surface as a
//! fixed apology turn, never as an error.

pub mod bridge;
pub mod client;
pub mod handler;
pub mod prompt;
pub mod types;

pub use bridge::{AssistantBridge, BridgeSettings};
pub use client::{AssistantError, CompletionClient, GeminiClient};
pub use handler::{assistant_router, AssistantState};
