//! Conversational assistant backed by a hosted model
//!
//! - `prompt`: fixed system instruction and canned replies
//! - `client`: the `ModelClient` seam and the Gemini implementation
//! - `session`: transcript, conversation and the send state machine

pub mod client;
pub mod prompt;
pub mod session;

pub use client::{GeminiClient, ModelClient, Turn, TurnRequest, GEMINI_API_BASE};
pub use session::{AssistantSession, AssistantStatus, Conversation, SendPlan};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("A message is already being sent")]
    Busy,

    #[error("There is no unanswered message to retry")]
    NothingToRetry,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no text")]
    EmptyResponse,
}
