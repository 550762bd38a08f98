//! Chat Completion Provider Abstraction Layer
//!
//! This module provides a common interface for requesting text completions
//! from a remote generation service. The ChatProvider trait defines the
//! contract the blueprint generator works against, so the orchestration
//! logic can be tested without real network access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod openrouter;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Message in a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message
    User,

    /// Assistant message
    Assistant,

    /// System message
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// Chat completion provider trait
///
/// A single request against a named model: role-tagged messages in, raw
/// assistant text out. Transport problems, non-success statuses, and
/// malformed response envelopes all surface as `LlmError`. The caller
/// decides what failure means for its retry policy.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "openrouter")
    fn name(&self) -> &str;

    /// Request a completion from the given model
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String>;
}
