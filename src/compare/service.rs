//! Interface to an external text-completion service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed instruction framing the task
    System,
    /// Templated prompt
    User,
    /// Model output
    Assistant,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model override; the service default is used when `None`
    pub model: Option<String>,
    /// Messages in order
    pub messages: Vec<ChatMessage>,
    /// Maximum output length in tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Text of the last user message, or an empty string.
    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Failure of a completion call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be understood.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A text-completion backend.
///
/// Implementations must be usable from one thread at a time; the comparator
/// never issues overlapping calls.
pub trait CompletionService {
    /// Submit a request and wait for the generated text.
    fn complete(&self, request: &CompletionRequest) -> Result<String, ServiceError>;
}

impl<S: CompletionService + ?Sized> CompletionService for &S {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ServiceError> {
        (**self).complete(request)
    }
}

impl<S: CompletionService + ?Sized> CompletionService for Box<S> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ServiceError> {
        (**self).complete(request)
    }
}
