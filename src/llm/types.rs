use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when no provider credential is configured.
pub const UNAVAILABLE_TEXT: &str =
    "AI insights are temporarily unavailable. Please review the metrics provided.";

/// Shown when the provider was called but produced no usable answer.
pub const GENERATION_FAILED_TEXT: &str =
    "AI insights could not be generated at this time. Please refer to the calculated metrics.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

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

/// A single system+user exchange sent to the text generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(self.user_prompt.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    /// Full provider response, kept for audit logging.
    pub raw: serde_json::Value,
}

/// Why a generation attempt failed. Never shown to end users.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No API credential configured")]
    MissingCredential,

    #[error("Provider did not answer before the timeout")]
    Timeout,

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed provider payload: {0}")]
    MalformedPayload(String),
}

/// An external text-generation service. One call, no retries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError> {
        (**self).generate(request).await
    }
}

/// Classified cause of a degraded narrative, for observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingCredential,
    Timeout,
    ProviderStatus(u16),
    Transport,
    MalformedPayload,
    InvalidInput,
}

impl From<&ProviderError> for FallbackReason {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::MissingCredential => FallbackReason::MissingCredential,
            ProviderError::Timeout => FallbackReason::Timeout,
            ProviderError::Status { status, .. } => FallbackReason::ProviderStatus(*status),
            ProviderError::Transport(_) => FallbackReason::Transport,
            ProviderError::MalformedPayload(_) => FallbackReason::MalformedPayload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub text: String,
    /// Provider payload on success; `None` for fallbacks.
    pub raw: Option<serde_json::Value>,
    #[serde(skip)]
    pub fallback: Option<FallbackReason>,
}

impl Narrative {
    pub fn fallback(reason: FallbackReason) -> Self {
        let text = match reason {
            FallbackReason::MissingCredential => UNAVAILABLE_TEXT,
            _ => GENERATION_FAILED_TEXT,
        };

        Self {
            text: text.to_string(),
            raw: None,
            fallback: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

impl From<Generation> for Narrative {
    fn from(generation: Generation) -> Self {
        Self {
            text: generation.text,
            raw: Some(generation.raw),
            fallback: None,
        }
    }
}
