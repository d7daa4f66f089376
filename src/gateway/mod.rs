pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Token usage reported by the provider for a single call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Total tokens (input + output).
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Generated text plus optional usage data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Prompt tokens consumed, or 0 when the provider did not report usage.
    pub fn input_tokens(&self) -> u64 {
        self.usage.map(|u| u.input_tokens).unwrap_or(0)
    }
}

/// Any provider-side failure: transport, HTTP status, malformed body,
/// or an empty reply. Causes are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generation failed: {detail}")]
pub struct GenerationFailure {
    pub detail: String,
}

impl GenerationFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// The text-generation provider. Could be Gemini, or a script in tests.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Model identifier reported in response metadata.
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<Completion, GenerationFailure>;
}
