use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_API_BASE, DEFAULT_MODEL};

use super::{Completion, Gateway, GenerationFailure, TokenUsage};

/// A gateway that calls the Gemini `generateContent` REST endpoint.
pub struct GeminiGateway {
    api_key: String,
    model: String,
    api_base: String,
    http: reqwest::Client,
}

impl GeminiGateway {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: DEFAULT_API_BASE.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the gateway at a different host (a proxy, or a local stub in tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    async fn call(&self, prompt: &str) -> Result<Completion> {
        let body = ApiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("failed to reach Gemini API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Gemini API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .context("failed to parse Gemini response")?;

        Self::extract(api_resp)
    }

    /// Pull the generated text and usage out of a decoded response.
    fn extract(api_resp: ApiResponse) -> Result<Completion> {
        if let Some(reason) = api_resp
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            bail!("prompt blocked by Gemini: {}", reason);
        }

        let candidate = api_resp
            .candidates
            .first()
            .ok_or_else(|| anyhow!("Gemini API returned no candidates"))?;

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            bail!("Gemini API returned empty response");
        }

        let usage = api_resp.usage_metadata.map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        });

        Ok(Completion { text, usage })
    }
}

#[async_trait]
impl Gateway for GeminiGateway {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<Completion, GenerationFailure> {
        match self.call(prompt).await {
            Ok(completion) => {
                if let Some(usage) = completion.usage {
                    tracing::debug!(
                        input = usage.input_tokens,
                        output = usage.output_tokens,
                        total = usage.total(),
                        "gemini token usage"
                    );
                }
                Ok(completion)
            }
            Err(e) => {
                let detail = format!("{e:#}");
                tracing::warn!(model = %self.model, %detail, "gemini call failed");
                Err(GenerationFailure::new(detail))
            }
        }
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}
