//! LLM Client: the single point of entry for all model calls in InsightMatrix.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Handlers go through `ProviderResolver`, which owns one `TextGenerator`
//! per configured provider and applies the fallback policy.
//!
//! Model ids are hardcoded per adapter to prevent drift.
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

pub mod chat_completions;
pub mod gemini;
pub mod huggingface;
pub mod prompts;
pub mod resolver;

pub use resolver::{Completion, ProviderResolver};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A text-generation backend. One implementation per provider API shape.
///
/// Implementations return the model's text untouched; trimming or JSON
/// cleanup is the caller's business.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// The fixed set of providers the service knows how to call.
/// `Groq` is the primary and the fallback target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Provider {
    #[default]
    Groq,
    OpenAi,
    Gemini,
    HuggingFace,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Groq,
        Provider::OpenAi,
        Provider::Gemini,
        Provider::HuggingFace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
            Provider::HuggingFace => "huggingface",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown provider '{0}'")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" | "primary" => Ok(Provider::Groq),
            "openai" => Ok(Provider::OpenAi),
            "gemini" | "google" => Ok(Provider::Gemini),
            "huggingface" | "hf" => Ok(Provider::HuggingFace),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Builds the shared reqwest client used by every provider adapter.
pub fn build_http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Detailed { message: String },
    Plain(String),
}

/// Pulls a human-readable message out of a provider error body.
/// Understands `{"error": {"message": ..}}` and `{"error": ".."}`; falls back to the raw body.
pub(crate) fn extract_api_error(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(ApiErrorEnvelope {
            error: ApiErrorBody::Detailed { message },
        }) => message,
        Ok(ApiErrorEnvelope {
            error: ApiErrorBody::Plain(message),
        }) => message,
        Err(_) => body.trim().to_string(),
    }
}

/// Turns a non-success response into `LlmError::Api`, or hands back the body text.
pub(crate) async fn read_success_body(response: reqwest::Response) -> Result<String, LlmError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: extract_api_error(&body),
        });
    }
    Ok(body)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Locates the JSON payload in model output: strips fences, then narrows to the
/// outermost `{..}` or `[..]` so a chatty preamble does not break parsing.
pub fn extract_json_block(text: &str) -> &str {
    let text = strip_json_fences(text);
    let start = text.find(['{', '[']);
    let end = text.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
