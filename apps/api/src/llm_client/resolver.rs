//! Provider Resolver: picks a configured `TextGenerator` for a request and
//! falls back to the primary provider once when the requested one cannot answer.
//!
//! Per call:
//! `Start → Try(requested) → [Try(primary) if requested ≠ primary] → Completion`
//!
//! The resolver never returns `Err`. Every outcome is a `Completion`, which
//! always converts to text for the HTTP layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::llm_client::chat_completions::ChatCompletionsClient;
use crate::llm_client::gemini::GeminiClient;
use crate::llm_client::huggingface::HuggingFaceClient;
use crate::llm_client::{build_http_client, LlmError, Provider, TextGenerator};

pub const NO_PROVIDER_MESSAGE: &str =
    "Error: No AI provider available. Please check keys in .env";
const FAILURE_PREFIX: &str = "AI Generation Failed";

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Text produced by `provider`, exactly as the provider returned it.
    Generated { provider: Provider, text: String },
    /// Neither the requested provider nor the fallback is configured.
    NoProvider,
    /// The last provider tried failed with `cause`.
    Failed { provider: Provider, cause: String },
}

impl Completion {
    pub fn is_generated(&self) -> bool {
        matches!(self, Completion::Generated { .. })
    }

    /// Collapses the outcome into the text callers put in their response.
    pub fn into_text(self) -> String {
        match self {
            Completion::Generated { text, .. } => text,
            Completion::NoProvider => NO_PROVIDER_MESSAGE.to_string(),
            Completion::Failed { cause, .. } => format!("{FAILURE_PREFIX}: {cause}"),
        }
    }
}

/// Registry of configured providers plus the fallback policy.
/// Built once at startup and shared read-only across requests.
pub struct ProviderResolver {
    capabilities: HashMap<Provider, Arc<dyn TextGenerator>>,
    fallback: Provider,
}

impl ProviderResolver {
    /// Empty registry falling back to the primary provider.
    pub fn new() -> Self {
        Self {
            capabilities: HashMap::new(),
            fallback: Provider::default(),
        }
    }

    pub fn with_capability(
        mut self,
        provider: Provider,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        self.capabilities.insert(provider, generator);
        self
    }

    /// Registers an adapter for every provider whose credential is present.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let http = build_http_client(Duration::from_secs(config.llm_timeout_secs))?;
        let mut resolver = Self::new();

        if let Some(key) = &config.groq_api_key {
            resolver = resolver.with_capability(
                Provider::Groq,
                Arc::new(ChatCompletionsClient::groq(
                    http.clone(),
                    &config.groq_base_url,
                    key.clone(),
                )),
            );
        }
        if let Some(key) = &config.openai_api_key {
            resolver = resolver.with_capability(
                Provider::OpenAi,
                Arc::new(ChatCompletionsClient::openai(
                    http.clone(),
                    &config.openai_base_url,
                    key.clone(),
                )),
            );
        }
        if let Some(key) = &config.google_api_key {
            resolver = resolver.with_capability(
                Provider::Gemini,
                Arc::new(GeminiClient::new(
                    http.clone(),
                    &config.gemini_base_url,
                    key.clone(),
                )),
            );
        }
        if let Some(token) = &config.huggingface_token {
            resolver = resolver.with_capability(
                Provider::HuggingFace,
                Arc::new(HuggingFaceClient::new(
                    http,
                    &config.huggingface_base_url,
                    token.clone(),
                )),
            );
        }

        for provider in resolver.available() {
            if let Some(generator) = resolver.capabilities.get(&provider) {
                info!("Provider {provider} enabled (model: {})", generator.model());
            }
        }
        if resolver.capabilities.is_empty() {
            warn!("No AI provider keys configured; AI routes will return the no-provider message");
        }

        Ok(resolver)
    }

    /// Configured providers in canonical order.
    pub fn available(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.capabilities.contains_key(p))
            .collect()
    }

    /// Resolves `prompt` against `requested`, falling back to the primary at most once.
    pub async fn resolve(&self, prompt: &str, requested: Provider) -> Completion {
        let mut failure: Option<String> = None;

        match self.capabilities.get(&requested) {
            Some(generator) => match generator.generate(prompt).await {
                Ok(text) => {
                    return Completion::Generated {
                        provider: requested,
                        text,
                    }
                }
                Err(e) => {
                    warn!("AI error ({requested}): {e}");
                    failure = Some(e.to_string());
                }
            },
            None => warn!("Provider {requested} is not configured"),
        }

        if requested != self.fallback {
            if let Some(generator) = self.capabilities.get(&self.fallback) {
                warn!(
                    "Provider {requested} unavailable, falling back to {}",
                    self.fallback
                );
                return match generator.generate(prompt).await {
                    Ok(text) => Completion::Generated {
                        provider: self.fallback,
                        text,
                    },
                    Err(e) => {
                        error!("AI error ({} fallback): {e}", self.fallback);
                        Completion::Failed {
                            provider: self.fallback,
                            cause: e.to_string(),
                        }
                    }
                };
            }
        }

        match failure {
            Some(cause) => {
                error!("AI generation failed for {requested}: {cause}");
                Completion::Failed {
                    provider: requested,
                    cause,
                }
            }
            None => Completion::NoProvider,
        }
    }
}

impl Default for ProviderResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps an optional request field to a provider.
/// Unknown names get the primary, just as an unconfigured provider would.
pub fn requested_provider(name: Option<&str>) -> Provider {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        None => Provider::default(),
        Some(name) => name.parse::<Provider>().unwrap_or_else(|e| {
            warn!("{e}; using {}", Provider::default());
            Provider::default()
        }),
    }
}
