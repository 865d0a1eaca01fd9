//! Hugging Face Inference API text-generation adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{read_success_body, LlmError, TextGenerator};

/// A generic instruction-tuned model.
pub const HUGGINGFACE_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const MAX_NEW_TOKENS: u32 = 500;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// The endpoint answers with either a list of generations or a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

#[derive(Clone)]
pub struct HuggingFaceClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl HuggingFaceClient {
    pub fn new(http: Client, base_url: &str, token: String) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}/models/{}",
                base_url.trim_end_matches('/'),
                HUGGINGFACE_MODEL
            ),
            token,
        }
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    fn model(&self) -> &str {
        HUGGINGFACE_MODEL
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                return_full_text: false,
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request_body)
            .send()
            .await?;
        let body = read_success_body(response).await?;

        match serde_json::from_str::<GenerationResponse>(&body)? {
            GenerationResponse::Many(items) => items
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or(LlmError::EmptyContent),
            GenerationResponse::One(g) => Ok(g.generated_text),
        }
    }
}
