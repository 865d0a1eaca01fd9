use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every provider credential is optional; a missing key disables that provider.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub huggingface_token: Option<String>,
    pub groq_base_url: String,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    pub huggingface_base_url: String,
    /// Upper bound on a single provider request, in seconds.
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: optional_env("GROQ_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            google_api_key: optional_env("GOOGLE_API_KEY"),
            huggingface_token: optional_env("HUGGINGFACEHUB_API_TOKEN"),
            groq_base_url: env_or("GROQ_BASE_URL", "https://api.groq.com/openai/v1"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            gemini_base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            huggingface_base_url: env_or(
                "HUGGINGFACE_BASE_URL",
                "https://api-inference.huggingface.co",
            ),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Reads an env var, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
