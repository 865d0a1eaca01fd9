//! Axum route handlers for the study tools.

use anyhow::anyhow;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::serde_ext::null_as_empty;
use crate::llm_client::prompts::{render, truncate_chars};
use crate::llm_client::resolver::requested_provider;
use crate::state::AppState;
use crate::study::documents::extract_text;
use crate::study::prompts::{
    CHAT_CONTEXT_LIMIT, CHAT_PROMPT, DOCUMENT_SUMMARY_PROMPT, UPLOAD_TEXT_LIMIT,
    URL_CONTENT_LIMIT, WEBSITE_SUMMARY_PROMPT,
};

/// Uploads larger than axum's 2 MiB default are routine for PDFs.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub text: String,
    pub summary: String,
}

/// Accepts either `urls: [..]` or a single `url`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeUrlRequest {
    #[serde(default)]
    pub urls: Vec<String>,
    pub url: Option<String>,
    pub provider: Option<String>,
}

impl AnalyzeUrlRequest {
    fn target_urls(self) -> Vec<String> {
        let urls = if self.urls.is_empty() {
            self.url.into_iter().collect()
        } else {
            self.urls
        };
        urls.into_iter()
            .filter(|u| !u.trim().is_empty())
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeUrlResponse {
    pub urls: Vec<String>,
    pub content: String,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub question: String,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/upload
///
/// Multipart: `file` (required), `provider` (optional).
/// Extracts the document text and returns it with an AI summary.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart?;
    let mut file: Option<(String, Bytes)> = None;
    let mut provider: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?;
                file = Some((filename, bytes));
            }
            Some("provider") => {
                provider = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid provider: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| AppError::Validation("No file part".to_string()))?;
    if filename.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }
    info!("Upload received: {filename} ({} bytes)", bytes.len());

    // PDF parsing is CPU-bound; run it off the async executor.
    let name = filename.clone();
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, &name))
        .await
        .map_err(|e| AppError::Internal(anyhow!("text extraction task failed: {e}")))??;

    let prompt = render(
        DOCUMENT_SUMMARY_PROMPT,
        &[("text", truncate_chars(&text, UPLOAD_TEXT_LIMIT))],
    );
    let summary = state
        .resolver
        .resolve(&prompt, requested_provider(provider.as_deref()))
        .await
        .into_text();

    Ok(Json(UploadResponse {
        filename,
        text,
        summary,
    }))
}

/// POST /api/analyze-url
///
/// Scrapes each URL in order and summarizes the combined content.
pub async fn handle_analyze_url(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeUrlRequest>, JsonRejection>,
) -> Result<Json<AnalyzeUrlResponse>, AppError> {
    let Json(request) = payload?;
    let provider = requested_provider(request.provider.as_deref());
    let urls = request.target_urls();
    if urls.is_empty() {
        return Err(AppError::Validation("URLs required".to_string()));
    }
    info!("Analyzing {} URL(s)", urls.len());

    let mut content = String::new();
    for url in &urls {
        let page = state.scraper.scrape(url).await;
        content.push_str(&format!("\n\n--- Source: {url} ---\n{page}"));
    }

    let prompt = render(
        WEBSITE_SUMMARY_PROMPT,
        &[("content", truncate_chars(&content, URL_CONTENT_LIMIT))],
    );
    let summary = state.resolver.resolve(&prompt, provider).await.into_text();

    Ok(Json(AnalyzeUrlResponse {
        urls,
        content,
        summary,
    }))
}

/// POST /api/chat
///
/// Answers `question` against free-text `context`.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("Question required".to_string()));
    }

    let prompt = render(
        CHAT_PROMPT,
        &[
            ("context", truncate_chars(&request.context, CHAT_CONTEXT_LIMIT)),
            ("question", request.question.as_str()),
        ],
    );
    let answer = state
        .resolver
        .resolve(&prompt, requested_provider(request.provider.as_deref()))
        .await
        .into_text();

    Ok(Json(ChatResponse { answer }))
}
