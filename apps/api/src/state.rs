use std::sync::Arc;

use crate::llm_client::ProviderResolver;
use crate::study::scraper::WebScraper;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Every configured provider plus the fallback policy.
    pub resolver: Arc<ProviderResolver>,
    pub scraper: WebScraper,
}
