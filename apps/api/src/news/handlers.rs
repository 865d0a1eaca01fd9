use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::resolver::requested_provider;
use crate::news::models::{fallback_headlines, parse_headlines, Headline};
use crate::news::prompts::TRENDING_NEWS_PROMPT;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TrendingQuery {
    pub provider: Option<String>,
}

/// GET /api/news/trending
///
/// Asks the model for three headlines; serves the canned list if the reply
/// does not parse into three complete items. A malformed query string means
/// the default provider.
pub async fn handle_trending(
    State(state): State<AppState>,
    query: Result<Query<TrendingQuery>, QueryRejection>,
) -> Json<Vec<Headline>> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(e) => {
            warn!("Ignoring trending-news query: {}", e.body_text());
            TrendingQuery::default()
        }
    };
    let prompt = render(TRENDING_NEWS_PROMPT, &[("json_only", JSON_ONLY_INSTRUCTION)]);
    let text = state
        .resolver
        .resolve(&prompt, requested_provider(query.provider.as_deref()))
        .await
        .into_text();

    match parse_headlines(&text) {
        Ok(headlines) => Json(headlines),
        Err(e) => {
            warn!("Trending news unavailable, serving fallback: {e}");
            Json(fallback_headlines())
        }
    }
}
