pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::news::handlers as news;
use crate::state::AppState;
use crate::study::handlers::{self as study, MAX_UPLOAD_BYTES};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Study tools
        .route(
            "/api/upload",
            post(study::handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/analyze-url", post(study::handle_analyze_url))
        .route("/api/chat", post(study::handle_chat))
        // News
        .route("/api/news/trending", get(news::handle_trending))
        // Interview
        .route("/api/interview/start", post(interview::handle_start))
        .route(
            "/api/interview/next_question",
            post(interview::handle_next_question),
        )
        .route("/api/interview/feedback", post(interview::handle_feedback))
        .with_state(state)
}
