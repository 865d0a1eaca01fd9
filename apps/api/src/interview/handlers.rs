//! Axum route handlers for the continuous interview.
//!
//! Sessions are stateless: the client sends the resume and the history on
//! every call.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::interview::feedback::InterviewFeedback;
use crate::interview::prompts::{
    FEEDBACK_PROMPT, FOLLOW_UP_RESUME_LIMIT, NEXT_QUESTION_PROMPT, START_PROMPT,
    START_RESUME_LIMIT,
};
use crate::interview::transcript::{
    format_transcript, recent_turns, InterviewTurn, RECENT_TURN_WINDOW,
};
use crate::llm_client::prompts::{render, truncate_chars, JSON_ONLY_INSTRUCTION};
use crate::llm_client::resolver::requested_provider;
use crate::serde_ext::null_as_empty;
use crate::state::AppState;

const ACTIVE_STATUS: &str = "active";

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resume_text: String,
    pub provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewHistoryRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resume_text: String,
    #[serde(default)]
    pub history: Vec<InterviewTurn>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: String,
    pub status: &'static str,
}

/// POST /api/interview/start
pub async fn handle_start(
    State(state): State<AppState>,
    payload: Result<Json<StartInterviewRequest>, JsonRejection>,
) -> Result<Json<QuestionResponse>, AppError> {
    let Json(request) = payload?;
    info!("Starting interview ({} resume chars)", request.resume_text.len());

    let prompt = render(
        START_PROMPT,
        &[("resume", truncate_chars(&request.resume_text, START_RESUME_LIMIT))],
    );
    let question = state
        .resolver
        .resolve(&prompt, requested_provider(request.provider.as_deref()))
        .await
        .into_text();

    Ok(Json(QuestionResponse {
        question,
        status: ACTIVE_STATUS,
    }))
}

/// POST /api/interview/next_question
///
/// Only the last `RECENT_TURN_WINDOW` turns are sent to the model.
pub async fn handle_next_question(
    State(state): State<AppState>,
    payload: Result<Json<InterviewHistoryRequest>, JsonRejection>,
) -> Result<Json<QuestionResponse>, AppError> {
    let Json(request) = payload?;
    let conversation = format_transcript(recent_turns(&request.history, RECENT_TURN_WINDOW));
    let prompt = render(
        NEXT_QUESTION_PROMPT,
        &[
            ("resume", truncate_chars(&request.resume_text, FOLLOW_UP_RESUME_LIMIT)),
            ("conversation", conversation.as_str()),
        ],
    );
    let question = state
        .resolver
        .resolve(&prompt, requested_provider(request.provider.as_deref()))
        .await
        .into_text();

    Ok(Json(QuestionResponse {
        question,
        status: ACTIVE_STATUS,
    }))
}

/// POST /api/interview/feedback
///
/// Answers with the four feedback keys; an unusable model reply is replaced
/// by `InterviewFeedback::fallback`. Only a body that is not JSON is a 400.
pub async fn handle_feedback(
    State(state): State<AppState>,
    payload: Result<Json<InterviewHistoryRequest>, JsonRejection>,
) -> Result<Json<InterviewFeedback>, AppError> {
    let Json(request) = payload?;
    info!("Evaluating interview with {} turns", request.history.len());

    let transcript = format_transcript(&request.history);
    let prompt = render(
        FEEDBACK_PROMPT,
        &[
            ("resume", truncate_chars(&request.resume_text, FOLLOW_UP_RESUME_LIMIT)),
            ("transcript", transcript.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    let completion = state
        .resolver
        .resolve(&prompt, requested_provider(request.provider.as_deref()))
        .await;

    Ok(Json(InterviewFeedback::from_completion(completion)))
}
