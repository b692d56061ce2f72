// src/web/handlers/career_handlers.rs
use super::{error_response, upstream_error_response, ApiError};
use crate::copilot::{CareerCopilot, ChatReply, ChatRequest};
use crate::utils::truncate_chars;
use crate::web::types::{
    ChatBody, CoverLetterBody, CoverLetterResponse, LinkedInPostBody, LinkedInPostResponse,
    ProfileSummaryBody, ProfileSummaryResponse, RelayBody, RelayResponse, ScoreBody,
    ScoreResponse,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn chat_handler(
    body: Json<ChatBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<ChatReply>, ApiError> {
    let request = ChatRequest::from(body.into_inner());
    info!(
        "Chat request ({} history entries): {}",
        request.conversation_history.len(),
        truncate_chars(request.message.trim(), 80)
    );

    copilot.chat(&request).await.map(Json).map_err(error_response)
}

pub async fn cover_letter_handler(
    body: Json<CoverLetterBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<CoverLetterResponse>, ApiError> {
    let request = body.to_request();
    info!(
        "Cover letter request: title={:?} company={:?}",
        request.job_title, request.company_name
    );

    copilot
        .cover_letter(&request, body.api_key.as_deref())
        .await
        .map(|draft| Json(draft.into()))
        .map_err(error_response)
}

pub async fn linkedin_post_handler(
    body: Json<LinkedInPostBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<LinkedInPostResponse>, ApiError> {
    let request = body.to_request();
    info!(
        "LinkedIn post request: {} (tone: {})",
        truncate_chars(request.content.trim(), 60),
        request.tone
    );

    copilot
        .linkedin_post(&request, body.api_key.as_deref())
        .await
        .map(|draft| Json(draft.into()))
        .map_err(error_response)
}

pub async fn score_handler(
    body: Json<ScoreBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let request = body.to_request();
    info!(
        "Score request: {} jobs supplied",
        request.jobs.as_ref().map_or(0, Vec::len)
    );

    let (outcome, jobs) = copilot
        .score(&request, body.api_key.as_deref())
        .await
        .map_err(error_response)?;

    Ok(Json(ScoreResponse {
        response: crate::copilot::format::score_list(&outcome),
        jobs_scored: jobs.len(),
        scores: outcome.scores,
        service_used: outcome.service_used,
        tool_used: "score_jobs_against_resume".to_string(),
    }))
}

pub async fn profile_summary_handler(
    body: Json<ProfileSummaryBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<ProfileSummaryResponse>, ApiError> {
    let request = body.to_request();
    info!(
        "Profile summary request: {} ({} posts)",
        request.username.trim(),
        request.posts.len()
    );

    copilot
        .profile_summary(&request, body.api_key.as_deref())
        .await
        .map(|summary| Json(summary.into()))
        .map_err(error_response)
}

pub async fn relay_handler(
    body: Json<RelayBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<RelayResponse>, ApiError> {
    info!(
        "Relay request: {} chars, max_tokens={:?}",
        body.prompt.chars().count(),
        body.max_tokens
    );

    copilot
        .relay(&body.prompt, body.max_tokens, body.api_key.as_deref())
        .await
        .map(|relayed| Json(relayed.into()))
        .map_err(upstream_error_response)
}
