// src/web/handlers/job_handlers.rs
use crate::copilot::{format, CareerCopilot};
use crate::web::types::{JobSearchParams, JobSearchResponse};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

/// Aggregated search; upstream trouble shows up in the metadata, never as an error status
pub async fn search_jobs_handler(
    params: JobSearchParams,
    copilot: &State<CareerCopilot>,
) -> Json<JobSearchResponse> {
    let mut query = copilot
        .default_query(params.keywords.as_deref())
        .with_location(params.location.as_deref().unwrap_or_default())
        .remote_only(params.remote.unwrap_or(false))
        .include_linkedin(params.include_linkedin.unwrap_or(true));
    if let Some(limit) = params.limit {
        query = query.with_limit(limit);
    }

    info!(
        "Job search: '{}' in '{}' (limit {})",
        query.keywords, query.location, query.limit
    );

    let result = copilot.search_jobs(&query).await;

    Json(JobSearchResponse {
        success: true,
        response: format::job_list(&result),
        jobs: result.jobs,
        metadata: result.metadata,
    })
}
