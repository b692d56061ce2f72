// src/web/handlers/system_handlers.rs
use crate::copilot::CareerCopilot;
use crate::web::types::HealthResponse;

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

const CAPABILITIES: [&str; 7] = [
    "job_search",
    "resume_scoring",
    "cover_letters",
    "linkedin_posts",
    "career_chat",
    "profile_summaries",
    "anthropic_relay",
];

pub async fn health_handler(copilot: &State<CareerCopilot>) -> Json<HealthResponse> {
    info!("Health check");

    Json(HealthResponse {
        status: "healthy",
        server: "career-copilot",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        providers: copilot
            .aggregator()
            .source_kinds()
            .iter()
            .map(|kind| kind.as_str().to_string())
            .collect(),
        capabilities: CAPABILITIES.to_vec(),
        ai_configured: copilot.config().llm.is_configured(),
    })
}
