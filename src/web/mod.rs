// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use crate::copilot::{CareerCopilot, ChatReply};
use crate::core::ConfigManager;
use anyhow::Result;
use handlers::ApiError;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/health")]
pub async fn health(copilot: &State<CareerCopilot>) -> Json<HealthResponse> {
    handlers::health_handler(copilot).await
}

#[post("/career/chat", data = "<body>")]
pub async fn career_chat(
    body: Json<ChatBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<ChatReply>, ApiError> {
    handlers::chat_handler(body, copilot).await
}

#[get("/linkedin/jobs?<params..>")]
pub async fn linkedin_jobs(
    params: JobSearchParams,
    copilot: &State<CareerCopilot>,
) -> Json<JobSearchResponse> {
    handlers::search_jobs_handler(params, copilot).await
}

#[post("/career/cover-letter", data = "<body>")]
pub async fn cover_letter(
    body: Json<CoverLetterBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<CoverLetterResponse>, ApiError> {
    handlers::cover_letter_handler(body, copilot).await
}

#[post("/career/linkedin-post", data = "<body>")]
pub async fn linkedin_post(
    body: Json<LinkedInPostBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<LinkedInPostResponse>, ApiError> {
    handlers::linkedin_post_handler(body, copilot).await
}

#[post("/career/score", data = "<body>")]
pub async fn score(
    body: Json<ScoreBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<ScoreResponse>, ApiError> {
    handlers::score_handler(body, copilot).await
}

#[post("/linkedin/summary", data = "<body>")]
pub async fn linkedin_summary(
    body: Json<ProfileSummaryBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<ProfileSummaryResponse>, ApiError> {
    handlers::profile_summary_handler(body, copilot).await
}

#[post("/anthropic", data = "<body>")]
pub async fn anthropic_relay(
    body: Json<RelayBody>,
    copilot: &State<CareerCopilot>,
) -> Result<Json<RelayResponse>, ApiError> {
    handlers::relay_handler(body, copilot).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No route for {} {}", request.method(), request.uri().path()),
        "NOT_FOUND".to_string(),
        vec!["Check the endpoint path, e.g. POST /api/career/chat".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body has the wrong shape".to_string(),
        "INVALID_BODY".to_string(),
        vec!["Verify field names and types (camelCase keys)".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Routes, catchers and CORS over `copilot`, bound to its configured address and port
pub fn build_rocket(copilot: CareerCopilot) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", copilot.config().server.address.clone()))
        .merge(("port", copilot.config().server.port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(copilot)
        .register("/", catchers![bad_request, not_found, unprocessable, internal_error])
        .mount("/", routes![health, options])
        .mount(
            "/api",
            routes![
                career_chat,
                linkedin_jobs,
                cover_letter,
                linkedin_post,
                score,
                linkedin_summary,
                anthropic_relay
            ],
        )
}

pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let address = format!("{}:{}", config.server.address, config.server.port);
    let copilot = CareerCopilot::new(config)?;

    info!("Starting Career Copilot API server on {}", address);
    info!(
        "Job sources: {}",
        copilot
            .aggregator()
            .source_kinds()
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let _rocket = build_rocket(copilot)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
