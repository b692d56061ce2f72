pub mod career_handlers;
pub mod job_handlers;
pub mod system_handlers;

pub use career_handlers::*;
pub use job_handlers::*;
pub use system_handlers::*;

use crate::copilot::as_validation;
use crate::web::types::StandardErrorResponse;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use tracing::error;

pub type ApiError = status::Custom<Json<StandardErrorResponse>>;

/// Validation failures become 400s carrying their code; anything else is a 500
pub fn error_response(err: anyhow::Error) -> ApiError {
    if let Some(validation) = as_validation(&err) {
        return status::Custom(
            Status::BadRequest,
            Json(StandardErrorResponse::from(validation)),
        );
    }

    error!("Request failed: {:#}", err);
    status::Custom(
        Status::InternalServerError,
        Json(StandardErrorResponse::new(
            "Internal server error".to_string(),
            "INTERNAL_ERROR".to_string(),
            vec!["Try again in a few moments".to_string()],
        )),
    )
}

/// For calls with no template to fall back on: the model's failure is the caller's answer
pub fn upstream_error_response(err: anyhow::Error) -> ApiError {
    if as_validation(&err).is_some() {
        return error_response(err);
    }

    error!("Upstream model call failed: {:#}", err);
    status::Custom(
        Status::BadGateway,
        Json(StandardErrorResponse::new(
            format!("Language model request failed: {}", err),
            "UPSTREAM_ERROR".to_string(),
            vec![
                "Check that the API key is valid".to_string(),
                "Try again in a few moments".to_string(),
            ],
        )),
    )
}
