use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::errors::AppError;
use crate::intake::LeadIntake;
use crate::models::{LeadResponse, LeadSubmission};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Validate → persist → notify pipeline.
    pub intake: LeadIntake,
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lead-intake-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/submit-lead
///
/// Accepts a lead form submission and answers with the store's row id.
/// A body that is not a JSON object of string fields is a 400, same as a
/// failed validation. A body over the size limit is a 413 whether or not it
/// declared a `Content-Length`.
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Json<LeadResponse>, AppError> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::warn!("Rejected lead body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest("Invalid request body".to_string())
        }
    })?;

    let response = state.intake.submit(&submission).await?;
    Ok(Json(response))
}

/// OPTIONS /api/submit-lead
///
/// CORS headers are attached by the router, so the pre-flight only needs a 200.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on the lead endpoint.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
