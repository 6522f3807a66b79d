//! Job API handlers: submission and status lookup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use titledoctor_core::pipeline::SubmitError;
use titledoctor_core::Job;

use crate::state::AppState;

/// Request body for submitting a channel
#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    /// Channel handle (with or without `@`) or channel name
    pub channel: String,
    /// Address the report is emailed to
    pub email: String,
}

/// Response for an accepted submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub job_id: String,
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct JobErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Submit a channel for title improvement
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<SubmitResponse>), impl IntoResponse> {
    match state.submitter().submit(&body.channel, &body.email) {
        Ok(receipt) => Ok((
            StatusCode::ACCEPTED,
            Json(SubmitResponse {
                success: true,
                job_id: receipt.job_id,
                message: receipt.message,
            }),
        )),
        Err(SubmitError::Validation(message)) => Err((
            StatusCode::BAD_REQUEST,
            Json(JobErrorResponse {
                success: false,
                error: message,
            }),
        )),
        Err(SubmitError::Store(e)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JobErrorResponse {
                success: false,
                error: e.to_string(),
            }),
        )),
    }
}

/// Get a job by ID
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Job>, impl IntoResponse> {
    match state.job_store().get(&id) {
        Ok(Some(job)) => Ok(Json(job)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(JobErrorResponse {
                success: false,
                error: "Job not found".to_string(),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JobErrorResponse {
                success: false,
                error: e.to_string(),
            }),
        )),
    }
}
