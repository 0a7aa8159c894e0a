use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::intake::CandidatePayload;
use super::repository::PipelineRepository;
use super::service::{HiringPipelineService, PipelineError};

/// Body for the stage-change endpoint. `modified_by_id` attributes the
/// change to an employee for auditing.
#[derive(Debug, Deserialize)]
pub struct StageUpdateRequest {
    pub current_interview_step: String,
    #[serde(default)]
    pub modified_by_id: Option<i64>,
}

/// Router builder exposing the hiring pipeline HTTP endpoints.
pub fn hiring_router<R>(service: Arc<HiringPipelineService<R>>) -> Router
where
    R: PipelineRepository + 'static,
{
    Router::new()
        .route("/candidates", post(add_candidate_handler::<R>))
        .route("/candidates/:id", get(candidate_handler::<R>))
        .route(
            "/candidates/:id/stage",
            patch(update_stage_handler::<R>).post(update_stage_handler::<R>),
        )
        .route(
            "/positions/:id/candidates",
            get(position_candidates_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn add_candidate_handler<R>(
    State(service): State<Arc<HiringPipelineService<R>>>,
    axum::Json(payload): axum::Json<CandidatePayload>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.add_candidate(payload) {
        Ok(candidate) => {
            let body = json!({
                "message": "Candidate added successfully",
                "data": candidate,
            });
            (StatusCode::CREATED, axum::Json(body)).into_response()
        }
        Err(err @ PipelineError::Repository(_)) => {
            error!(%err, "candidate intake failed");
            internal_error()
        }
        Err(err) => {
            let body = json!({
                "message": "Error adding candidate",
                "error": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
        }
    }
}

pub(crate) async fn candidate_handler<R>(
    State(service): State<Arc<HiringPipelineService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let Some(candidate_id) = parse_id(&id) else {
        return invalid_id_format();
    };

    match service.candidate_by_id(candidate_id) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(PipelineError::InvalidInput(_)) => invalid_id_format(),
        Err(PipelineError::NotFound(_)) => {
            let body = json!({ "error": "Candidate not found" });
            (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
        }
        Err(err) => {
            error!(candidate_id, %err, "candidate lookup failed");
            internal_error()
        }
    }
}

pub(crate) async fn update_stage_handler<R>(
    State(service): State<Arc<HiringPipelineService<R>>>,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<StageUpdateRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let Some(candidate_id) = parse_id(&id) else {
        return invalid_id_format();
    };

    match service.transition_stage(
        candidate_id,
        &request.current_interview_step,
        request.modified_by_id,
    ) {
        Ok(updated) => {
            let body = json!({
                "message": "Candidate stage updated successfully",
                "data": updated,
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err @ (PipelineError::InvalidInput(_) | PipelineError::Intake(_))) => {
            let body = json!({
                "error": "Invalid data",
                "message": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
        }
        Err(err @ PipelineError::IllegalTransition { .. }) => {
            let body = json!({
                "error": "Operation not allowed",
                "message": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
        }
        Err(PipelineError::NotFound(entity)) => {
            // The boundary keeps the uniform not-found contract; the log
            // records which lookup actually failed.
            error!(candidate_id, %entity, "stage transition target missing");
            let body = json!({
                "error": "Resource not found",
                "message": "The candidate or the specified stage was not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
        }
        Err(err) => {
            error!(candidate_id, stage = %request.current_interview_step, %err, "stage transition failed");
            internal_error()
        }
    }
}

pub(crate) async fn position_candidates_handler<R>(
    State(service): State<Arc<HiringPipelineService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let Some(position_id) = parse_id(&id) else {
        return invalid_id_format();
    };

    match service.position_report(position_id) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(PipelineError::InvalidInput(_)) => invalid_id_format(),
        Err(PipelineError::NotFound(_)) => {
            let body = json!({
                "error": "Position not found",
                "message": format!("No position found with ID {position_id}"),
            });
            (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
        }
        Err(err) => {
            error!(position_id, %err, "position report failed");
            internal_error()
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn invalid_id_format() -> Response {
    let body = json!({ "error": "Invalid ID format" });
    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

fn internal_error() -> Response {
    let body = json!({ "error": "Internal Server Error" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}
