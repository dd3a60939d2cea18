use crate::error::HirelinkError;
use crate::server::router::HirelinkState;
use crate::utils::logging::with_pretty_json_debug;
use axum::{Json, extract::State};
use hirelink_schema::{ResumeRelVacanciesRepliedDto, WorkerRelDto};
use tracing::debug;

pub(super) async fn workers_handler(
    State(state): State<HirelinkState>,
) -> Result<Json<Vec<WorkerRelDto>>, HirelinkError> {
    let workers = state.hiring.workers_with_resumes_dto().await?;
    with_pretty_json_debug(&workers, |json| {
        debug!(workers = workers.len(), body = %json, "GET /workers");
    });
    Ok(Json(workers))
}

pub(super) async fn resumes_handler(
    State(state): State<HirelinkState>,
) -> Result<Json<Vec<ResumeRelVacanciesRepliedDto>>, HirelinkError> {
    let resumes = state.hiring.resumes_with_all_relationships().await?;
    with_pretty_json_debug(&resumes, |json| {
        debug!(resumes = resumes.len(), body = %json, "GET /resumes");
    });
    Ok(Json(resumes))
}

pub(super) async fn healthz_handler() -> &'static str {
    "ok"
}
