use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CompanyId, EmployeeId, EvaluationKey, PeriodId, Role};
use super::gap::GapViewer;
use super::goals::KpiDraft;
use super::repository::{AuditLog, RepositoryError, ReviewStore};
use super::service::{EvaluationDraft, ReviewService, ReviewServiceError};

/// Router builder exposing HTTP endpoints for the review engine.
pub fn review_router<S, A>(service: Arc<ReviewService<S, A>>) -> Router
where
    S: ReviewStore + 'static,
    A: AuditLog + 'static,
{
    Router::new()
        .route(
            "/api/v1/reviews/questionnaire",
            get(questionnaire_handler::<S, A>),
        )
        .route(
            "/api/v1/reviews/evaluations",
            post(save_evaluation_handler::<S, A>),
        )
        .route("/api/v1/reviews/gap", get(gap_handler::<S, A>))
        .route(
            "/api/v1/reviews/goals/:goal_id/kpis",
            post(save_kpis_handler::<S, A>),
        )
        .route(
            "/api/v1/reviews/admin/unlock",
            post(unlock_handler::<S, A>),
        )
        .route(
            "/api/v1/reviews/admin/periods/activate",
            post(activate_period_handler::<S, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeriodQuery {
    company_id: u32,
    period: String,
}

pub(crate) async fn questionnaire_handler<S, A>(
    State(service): State<Arc<ReviewService<S, A>>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    S: ReviewStore + 'static,
    A: AuditLog + 'static,
{
    match service.questionnaire(CompanyId(query.company_id), &PeriodId(query.period)) {
        Ok(resolved) => (StatusCode::OK, axum::Json(resolved)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn save_evaluation_handler<S, A>(
    State(service): State<Arc<ReviewService<S, A>>>,
    axum::Json(draft): axum::Json<EvaluationDraft>,
) -> Response
where
    S: ReviewStore + 'static,
    A: AuditLog + 'static,
{
    // Submitted rows are locked against the normal save path; only the admin
    // unlock endpoint reopens them.
    let key = EvaluationKey {
        company_id: draft.company_id,
        period: draft.period.clone(),
        employee_id: draft.employee_id.clone(),
        is_self_eval: draft.is_self_eval,
    };
    match service.evaluation(&key) {
        Ok(Some(existing)) if existing.status.is_locked() => {
            let payload = json!({
                "error": "evaluation is submitted and locked",
            });
            return (StatusCode::CONFLICT, axum::Json(payload)).into_response();
        }
        Ok(_) => {}
        Err(other) => return internal_error(other),
    }

    match service.save_evaluation(draft) {
        Ok(evaluation) => (StatusCode::ACCEPTED, axum::Json(evaluation)).into_response(),
        Err(
            error @ (ReviewServiceError::EmployeeNotFound(_)
            | ReviewServiceError::InvalidTargetStatus(_)),
        ) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GapQuery {
    company_id: u32,
    period: String,
    employee_id: String,
    viewer: GapViewer,
}

pub(crate) async fn gap_handler<S, A>(
    State(service): State<Arc<ReviewService<S, A>>>,
    Query(query): Query<GapQuery>,
) -> Response
where
    S: ReviewStore + 'static,
    A: AuditLog + 'static,
{
    match service.gap_analysis(
        query.viewer,
        CompanyId(query.company_id),
        &PeriodId(query.period),
        &EmployeeId(query.employee_id),
    ) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error @ ReviewServiceError::GapNotAvailable) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct KpiSaveRequest {
    company_id: u32,
    kpis: Vec<KpiDraft>,
}

pub(crate) async fn save_kpis_handler<S, A>(
    State(service): State<Arc<ReviewService<S, A>>>,
    Path(goal_id): Path<i64>,
    axum::Json(request): axum::Json<KpiSaveRequest>,
) -> Response
where
    S: ReviewStore + 'static,
    A: AuditLog + 'static,
{
    match service.save_goal_kpis(CompanyId(request.company_id), goal_id, request.kpis) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(ReviewServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "goal not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnlockRequest {
    actor: String,
    actor_role: Role,
    company_id: u32,
    period: String,
    employee_id: String,
    is_self_eval: bool,
    justification: String,
}

pub(crate) async fn unlock_handler<S, A>(
    State(service): State<Arc<ReviewService<S, A>>>,
    axum::Json(request): axum::Json<UnlockRequest>,
) -> Response
where
    S: ReviewStore + 'static,
    A: AuditLog + 'static,
{
    let key = EvaluationKey {
        company_id: CompanyId(request.company_id),
        period: PeriodId(request.period),
        employee_id: EmployeeId(request.employee_id),
        is_self_eval: request.is_self_eval,
    };
    match service.unlock_evaluation(
        &EmployeeId(request.actor),
        request.actor_role,
        &key,
        &request.justification,
    ) {
        Ok(outcome) => {
            let payload = json!({
                "outcome": outcome,
                "message": outcome.message(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error @ ReviewServiceError::JustificationRequired) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ ReviewServiceError::Forbidden(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "evaluation not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivatePeriodRequest {
    actor: String,
    company_id: u32,
    period: String,
}

pub(crate) async fn activate_period_handler<S, A>(
    State(service): State<Arc<ReviewService<S, A>>>,
    axum::Json(request): axum::Json<ActivatePeriodRequest>,
) -> Response
where
    S: ReviewStore + 'static,
    A: AuditLog + 'static,
{
    let period = PeriodId(request.period);
    match service.activate_period(
        &EmployeeId(request.actor),
        CompanyId(request.company_id),
        &period,
    ) {
        Ok(()) => {
            let payload = json!({
                "period": period.0,
                "active": true,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "period not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: ReviewServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
