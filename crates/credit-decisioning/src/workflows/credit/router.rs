use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationStatus, RawApplication};
use super::repository::{ApplicationRepository, ApplicationView, RepositoryError};
use super::service::{ApplicationServiceError, CreditApplicationService};
use crate::workflows::batch::BatchImportError;

/// Router builder exposing scoring, intake, review and dashboard endpoints.
pub fn application_router<R>(service: Arc<CreditApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/scoring/calculate", post(calculate_handler::<R>))
        .route("/api/v1/scoring/batch", post(batch_handler::<R>))
        .route(
            "/api/v1/applications",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(review_handler::<R>),
        )
        .route("/api/v1/analytics/dashboard", get(dashboard_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    pub(crate) offset: Option<usize>,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdate {
    pub(crate) status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    pub(crate) csv: String,
}

pub(crate) async fn calculate_handler<R>(
    State(service): State<Arc<CreditApplicationService<R>>>,
    payload: Result<axum::Json<RawApplication>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let axum::Json(raw) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.calculate(&raw) {
        Ok(decision) => (StatusCode::OK, axum::Json(decision)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<CreditApplicationService<R>>>,
    payload: Result<axum::Json<RawApplication>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let axum::Json(raw) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.submit(&raw) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<CreditApplicationService<R>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list(params.offset.unwrap_or(0), params.limit) {
        Ok(records) => {
            let views: Vec<ApplicationView> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<CreditApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R>(
    State(service): State<Arc<CreditApplicationService<R>>>,
    Path(application_id): Path<String>,
    payload: Result<axum::Json<StatusUpdate>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let axum::Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.update_status(&ApplicationId(application_id), update.status) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<CreditApplicationService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.dashboard() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn batch_handler<R>(
    State(service): State<Arc<CreditApplicationService<R>>>,
    payload: Result<axum::Json<BatchRequest>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let reader = Cursor::new(request.csv.into_bytes());
    match service.import_csv(reader) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Repository(
            RepositoryError::Conflict | RepositoryError::StatusChanged { .. },
        )
        | ApplicationServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        ApplicationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ApplicationServiceError::Import(BatchImportError::TooManyRows { .. }) => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        ApplicationServiceError::Import(_) => StatusCode::BAD_REQUEST,
    };

    let payload = match &error {
        ApplicationServiceError::Input(invalid) => json!({
            "error": invalid.to_string(),
            "fields": invalid
                .violations()
                .iter()
                .map(|violation| json!({
                    "field": violation.field.label(),
                    "reason": violation.reason.to_string(),
                }))
                .collect::<Vec<_>>(),
        }),
        other => json!({ "error": other.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}

/// Body extraction failures keep axum's status code but use the JSON error shape.
fn rejection_response(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    let payload = json!({ "error": rejection.body_text() });
    (status, axum::Json(payload)).into_response()
}
