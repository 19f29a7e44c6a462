mod analytics;
mod export;
mod institutions;
mod report;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use unibench_analytics::AnalyticsError;
use unibench_core::{DatasetError, DatasetStore};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DatasetStore>,
    pub compare_capacity: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    dataset: String,
    institutions: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "unprocessable" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Serialize `data` in the standard envelope.
///
/// Handlers return borrowed views of the dataset, so the body is rendered
/// before the state handle is dropped.
pub(super) fn respond<T: Serialize>(request_id: String, data: T) -> Response {
    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(request_id),
    })
    .into_response()
}

pub(super) fn map_analytics_error(request_id: String, error: &AnalyticsError) -> ApiError {
    match error {
        AnalyticsError::Dataset(DatasetError::NotFound(_)) => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        AnalyticsError::InvalidParameter(_) => {
            tracing::warn!(error = %error, "rejected request parameters");
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        e if e.is_not_applicable() => ApiError::new(request_id, "unprocessable", e.to_string()),
        _ => {
            tracing::error!(error = %error, "analytics query failed");
            ApiError::new(request_id, "internal_error", "analytics query failed")
        }
    }
}

pub(super) fn map_dataset_error(request_id: String, error: DatasetError) -> ApiError {
    map_analytics_error(request_id, &AnalyticsError::from(error))
}

/// Parse an optional query parameter, falling back to the type's default.
pub(super) fn parse_or_default<T>(request_id: &str, raw: Option<&str>) -> Result<T, ApiError>
where
    T: FromStr<Err = AnalyticsError> + Default,
{
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse()
            .map_err(|e| map_analytics_error(request_id.to_string(), &e)),
        _ => Ok(T::default()),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/institutions", get(institutions::list_institutions))
        .route(
            "/api/v1/institutions/{id}",
            get(institutions::get_institution),
        )
        .route(
            "/api/v1/institutions/{id}/profile",
            get(institutions::get_profile),
        )
        .route("/api/v1/compare", get(institutions::compare))
        .route("/api/v1/gaps", get(analytics::gap_report))
        .route("/api/v1/gaps/{id}", get(analytics::gap_vs_institution))
        .route("/api/v1/stats", get(analytics::stats))
        .route("/api/v1/benchmarks", get(analytics::benchmarks))
        .route("/api/v1/projection", get(analytics::projection))
        .route("/api/v1/export.csv", get(export::export_csv))
        .route("/api/v1/findings", get(report::list_findings))
        .route("/api/v1/recommendations", get(report::list_recommendations))
        .route("/api/v1/report", get(report::get_report))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            dataset: state.store.metadata().name.clone(),
            institutions: state.store.all().len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
