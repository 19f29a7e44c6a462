use axum::{
    extract::{Query, State},
    response::Response,
    Extension,
};
use serde::Deserialize;
use unibench_core::RecommendationPriority;

use crate::middleware::RequestId;

use super::{respond, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct RecommendationQuery {
    /// Lowest priority to include; every priority when absent.
    pub priority: Option<String>,
}

pub(super) async fn list_findings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    respond(req_id.0, state.store.report().findings_by_priority())
}

pub(super) async fn list_recommendations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Response, ApiError> {
    let priority = match query.priority.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse::<RecommendationPriority>().map_err(|e| {
            tracing::warn!(error = %e, "rejected recommendation priority");
            ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
        })?,
        _ => RecommendationPriority::Low,
    };
    Ok(respond(
        req_id.0,
        state.store.report().recommendations_at_least(priority),
    ))
}

pub(super) async fn get_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    respond(req_id.0, state.store.report())
}
