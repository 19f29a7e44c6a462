use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension,
};
use serde::{Deserialize, Serialize};
use unibench_analytics::{
    gap_vs_record, summary_statistics, total_growth_percent, GrowthProjector, MetricField,
    ProjectionParams, ProjectionPoint,
};

use crate::middleware::RequestId;

use super::{map_analytics_error, map_dataset_error, parse_or_default, respond, ApiError, AppState};

const DEFAULT_HORIZON: u32 = 6;
const DEFAULT_POSTS: f64 = 8.0;
const DEFAULT_SHORT_FORM: f64 = 2.0;

#[derive(Debug, Deserialize)]
pub(super) struct FieldQuery {
    pub field: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProjectionQuery {
    /// Defaults to the subject's Instagram followers.
    pub start: Option<f64>,
    pub horizon: Option<u32>,
    pub posts: Option<f64>,
    pub short_form: Option<f64>,
    pub platform_adoption: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProjectionData {
    start_value: f64,
    params: ProjectionParams,
    total_growth_percent: f64,
    points: Vec<ProjectionPoint>,
}

pub(super) async fn gap_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FieldQuery>,
) -> Result<Response, ApiError> {
    let field: MetricField = parse_or_default(&req_id.0, query.field.as_deref())?;
    let subject = state
        .store
        .subject()
        .map_err(|e| map_dataset_error(req_id.0.clone(), e))?;
    let report = unibench_analytics::gap_report(subject, state.store.all(), field)
        .map_err(|e| map_analytics_error(req_id.0.clone(), &e))?;
    Ok(respond(req_id.0, report))
}

pub(super) async fn gap_vs_institution(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Query(query): Query<FieldQuery>,
) -> Result<Response, ApiError> {
    let field: MetricField = parse_or_default(&req_id.0, query.field.as_deref())?;
    let subject = state
        .store
        .subject()
        .map_err(|e| map_dataset_error(req_id.0.clone(), e))?;
    let other = state
        .store
        .get(&id)
        .map_err(|e| map_dataset_error(req_id.0.clone(), e))?;
    let gap = gap_vs_record(subject, other, field)
        .map_err(|e| map_analytics_error(req_id.0.clone(), &e))?;
    Ok(respond(req_id.0, gap))
}

pub(super) async fn stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FieldQuery>,
) -> Result<Response, ApiError> {
    let field: MetricField = parse_or_default(&req_id.0, query.field.as_deref())?;
    let stats = summary_statistics(state.store.all(), field)
        .map_err(|e| map_analytics_error(req_id.0.clone(), &e))?;
    Ok(respond(req_id.0, stats))
}

pub(super) async fn benchmarks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    respond(req_id.0, state.store.benchmarks())
}

pub(super) async fn projection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProjectionQuery>,
) -> Result<Response, ApiError> {
    #[allow(clippy::cast_precision_loss)]
    let start_value = match query.start {
        Some(start) => start,
        None => {
            state
                .store
                .subject()
                .map_err(|e| map_dataset_error(req_id.0.clone(), e))?
                .instagram_followers() as f64
        }
    };
    let params = ProjectionParams {
        posts_per_period: query.posts.unwrap_or(DEFAULT_POSTS),
        short_form_posts_per_period: query.short_form.unwrap_or(DEFAULT_SHORT_FORM),
        platform_adoption_active: query.platform_adoption.unwrap_or(false),
    };

    let points = GrowthProjector::from_benchmarks(state.store.benchmarks())
        .project(
            start_value,
            query.horizon.unwrap_or(DEFAULT_HORIZON),
            &params,
        )
        .map_err(|e| map_analytics_error(req_id.0.clone(), &e))?;
    let total_growth = total_growth_percent(&points)
        .map_err(|e| map_analytics_error(req_id.0.clone(), &e))?;

    Ok(respond(
        req_id.0,
        ProjectionData {
            start_value,
            params,
            total_growth_percent: total_growth,
            points,
        },
    ))
}
