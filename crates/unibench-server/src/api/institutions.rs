use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension,
};
use serde::{Deserialize, Serialize};
use unibench_analytics::{
    competitor_profile, filter, select_for_comparison, sort, PlatformFilter, SortKey,
};
use unibench_core::InstitutionRecord;

use crate::middleware::RequestId;

use super::{map_dataset_error, parse_or_default, respond, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct InstitutionsQuery {
    pub search: Option<String>,
    pub platform: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompareQuery {
    /// Comma-separated ids already in the comparison.
    pub selected: Option<String>,
    pub toggle: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ComparisonData<'a> {
    selected: Vec<&'a InstitutionRecord>,
    capacity: usize,
    full: bool,
}

pub(super) async fn list_institutions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<InstitutionsQuery>,
) -> Result<Response, ApiError> {
    let platform: PlatformFilter = parse_or_default(&req_id.0, query.platform.as_deref())?;
    let sort_key: SortKey = parse_or_default(&req_id.0, query.sort.as_deref())?;
    let search = query.search.as_deref().unwrap_or_default();

    let filtered = filter(state.store.all(), search, platform);
    let data = sort(filtered, sort_key);
    tracing::debug!(search, ?platform, ?sort_key, matches = data.len(), "institutions query");

    Ok(respond(req_id.0, data))
}

pub(super) async fn get_institution(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = state
        .store
        .get(&id)
        .map_err(|e| map_dataset_error(req_id.0.clone(), e))?;
    Ok(respond(req_id.0, record))
}

pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let subject = state
        .store
        .subject()
        .map_err(|e| map_dataset_error(req_id.0.clone(), e))?;
    let record = state
        .store
        .get(&id)
        .map_err(|e| map_dataset_error(req_id.0.clone(), e))?;
    Ok(respond(req_id.0, competitor_profile(subject, record)))
}

/// Rebuild the selection from `selected`, then toggle `toggle` into it.
pub(super) async fn compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CompareQuery>,
) -> Result<Response, ApiError> {
    let capacity = state.compare_capacity;
    let lookup = |id: &str| {
        state
            .store
            .get(id)
            .map_err(|e| map_dataset_error(req_id.0.clone(), e))
    };

    let mut selection: Vec<&InstitutionRecord> = Vec::new();
    for id in query
        .selected
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        let record = lookup(id)?;
        if !selection.iter().any(|r| r.id == record.id) {
            selection = select_for_comparison(&selection, record, capacity);
        }
    }

    if let Some(id) = query.toggle.as_deref().filter(|id| !id.trim().is_empty()) {
        selection = select_for_comparison(&selection, lookup(id.trim())?, capacity);
    }

    let full = selection.len() >= capacity;
    Ok(respond(
        req_id.0,
        ComparisonData {
            selected: selection,
            capacity,
            full,
        },
    ))
}
