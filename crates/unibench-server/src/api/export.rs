use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use unibench_analytics::{
    to_delimited_text, ExportColumn, CSV_CONTENT_TYPE, DEFAULT_EXPORT_COLUMNS,
};

use crate::middleware::RequestId;

use super::{map_analytics_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ExportQuery {
    /// Comma-separated column names; the standard research layout when absent.
    pub columns: Option<String>,
}

pub(super) async fn export_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let columns = match query.columns.as_deref() {
        Some(list) => ExportColumn::parse_list(list)
            .map_err(|e| map_analytics_error(req_id.0.clone(), &e))?,
        None => DEFAULT_EXPORT_COLUMNS.to_vec(),
    };
    let text = to_delimited_text(state.store.all(), &columns)
        .map_err(|e| map_analytics_error(req_id.0.clone(), &e))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.store.export_file_name()
    );
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text,
    )
        .into_response())
}
