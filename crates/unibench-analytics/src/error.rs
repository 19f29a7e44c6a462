use thiserror::Error;
use unibench_core::DatasetError;

use crate::field::MetricField;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// A ratio or percentage was requested against a zero baseline.
    #[error("ratio undefined: {0} is zero")]
    DivisionUndefined(String),

    #[error("no comparator has a known {0}")]
    NoComparatorAvailable(MetricField),

    #[error("{field} is unknown for institution '{id}'")]
    UnknownValue { id: String, field: MetricField },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl AnalyticsError {
    /// `true` for failures that mean "not applicable" rather than a bad request.
    #[must_use]
    pub fn is_not_applicable(&self) -> bool {
        matches!(
            self,
            AnalyticsError::DivisionUndefined(_)
                | AnalyticsError::NoComparatorAvailable(_)
                | AnalyticsError::UnknownValue { .. }
        )
    }
}
