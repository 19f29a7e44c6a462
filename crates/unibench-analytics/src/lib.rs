//! Comparative analytics, growth projection, and dataset exploration over a
//! [`unibench_core::DatasetStore`].
//!
//! Every operation is a pure function of its inputs: nothing here holds
//! state, performs I/O, or mutates the records it is given.

pub mod error;
pub mod explorer;
pub mod export;
pub mod field;
pub mod gap;
pub mod profile;
pub mod projection;

#[cfg(test)]
mod test_support;

pub use error::AnalyticsError;
pub use explorer::{
    filter, select_for_comparison, sort, PlatformFilter, SortKey, DEFAULT_COMPARE_CAPACITY,
};
pub use export::{to_delimited_text, ExportColumn, CSV_CONTENT_TYPE, DEFAULT_EXPORT_COLUMNS};
pub use field::MetricField;
pub use gap::{
    closest_comparator, gap_report, gap_vs_average, gap_vs_leader, gap_vs_record, rank,
    summary_statistics, Comparison, GapReport, GapResult, Rank, SummaryStatistics,
};
pub use profile::{competitor_profile, CompetitorProfile, RadarScores};
pub use projection::{
    total_growth_percent, GrowthProjector, ProjectionParams, ProjectionPoint,
    MAX_HORIZON_PERIODS,
};

#[allow(clippy::cast_precision_loss)]
pub(crate) fn as_f64(value: u64) -> f64 {
    value as f64
}
