//! Dataset model, loading, and runtime configuration for unibench.
//!
//! The dataset is a static YAML payload of institution snapshots plus
//! industry benchmark constants, with the research findings and
//! recommendations drawn from them. It is validated once at load and is
//! read-only afterwards.

pub mod app_config;
pub mod benchmarks;
pub mod config;
pub mod dataset;
pub mod institutions;
pub mod report;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use benchmarks::{
    BenchmarkConstants, FacebookBenchmarks, GrowthModel, InstagramBenchmarks, LinkedinBenchmarks,
    PostingBand, PostingRange, TiktokBenchmarks, TwitterBenchmarks,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{find_subject, DatasetFile, DatasetMetadata, DatasetStore};
pub use institutions::{InstagramAccount, InstitutionRecord, TiktokAccount};
pub use report::{
    FindingKind, FindingMetric, Impact, KeyFinding, MetricValue, NextPhase, PlatformGaps,
    Recommendation, RecommendationPriority, ResearchReport, Source, SourceKind,
};

/// Lookup and structural failures against the institution dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("institution '{0}' not found")]
    NotFound(String),

    #[error("no institution is flagged as the subject")]
    SubjectNotFound,

    #[error("dataset invariant violated: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read dataset file '{path}': {source}")]
    DatasetFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset file: {0}")]
    DatasetFileParse(#[source] serde_yaml::Error),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
