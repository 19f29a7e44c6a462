use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::benchmarks::BenchmarkConstants;
use crate::institutions::{validate_institutions, InstitutionRecord};
use crate::report::{KeyFinding, Recommendation, ResearchReport};
use crate::{ConfigError, DatasetError};

/// Descriptive header of a research dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// File-name-safe dataset key, e.g. `"yu-research"`.
    pub name: String,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub researcher: Option<String>,
    pub client: Option<String>,
    pub phase: Option<String>,
    pub status: Option<String>,
}

/// On-disk shape of the dataset file.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetFile {
    pub metadata: DatasetMetadata,
    pub institutions: Vec<InstitutionRecord>,
    pub benchmarks: BenchmarkConstants,
    #[serde(default)]
    pub report: ResearchReport,
}

/// Immutable, validated view over the institution records and benchmarks.
///
/// Construction is the only place validation happens; every accessor is a
/// plain read, so a store can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    metadata: DatasetMetadata,
    records: Vec<InstitutionRecord>,
    benchmarks: BenchmarkConstants,
    report: ResearchReport,
}

impl DatasetStore {
    /// Load and validate a dataset from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DatasetFileIo {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate a dataset from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text cannot be parsed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: DatasetFile =
            serde_yaml::from_str(content).map_err(ConfigError::DatasetFileParse)?;
        Self::from_file(file).map_err(ConfigError::from)
    }

    /// Validate an already-parsed dataset file.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::InvariantViolation` if the payload breaks a structural rule.
    pub fn from_file(file: DatasetFile) -> Result<Self, DatasetError> {
        Self::new(file.metadata, file.institutions, file.benchmarks)?.with_report(file.report)
    }

    /// Build a store from in-memory parts.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::InvariantViolation` when the dataset has zero or
    /// several subjects, malformed or duplicate ids, blank names, or
    /// out-of-range benchmark values.
    pub fn new(
        metadata: DatasetMetadata,
        records: Vec<InstitutionRecord>,
        benchmarks: BenchmarkConstants,
    ) -> Result<Self, DatasetError> {
        validate_metadata(&metadata)?;
        validate_institutions(&records)?;
        match find_subject(&records) {
            Ok(_) => {}
            Err(DatasetError::SubjectNotFound) => {
                return Err(DatasetError::InvariantViolation(
                    "exactly one institution must be flagged as subject; found none".to_string(),
                ));
            }
            Err(e) => return Err(e),
        }
        benchmarks.validate()?;

        Ok(Self {
            metadata,
            records,
            benchmarks,
            report: ResearchReport::default(),
        })
    }

    /// Attach the narrative research report.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::InvariantViolation` for duplicate finding or
    /// recommendation ids, blank titles or actions, or sources without an
    /// http(s) url.
    pub fn with_report(mut self, report: ResearchReport) -> Result<Self, DatasetError> {
        report.validate()?;
        self.report = report;
        Ok(self)
    }

    /// All records in dataset order.
    #[must_use]
    pub fn all(&self) -> &[InstitutionRecord] {
        &self.records
    }

    /// The institution being benchmarked.
    ///
    /// # Errors
    ///
    /// Returns `SubjectNotFound` or `InvariantViolation`; neither can happen
    /// for a store built through [`DatasetStore::new`].
    pub fn subject(&self) -> Result<&InstitutionRecord, DatasetError> {
        find_subject(&self.records)
    }

    /// Look up a record by id (ASCII case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::NotFound` if no record has that id.
    pub fn get(&self, id: &str) -> Result<&InstitutionRecord, DatasetError> {
        self.records
            .iter()
            .find(|r| r.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| DatasetError::NotFound(id.to_string()))
    }

    #[must_use]
    pub fn benchmarks(&self) -> &BenchmarkConstants {
        &self.benchmarks
    }

    #[must_use]
    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn report(&self) -> &ResearchReport {
        &self.report
    }

    #[must_use]
    pub fn findings(&self) -> &[KeyFinding] {
        &self.report.key_findings
    }

    #[must_use]
    pub fn recommendations(&self) -> &[Recommendation] {
        &self.report.recommendations
    }

    /// Download name for the delimited export, e.g. `yu-research-export.csv`.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        format!("{}-export.csv", self.metadata.name)
    }
}

/// Find the single record flagged as subject.
///
/// # Errors
///
/// Returns `SubjectNotFound` when no record is flagged and
/// `InvariantViolation` when more than one is.
pub fn find_subject(records: &[InstitutionRecord]) -> Result<&InstitutionRecord, DatasetError> {
    let mut subjects = records.iter().filter(|r| r.is_subject());
    let first = subjects.next().ok_or(DatasetError::SubjectNotFound)?;
    let extra: Vec<&str> = subjects.map(|r| r.id.as_str()).collect();
    if !extra.is_empty() {
        return Err(DatasetError::InvariantViolation(format!(
            "exactly one institution must be flagged as subject; found '{}' and {}",
            first.id,
            extra
                .iter()
                .map(|id| format!("'{id}'"))
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    Ok(first)
}

fn validate_metadata(metadata: &DatasetMetadata) -> Result<(), DatasetError> {
    let name = metadata.name.as_str();
    let file_safe = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !file_safe {
        return Err(DatasetError::InvariantViolation(format!(
            "metadata.name '{name}' must be non-empty and contain only ascii letters, digits, '-' or '_'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
