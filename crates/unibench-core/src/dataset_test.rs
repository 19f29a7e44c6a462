use std::path::Path;

use super::*;
use crate::report::{FindingKind, MetricValue, RecommendationPriority};
use crate::benchmarks::sample_benchmarks;
use crate::institutions::sample_record;

fn metadata(name: &str) -> DatasetMetadata {
    DatasetMetadata {
        name: name.to_string(),
        title: None,
        date: None,
        researcher: None,
        client: None,
        phase: None,
        status: None,
    }
}

fn subject_record(id: &str, followers: u64) -> InstitutionRecord {
    let mut record = sample_record(id, followers);
    record.subject = true;
    record
}

fn shipped_dataset_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("dataset.yaml")
}

#[test]
fn new_accepts_single_subject() {
    let store = DatasetStore::new(
        metadata("demo"),
        vec![subject_record("yu", 15_000), sample_record("nyu", 593_000)],
        sample_benchmarks(),
    )
    .unwrap();
    assert_eq!(store.all().len(), 2);
    assert_eq!(store.subject().unwrap().id, "yu");
}

#[test]
fn new_rejects_missing_subject() {
    let err = DatasetStore::new(
        metadata("demo"),
        vec![sample_record("yu", 1), sample_record("nyu", 2)],
        sample_benchmarks(),
    )
    .unwrap_err();
    assert!(matches!(err, DatasetError::InvariantViolation(ref m) if m.contains("found none")));
}

#[test]
fn new_rejects_multiple_subjects() {
    let err = DatasetStore::new(
        metadata("demo"),
        vec![subject_record("yu", 1), subject_record("nyu", 2)],
        sample_benchmarks(),
    )
    .unwrap_err();
    assert!(matches!(err, DatasetError::InvariantViolation(ref m) if m.contains("'nyu'")));
}

#[test]
fn new_rejects_unsafe_dataset_name() {
    let err = DatasetStore::new(
        metadata("../etc"),
        vec![subject_record("yu", 1)],
        sample_benchmarks(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("metadata.name"));
}

#[test]
fn find_subject_reports_not_found() {
    let records = vec![sample_record("yu", 1)];
    assert_eq!(
        find_subject(&records).unwrap_err(),
        DatasetError::SubjectNotFound
    );
}

#[test]
fn find_subject_reports_duplicates_as_invariant_violation() {
    let records = vec![subject_record("yu", 1), subject_record("nyu", 2)];
    assert!(matches!(
        find_subject(&records),
        Err(DatasetError::InvariantViolation(_))
    ));
}

#[test]
fn get_is_case_insensitive_and_reports_missing_id() {
    let store = DatasetStore::new(
        metadata("demo"),
        vec![subject_record("yu", 1), sample_record("nyu", 2)],
        sample_benchmarks(),
    )
    .unwrap();
    assert_eq!(store.get("NYU").unwrap().id, "nyu");
    assert_eq!(
        store.get("mit").unwrap_err(),
        DatasetError::NotFound("mit".to_string())
    );
}

#[test]
fn all_preserves_insertion_order() {
    let store = DatasetStore::new(
        metadata("demo"),
        vec![
            sample_record("c", 3),
            subject_record("a", 1),
            sample_record("b", 2),
        ],
        sample_benchmarks(),
    )
    .unwrap();
    let ids: Vec<&str> = store.all().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
}

#[test]
fn export_file_name_uses_dataset_name() {
    let store = DatasetStore::new(
        metadata("yu-research"),
        vec![subject_record("yu", 1)],
        sample_benchmarks(),
    )
    .unwrap();
    assert_eq!(store.export_file_name(), "yu-research-export.csv");
}

#[test]
fn from_yaml_str_reports_parse_errors() {
    let err = DatasetStore::from_yaml_str("institutions: [").unwrap_err();
    assert!(matches!(err, ConfigError::DatasetFileParse(_)));
}

#[test]
fn load_reports_missing_file() {
    let err = DatasetStore::load(Path::new("/nonexistent/dataset.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::DatasetFileIo { .. }));
}

#[test]
fn load_shipped_dataset() {
    let path = shipped_dataset_path();
    assert!(path.exists(), "dataset.yaml missing at {path:?}");
    let store = DatasetStore::load(&path).expect("shipped dataset should load");

    assert_eq!(store.all().len(), 6);
    assert_eq!(store.subject().unwrap().id, "yu");
    assert_eq!(store.metadata().name, "yu-research");
    assert_eq!(
        store.metadata().date,
        NaiveDate::from_ymd_opt(2025, 10, 9)
    );

    let columbia = store.get("columbia").unwrap();
    assert_eq!(columbia.instagram_posts(), None);
    assert_eq!(columbia.tiktok_followers(), Some(0));

    let benchmarks = store.benchmarks();
    assert_eq!(benchmarks.instagram.optimal_posting.min, 8);
    assert_eq!(benchmarks.growth_model.sub_periods_per_period, 4);

    assert_eq!(store.findings().len(), 4);
    assert_eq!(store.findings()[0].kind, FindingKind::Critical);
    assert_eq!(
        store.findings()[2].metric.as_ref().map(|m| &m.current),
        Some(&MetricValue::Text("TBD".to_string()))
    );
    assert_eq!(store.recommendations().len(), 4);
    assert_eq!(
        store.recommendations()[0].priority,
        RecommendationPriority::Immediate
    );
    let report = store.report();
    assert_eq!(report.sources.len(), 6);
    assert_eq!(report.platform_gaps.as_ref().map(|g| g.recommended), Some(6));
    assert_eq!(
        report.next_phase.as_ref().map(|p| p.timeline.as_str()),
        Some("2-3 weeks")
    );
}

#[test]
fn report_section_is_optional() {
    let store = DatasetStore::new(
        metadata("demo"),
        vec![subject_record("yu", 15_000)],
        sample_benchmarks(),
    )
    .unwrap();
    assert!(store.findings().is_empty());
    assert!(store.recommendations().is_empty());
}

#[test]
fn load_rejects_invalid_report() {
    let path = shipped_dataset_path();
    let content = std::fs::read_to_string(&path).unwrap();
    let duplicated = content.replacen("    - id: 2\n      priority: immediate", "    - id: 1\n      priority: immediate", 1);
    assert_ne!(content, duplicated);

    let err = DatasetStore::from_yaml_str(&duplicated).unwrap_err();
    assert!(err.to_string().contains("duplicate recommendation id 1"));
}

#[test]
fn load_rejects_unknown_recommendation_priority() {
    let content = std::fs::read_to_string(shipped_dataset_path()).unwrap();
    let bad = content.replacen("priority: medium", "priority: someday", 1);
    assert_ne!(content, bad);
    assert!(matches!(
        DatasetStore::from_yaml_str(&bad),
        Err(ConfigError::DatasetFileParse(_))
    ));
}

#[test]
fn store_metadata_serializes() {
    let json = serde_json::to_string(&metadata("demo")).unwrap();
    assert!(json.contains("\"name\":\"demo\""));
}
