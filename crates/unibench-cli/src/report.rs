//! Research report handlers: `findings` and `recommendations`.

use std::fmt::Write as _;

use unibench_core::{
    DatasetStore, KeyFinding, MetricValue, Recommendation, RecommendationPriority, ResearchReport,
};

use crate::format::{fmt_count, print_json};

fn fmt_metric(value: &MetricValue) -> String {
    match value {
        MetricValue::Count(n) => fmt_count(*n),
        MetricValue::Text(text) => text.clone(),
    }
}

pub(crate) fn render_findings(findings: &[&KeyFinding]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4}{:<13}{:<8}{:<40}{:>10}{:>14}  {}",
        "P", "TYPE", "IMPACT", "TITLE", "CURRENT", "TARGET", "TIMEFRAME"
    );
    for finding in findings {
        let (current, target, timeframe) = finding.metric.as_ref().map_or_else(
            || ("N/A".to_string(), "N/A".to_string(), String::new()),
            |m| (fmt_metric(&m.current), fmt_metric(&m.target), m.timeframe.clone()),
        );
        let _ = writeln!(
            out,
            "{:<4}{:<13}{:<8}{:<40}{:>10}{:>14}  {}",
            finding.priority,
            finding.kind,
            finding.impact,
            finding.title,
            current,
            target,
            timeframe,
        );
    }
    out
}

/// Print key findings, most urgent first.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub(crate) fn run_findings(store: &DatasetStore, json: bool) -> anyhow::Result<()> {
    let findings = store.report().findings_by_priority();
    if json {
        return print_json(&findings);
    }
    if findings.is_empty() {
        println!("The dataset carries no key findings.");
        return Ok(());
    }
    print!("{}", render_findings(&findings));
    Ok(())
}

pub(crate) fn render_recommendations(recommendations: &[&Recommendation]) -> String {
    let mut out = String::new();
    for rec in recommendations {
        let _ = writeln!(out, "[{}] {} ({})", rec.priority, rec.action, rec.category);
        let _ = writeln!(out, "  {}", rec.rationale);
        for step in &rec.implementation {
            let _ = writeln!(out, "  - {step}");
        }
        let resources = rec.resources.as_deref().unwrap_or("N/A");
        let _ = writeln!(
            out,
            "  impact: {}  timeframe: {}  resources: {resources}",
            rec.expected_impact, rec.timeframe
        );
        let _ = writeln!(out);
    }
    out
}

fn render_next_phase(report: &ResearchReport) -> String {
    let mut out = String::new();
    if let Some(next) = &report.next_phase {
        let _ = writeln!(out, "Next phase: {} ({})", next.deliverable, next.timeline);
        for task in &next.tasks {
            let _ = writeln!(out, "  - {task}");
        }
    }
    out
}

/// Print recommendations at or above `priority`, most urgent first.
///
/// # Errors
///
/// Returns an error for an unknown priority name.
pub(crate) fn run_recommendations(
    store: &DatasetStore,
    priority: &str,
    json: bool,
) -> anyhow::Result<()> {
    let priority: RecommendationPriority = priority.parse()?;
    let recommendations = store.report().recommendations_at_least(priority);
    if json {
        return print_json(&recommendations);
    }
    if recommendations.is_empty() {
        println!("No recommendations at priority {priority} or above.");
        return Ok(());
    }
    print!("{}", render_recommendations(&recommendations));
    print!("{}", render_next_phase(store.report()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn store() -> DatasetStore {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/dataset.yaml");
        DatasetStore::load(&path).expect("shipped dataset should load")
    }

    #[test]
    fn findings_table_lists_metrics() {
        let store = store();
        let findings = store.report().findings_by_priority();
        let text = render_findings(&findings);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("1   critical"));
        assert!(lines[1].contains("15,000"));
        assert!(lines[1].contains("25,000"));
        assert!(text.contains("2-3 per week"));
    }

    #[test]
    fn immediate_recommendations_only() {
        let store = store();
        let recs = store
            .report()
            .recommendations_at_least(RecommendationPriority::Immediate);
        let text = render_recommendations(&recs);
        assert!(text.contains("[immediate] Establish TikTok Presence (Platform Expansion)"));
        assert!(text.contains("  - Post 3-5 videos per week initially"));
        assert!(!text.contains("Study NYU and Brandeis Strategies"));
    }

    #[test]
    fn next_phase_lists_tasks() {
        let store = store();
        let text = render_next_phase(store.report());
        assert!(text.starts_with("Next phase: Phase 2 - Detailed Analysis Report (2-3 weeks)"));
        assert_eq!(text.lines().count(), 7);
    }
}
