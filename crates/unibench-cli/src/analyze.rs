//! Comparative analysis handlers: `gap`, `rank`, `stats`, `benchmarks`.

use std::fmt::Write as _;

use unibench_analytics::{
    gap_report, gap_vs_record, rank, summary_statistics, GapReport, GapResult, MetricField,
    SummaryStatistics,
};
use unibench_core::{BenchmarkConstants, DatasetStore};

use crate::format::{fmt_count, fmt_percent, fmt_ratio, fmt_signed, print_json};

fn gap_line(label: &str, gap: Option<&GapResult>) -> String {
    match gap {
        Some(gap) => format!(
            "{label:<22}{:>14}{:>10}{:>12}",
            fmt_signed(gap.absolute_difference),
            fmt_ratio(gap.ratio),
            fmt_percent(gap.percentage_difference)
        ),
        None => format!("{label:<22}{:>14}", "N/A"),
    }
}

pub(crate) fn render_report(report: &GapReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}: {}  (rank {} of {})",
        report.subject.short_name,
        report.field,
        fmt_count(report.subject_value),
        report.rank.position,
        report.rank.total
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<22}{:>14}{:>10}{:>12}",
        "AGAINST", "DIFFERENCE", "RATIO", "PERCENT"
    );

    let average_label = report
        .average
        .map_or_else(|| "average".to_string(), |avg| format!("average ({avg:.0})"));
    let _ = writeln!(out, "{}", gap_line(&average_label, report.vs_average.as_ref()));

    let leader_label = report
        .vs_leader
        .as_ref()
        .map_or_else(|| "leader".to_string(), |c| format!("leader ({})", c.comparator.short_name));
    let _ = writeln!(
        out,
        "{}",
        gap_line(&leader_label, report.vs_leader.as_ref().map(|c| &c.gap))
    );

    let closest_label = report
        .closest
        .as_ref()
        .map_or_else(|| "closest".to_string(), |c| format!("closest ({})", c.comparator.short_name));
    let _ = writeln!(
        out,
        "{}",
        gap_line(&closest_label, report.closest.as_ref().map(|c| &c.gap))
    );

    let _ = writeln!(
        out,
        "\n{} comparator(s) run an active short-video account",
        report.comparators_with_short_video
    );
    out
}

/// Print the gap panel, or a single gap when `against` is given.
///
/// # Errors
///
/// Returns an error for an unknown field or id, or when the gap is undefined.
pub(crate) fn run_gap(
    store: &DatasetStore,
    field: &str,
    against: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let field: MetricField = field.parse()?;
    let subject = store.subject()?;

    if let Some(id) = against {
        let other = store.get(id)?;
        let gap = gap_vs_record(subject, other, field)?;
        if json {
            return print_json(&gap);
        }
        println!("{}", gap_line(&other.short_name, Some(&gap)));
        return Ok(());
    }

    let report = gap_report(subject, store.all(), field)?;
    if json {
        return print_json(&report);
    }
    print!("{}", render_report(&report));
    Ok(())
}

/// # Errors
///
/// Returns an error for an unknown field or when the subject's value is unknown.
pub(crate) fn run_rank(store: &DatasetStore, field: &str, json: bool) -> anyhow::Result<()> {
    let field: MetricField = field.parse()?;
    let subject = store.subject()?;
    let rank = rank(subject, store.all(), field)?;
    if json {
        return print_json(&rank);
    }
    println!(
        "{} ranks {} of {} by {field}",
        subject.short_name, rank.position, rank.total
    );
    Ok(())
}

pub(crate) fn render_stats(stats: &SummaryStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", stats.field);
    let _ = writeln!(out, "  {:<10}{:>14}", "known", stats.count);
    let _ = writeln!(out, "  {:<10}{:>14}", "total", fmt_count(stats.total));
    let _ = writeln!(out, "  {:<10}{:>14.1}", "mean", stats.mean);
    let _ = writeln!(out, "  {:<10}{:>14}", "max", fmt_count(stats.max));
    let _ = writeln!(out, "  {:<10}{:>14}", "min", fmt_count(stats.min));
    out
}

/// # Errors
///
/// Returns an error for an unknown field or when no record has a known value.
pub(crate) fn run_stats(store: &DatasetStore, field: &str, json: bool) -> anyhow::Result<()> {
    let field: MetricField = field.parse()?;
    let stats = summary_statistics(store.all(), field)?;
    if json {
        return print_json(&stats);
    }
    print!("{}", render_stats(&stats));
    Ok(())
}

pub(crate) fn render_benchmarks(b: &BenchmarkConstants) -> String {
    let mut out = String::new();
    let ig = &b.instagram;
    let _ = writeln!(out, "Instagram");
    let _ = writeln!(out, "  average engagement   {:.2}%", ig.average_engagement);
    let _ = writeln!(
        out,
        "  optimal posting      {}-{} per month ({:.2}%)",
        ig.optimal_posting.min, ig.optimal_posting.max, ig.optimal_posting.engagement_rate
    );
    let _ = writeln!(
        out,
        "  minimum effective    {}-{} per month ({:.2}%)",
        ig.minimum_effective.min, ig.minimum_effective.max, ig.minimum_effective.engagement_rate
    );
    let _ = writeln!(out, "  reels engagement     {:.2}%", ig.reels_engagement);
    let _ = writeln!(out, "  carousel engagement  {:.2}%", ig.carousel_engagement);
    if let Some(best_time) = &ig.best_time {
        let _ = writeln!(out, "  best time            {best_time}");
    }
    let _ = writeln!(out, "Facebook");
    let _ = writeln!(
        out,
        "  optimal engagement   {:.2}% at {} per week",
        b.facebook.optimal_engagement, b.facebook.posting_frequency
    );
    let _ = writeln!(out, "Twitter");
    let _ = writeln!(
        out,
        "  optimal engagement   {:.2}% at {} per week (industry {:.1}%)",
        b.twitter.optimal_engagement, b.twitter.posting_frequency, b.twitter.industry_average
    );
    let _ = writeln!(out, "LinkedIn");
    let _ = writeln!(
        out,
        "  optimal engagement   {:.2}% at {}-{} per week",
        b.linkedin.optimal_engagement,
        b.linkedin.posting_frequency.min,
        b.linkedin.posting_frequency.max
    );
    let _ = writeln!(out, "TikTok");
    let _ = writeln!(
        out,
        "  weekly growth        {:.2}%",
        b.tiktok.weekly_follower_growth
    );
    let _ = writeln!(
        out,
        "  engagement multiple  {:.1}x",
        b.tiktok.engagement_multiplier
    );
    out
}

/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub(crate) fn run_benchmarks(store: &DatasetStore, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(store.benchmarks());
    }
    print!("{}", render_benchmarks(store.benchmarks()));
    Ok(())
}
