//! Dataset exploration handlers: `list`, `show`, `export`, `compare`.

use std::fmt::Write as _;
use std::path::Path;

use unibench_analytics::{
    competitor_profile, filter, select_for_comparison, sort, to_delimited_text,
    CompetitorProfile, ExportColumn, PlatformFilter, SortKey, DEFAULT_EXPORT_COLUMNS,
};
use unibench_core::{DatasetStore, InstitutionRecord};

use crate::format::{fmt_count, fmt_optional, fmt_percent, fmt_ratio, fmt_signed, print_json};

fn tiktok_status(record: &InstitutionRecord) -> &'static str {
    if record.tiktok_active() {
        "active"
    } else {
        "inactive"
    }
}

pub(crate) fn render_table(records: &[&InstitutionRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}{:<32}{:>12}{:>10}{:>10}{:>12}",
        "ID", "NAME", "IG FOLLOW", "IG POSTS", "TIKTOK", "TT FOLLOW"
    );
    for record in records {
        let marker = if record.is_subject() { "*" } else { "" };
        let _ = writeln!(
            out,
            "{:<10}{:<32}{:>12}{:>10}{:>10}{:>12}",
            format!("{}{marker}", record.id),
            record.display_name,
            fmt_count(record.instagram_followers()),
            fmt_optional(record.instagram_posts()),
            tiktok_status(record),
            fmt_optional(record.tiktok_followers()),
        );
    }
    out
}

/// List institutions after applying search, platform filter, and ordering.
///
/// # Errors
///
/// Returns an error if the platform filter or sort key is not recognised.
pub(crate) fn run_list(
    store: &DatasetStore,
    search: &str,
    platform: &str,
    sort_key: &str,
    json: bool,
) -> anyhow::Result<()> {
    let platform: PlatformFilter = platform.parse()?;
    let sort_key: SortKey = sort_key.parse()?;

    let filtered = filter(store.all(), search, platform);
    let sorted = sort(filtered, sort_key);

    if json {
        return print_json(&sorted);
    }
    if sorted.is_empty() {
        println!("No institutions match the current filters.");
        return Ok(());
    }
    print!("{}", render_table(&sorted));
    println!("\n{} of {} institutions", sorted.len(), store.all().len());
    Ok(())
}

pub(crate) fn render_profile(profile: &CompetitorProfile<'_>) -> String {
    let record = profile.institution;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", record.display_name, record.short_name);
    if let Some(handle) = &record.instagram.handle {
        let _ = writeln!(out, "  Instagram:  {handle}");
    }
    let _ = writeln!(
        out,
        "  Followers:  {}",
        fmt_count(record.instagram_followers())
    );
    let _ = writeln!(out, "  Posts:      {}", fmt_optional(record.instagram_posts()));
    let _ = writeln!(
        out,
        "  TikTok:     {} ({})",
        tiktok_status(record),
        fmt_optional(record.tiktok_followers())
    );
    if let Some(note) = &record.note {
        let _ = writeln!(out, "  Note:       {note}");
    }

    if record.is_subject() {
        return out;
    }

    let _ = writeln!(out, "\nVersus subject");
    match &profile.followers_gap {
        Some(gap) => {
            let _ = writeln!(
                out,
                "  Followers:  {} ({}, {})",
                fmt_signed(gap.absolute_difference),
                fmt_ratio(gap.ratio),
                fmt_percent(gap.percentage_difference)
            );
        }
        None => {
            let _ = writeln!(out, "  Followers:  N/A");
        }
    }
    match &profile.posts_gap {
        Some(gap) => {
            let _ = writeln!(
                out,
                "  Posts:      {} ({})",
                fmt_signed(gap.absolute_difference),
                fmt_ratio(gap.ratio)
            );
        }
        None => {
            let _ = writeln!(out, "  Posts:      N/A");
        }
    }
    let _ = writeln!(
        out,
        "  Radar:      reach {:.0} / {:.0}, content {:.0} / {:.0}, short video {:.0} / {:.0}",
        profile.radar.reach,
        profile.subject_radar.reach,
        profile.radar.content,
        profile.subject_radar.content,
        profile.radar.short_video,
        profile.subject_radar.short_video,
    );
    out
}

/// Show one institution with its head-to-head profile against the subject.
///
/// # Errors
///
/// Returns an error if the id is unknown or the dataset has no subject.
pub(crate) fn run_show(store: &DatasetStore, id: &str, json: bool) -> anyhow::Result<()> {
    let subject = store.subject()?;
    let record = store.get(id)?;
    let profile = competitor_profile(subject, record);

    if json {
        return print_json(&profile);
    }
    print!("{}", render_profile(&profile));
    Ok(())
}

/// Export the dataset; a directory `output` receives the default file name.
///
/// # Errors
///
/// Returns an error for an unknown column or if the file cannot be written.
pub(crate) fn run_export(
    store: &DatasetStore,
    columns: Option<&str>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let columns = match columns {
        Some(list) => ExportColumn::parse_list(list)?,
        None => DEFAULT_EXPORT_COLUMNS.to_vec(),
    };
    let text = to_delimited_text(store.all(), &columns)?;

    let Some(output) = output else {
        print!("{text}");
        return Ok(());
    };

    let path = if output.is_dir() {
        output.join(store.export_file_name())
    } else {
        output.to_path_buf()
    };
    std::fs::write(&path, text)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), rows = store.all().len(), "export written");
    println!("wrote {}", path.display());
    Ok(())
}

/// Toggle each id into a comparison selection in order.
///
/// # Errors
///
/// Returns an error if any id is unknown.
pub(crate) fn build_selection<'a>(
    store: &'a DatasetStore,
    ids: &[String],
    capacity: usize,
) -> anyhow::Result<Vec<&'a InstitutionRecord>> {
    let mut selection: Vec<&InstitutionRecord> = Vec::new();
    for id in ids {
        let record = store.get(id)?;
        let next = select_for_comparison(&selection, record, capacity);
        if next.len() == selection.len() && !selection.iter().any(|r| r.id == record.id) {
            tracing::warn!(id = %record.id, capacity, "comparison is full; skipping");
        }
        selection = next;
    }
    Ok(selection)
}

/// Print a side-by-side comparison of the selected institutions.
///
/// # Errors
///
/// Returns an error if any id is unknown.
pub(crate) fn run_compare(
    store: &DatasetStore,
    ids: &[String],
    capacity: usize,
    json: bool,
) -> anyhow::Result<()> {
    let selection = build_selection(store, ids, capacity)?;
    if json {
        return print_json(&selection);
    }
    if selection.is_empty() {
        println!("Nothing selected.");
        return Ok(());
    }
    print!("{}", render_table(&selection));
    Ok(())
}
