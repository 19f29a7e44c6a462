//! Comma-delimited export of institution records.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unibench_core::InstitutionRecord;

use crate::AnalyticsError;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Rendered in place of an unknown value.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportColumn {
    Id,
    Name,
    ShortName,
    InstagramHandle,
    InstagramFollowers,
    InstagramPosts,
    TiktokStatus,
    TiktokFollowers,
}

/// Columns of the standard research export.
pub const DEFAULT_EXPORT_COLUMNS: [ExportColumn; 5] = [
    ExportColumn::Name,
    ExportColumn::InstagramFollowers,
    ExportColumn::InstagramPosts,
    ExportColumn::TiktokStatus,
    ExportColumn::TiktokFollowers,
];

impl ExportColumn {
    pub const ALL: [ExportColumn; 8] = [
        ExportColumn::Id,
        ExportColumn::Name,
        ExportColumn::ShortName,
        ExportColumn::InstagramHandle,
        ExportColumn::InstagramFollowers,
        ExportColumn::InstagramPosts,
        ExportColumn::TiktokStatus,
        ExportColumn::TiktokFollowers,
    ];

    /// Header label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ExportColumn::Id => "ID",
            ExportColumn::Name => "University",
            ExportColumn::ShortName => "Short Name",
            ExportColumn::InstagramHandle => "Instagram Handle",
            ExportColumn::InstagramFollowers => "Instagram Followers",
            ExportColumn::InstagramPosts => "Instagram Posts",
            ExportColumn::TiktokStatus => "TikTok Status",
            ExportColumn::TiktokFollowers => "TikTok Followers",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExportColumn::Id => "id",
            ExportColumn::Name => "name",
            ExportColumn::ShortName => "short-name",
            ExportColumn::InstagramHandle => "instagram-handle",
            ExportColumn::InstagramFollowers => "instagram-followers",
            ExportColumn::InstagramPosts => "instagram-posts",
            ExportColumn::TiktokStatus => "tiktok-status",
            ExportColumn::TiktokFollowers => "tiktok-followers",
        }
    }

    /// Cell text for `record`; unknown values render as [`NOT_AVAILABLE`].
    #[must_use]
    pub fn value(self, record: &InstitutionRecord) -> String {
        fn known<T: ToString>(value: Option<T>) -> String {
            value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
        }

        match self {
            ExportColumn::Id => record.id.clone(),
            ExportColumn::Name => record.display_name.clone(),
            ExportColumn::ShortName => record.short_name.clone(),
            ExportColumn::InstagramHandle => known(record.instagram.handle.as_deref()),
            ExportColumn::InstagramFollowers => record.instagram_followers().to_string(),
            ExportColumn::InstagramPosts => known(record.instagram_posts()),
            ExportColumn::TiktokStatus => {
                if record.tiktok_active() {
                    "Active".to_string()
                } else {
                    "Inactive".to_string()
                }
            }
            ExportColumn::TiktokFollowers => known(record.tiktok_followers()),
        }
    }

    /// Parse a comma-separated list such as `"name,instagram-followers"`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an unknown or empty column list.
    pub fn parse_list(s: &str) -> Result<Vec<ExportColumn>, AnalyticsError> {
        let columns = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<ExportColumn>)
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(AnalyticsError::InvalidParameter(
                "column list is empty".to_string(),
            ));
        }
        Ok(columns)
    }
}

impl FromStr for ExportColumn {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ExportColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == needle)
            .ok_or_else(|| AnalyticsError::InvalidParameter(format!("unknown export column '{s}'")))
    }
}

/// Header row plus one row per record, LF-terminated.
///
/// Fields containing a comma, quote, or line break are quoted with internal
/// quotes doubled.
///
/// # Errors
///
/// Returns `InvalidParameter` for an empty column list and `Export` if the
/// writer fails.
pub fn to_delimited_text<'a, I>(
    records: I,
    columns: &[ExportColumn],
) -> Result<String, AnalyticsError>
where
    I: IntoIterator<Item = &'a InstitutionRecord>,
{
    if columns.is_empty() {
        return Err(AnalyticsError::InvalidParameter(
            "at least one export column is required".to_string(),
        ));
    }

    let export_err = |e: csv::Error| AnalyticsError::Export(e.to_string());

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|c| c.label()))
        .map_err(export_err)?;
    let mut rows = 0_usize;
    for record in records {
        writer
            .write_record(columns.iter().map(|c| c.value(record)))
            .map_err(export_err)?;
        rows += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AnalyticsError::Export(e.error().to_string()))?;
    tracing::debug!(rows, columns = columns.len(), "rendered delimited export");

    String::from_utf8(bytes).map_err(|e| AnalyticsError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, universities};

    #[test]
    fn default_export_matches_research_layout() {
        let records = universities();
        let text = to_delimited_text(&records, &DEFAULT_EXPORT_COLUMNS).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "University,Instagram Followers,Instagram Posts,TikTok Status,TikTok Followers"
        );
        assert_eq!(lines[1], "Yeshiva University,15000,2260,Inactive,0");
        assert_eq!(lines[2], "New York University,593000,2613,Active,112400");
        assert_eq!(lines[3], "Columbia University,457000,N/A,Inactive,0");
        assert_eq!(lines[4], "Rutgers University,124000,N/A,Active,N/A");
        assert_eq!(lines.len(), 7);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn fields_with_delimiter_or_quote_are_escaped() {
        let records = vec![
            record("a", "Alpha, Inc.", 1),
            record("b", "The \"Beta\" School", 2),
        ];
        let text =
            to_delimited_text(&records, &[ExportColumn::Name, ExportColumn::InstagramFollowers])
                .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "\"Alpha, Inc.\",1");
        assert_eq!(lines[2], "\"The \"\"Beta\"\" School\",2");
    }

    #[test]
    fn empty_column_list_is_rejected() {
        let records = universities();
        assert!(matches!(
            to_delimited_text(&records, &[]),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn no_records_yields_header_only() {
        let text = to_delimited_text(std::iter::empty(), &[ExportColumn::Id]).unwrap();
        assert_eq!(text, "ID\n");
    }

    #[test]
    fn parse_list_accepts_known_columns() {
        let columns = ExportColumn::parse_list("id, name,tiktok-status").unwrap();
        assert_eq!(
            columns,
            [ExportColumn::Id, ExportColumn::Name, ExportColumn::TiktokStatus]
        );
        assert!(ExportColumn::parse_list("id,likes").is_err());
        assert!(ExportColumn::parse_list(" , ").is_err());
    }

    #[test]
    fn unknown_handle_renders_sentinel() {
        let mut r = record("a", "Alpha", 1);
        r.instagram.handle = None;
        assert_eq!(ExportColumn::InstagramHandle.value(&r), NOT_AVAILABLE);
    }
}
