//! Search, platform filtering, ordering, and comparison selection.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unibench_core::InstitutionRecord;

use crate::AnalyticsError;

/// Side-by-side comparison holds at most this many institutions by default.
pub const DEFAULT_COMPARE_CAPACITY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformFilter {
    #[default]
    Any,
    /// Instagram follower count above zero.
    HasInstagram,
    /// Active short-video account.
    HasTiktok,
}

impl PlatformFilter {
    #[must_use]
    pub fn matches(self, record: &InstitutionRecord) -> bool {
        match self {
            PlatformFilter::Any => true,
            PlatformFilter::HasInstagram => record.instagram_followers() > 0,
            PlatformFilter::HasTiktok => record.tiktok_active(),
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "all" => Ok(PlatformFilter::Any),
            "instagram" | "has-instagram" => Ok(PlatformFilter::HasInstagram),
            "tiktok" | "has-tiktok" => Ok(PlatformFilter::HasTiktok),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "unknown platform filter '{other}'; expected any, instagram, or tiktok"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    FollowersDescending,
    NameAscending,
}

impl FromStr for SortKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "followers" | "followers-descending" => Ok(SortKey::FollowersDescending),
            "name" | "name-ascending" => Ok(SortKey::NameAscending),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "unknown sort key '{other}'; expected followers or name"
            ))),
        }
    }
}

/// Records whose name contains `search_text` (case-insensitive) and that
/// satisfy `platform`, in input order. Whitespace in `search_text` is part of
/// the needle.
pub fn filter<'a, I>(records: I, search_text: &str, platform: PlatformFilter) -> Vec<&'a InstitutionRecord>
where
    I: IntoIterator<Item = &'a InstitutionRecord>,
{
    let needle = search_text.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.matches_name(&needle) && platform.matches(r))
        .collect()
}

/// Stable sort; equal keys keep their input order.
pub fn sort<'a, I>(records: I, key: SortKey) -> Vec<&'a InstitutionRecord>
where
    I: IntoIterator<Item = &'a InstitutionRecord>,
{
    let mut sorted: Vec<&InstitutionRecord> = records.into_iter().collect();
    match key {
        SortKey::FollowersDescending => {
            sorted.sort_by(|a, b| b.instagram_followers().cmp(&a.instagram_followers()));
        }
        SortKey::NameAscending => {
            sorted.sort_by(|a, b| compare_names(&a.display_name, &b.display_name));
        }
    }
    sorted
}

/// Case-folded ordering with a byte-wise tie break so the order is total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Toggle `record` in a comparison selection.
///
/// A selected record is removed. An unselected one is appended only while the
/// selection holds fewer than `max_size` entries; at capacity the selection is
/// returned unchanged.
#[must_use]
pub fn select_for_comparison<'a>(
    selection: &[&'a InstitutionRecord],
    record: &'a InstitutionRecord,
    max_size: usize,
) -> Vec<&'a InstitutionRecord> {
    if selection.iter().any(|r| r.id == record.id) {
        return selection
            .iter()
            .copied()
            .filter(|r| r.id != record.id)
            .collect();
    }

    let mut next = selection.to_vec();
    if next.len() < max_size {
        next.push(record);
    }
    next
}
