use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unibench_core::InstitutionRecord;

use crate::AnalyticsError;

/// Numeric attribute of an [`InstitutionRecord`] that analytics can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricField {
    #[default]
    InstagramFollowers,
    InstagramPosts,
    TiktokFollowers,
}

impl MetricField {
    pub const ALL: [MetricField; 3] = [
        MetricField::InstagramFollowers,
        MetricField::InstagramPosts,
        MetricField::TiktokFollowers,
    ];

    /// The record's value for this field; `None` is the unknown sentinel.
    #[must_use]
    pub fn value(self, record: &InstitutionRecord) -> Option<u64> {
        match self {
            MetricField::InstagramFollowers => Some(record.instagram_followers()),
            MetricField::InstagramPosts => record.instagram_posts(),
            MetricField::TiktokFollowers => record.tiktok_followers(),
        }
    }

    /// Like [`MetricField::value`] but fails when the value is unknown.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::UnknownValue` for a missing value.
    pub fn require(self, record: &InstitutionRecord) -> Result<u64, AnalyticsError> {
        self.value(record).ok_or_else(|| AnalyticsError::UnknownValue {
            id: record.id.clone(),
            field: self,
        })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetricField::InstagramFollowers => "instagram-followers",
            MetricField::InstagramPosts => "instagram-posts",
            MetricField::TiktokFollowers => "tiktok-followers",
        }
    }
}

impl std::fmt::Display for MetricField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricField {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        MetricField::ALL
            .into_iter()
            .find(|field| field.as_str() == needle)
            .ok_or_else(|| {
                AnalyticsError::InvalidParameter(format!(
                    "unknown field '{s}'; expected one of instagram-followers, instagram-posts, tiktok-followers"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_names() {
        assert_eq!(
            "instagram-followers".parse::<MetricField>().unwrap(),
            MetricField::InstagramFollowers
        );
        assert_eq!(
            " TikTok-Followers ".parse::<MetricField>().unwrap(),
            MetricField::TiktokFollowers
        );
    }

    #[test]
    fn rejects_unknown_field() {
        let err = "likes".parse::<MetricField>().unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for field in MetricField::ALL {
            assert_eq!(field.to_string().parse::<MetricField>().unwrap(), field);
        }
    }

    #[test]
    fn serializes_as_kebab_case() {
        let json = serde_json::to_string(&MetricField::InstagramPosts).unwrap();
        assert_eq!(json, "\"instagram-posts\"");
    }
}
