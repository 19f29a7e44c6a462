use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::DatasetError;

/// Instagram presence for one institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramAccount {
    pub handle: Option<String>,
    pub followers: u64,
    /// `None` when the post count was not measured.
    pub posts: Option<u64>,
    pub url: Option<String>,
}

/// Short-video (`TikTok`) presence for one institution.
///
/// An inactive account has `followers: Some(0)`; `None` means the account
/// exists but its follower count was not measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiktokAccount {
    pub handle: Option<String>,
    pub followers: Option<u64>,
    pub active: bool,
    pub url: Option<String>,
}

/// One tracked organization's social-presence snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionRecord {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub short_name: String,
    /// `true` for the single institution being benchmarked.
    #[serde(default)]
    pub subject: bool,
    pub instagram: InstagramAccount,
    pub tiktok: TiktokAccount,
    pub color: Option<String>,
    pub note: Option<String>,
}

impl InstitutionRecord {
    #[must_use]
    pub fn instagram_followers(&self) -> u64 {
        self.instagram.followers
    }

    #[must_use]
    pub fn instagram_posts(&self) -> Option<u64> {
        self.instagram.posts
    }

    #[must_use]
    pub fn tiktok_active(&self) -> bool {
        self.tiktok.active
    }

    #[must_use]
    pub fn tiktok_followers(&self) -> Option<u64> {
        self.tiktok.followers
    }

    #[must_use]
    pub fn is_subject(&self) -> bool {
        self.subject
    }

    /// Case-insensitive substring match against the display or short name.
    ///
    /// `needle` must already be lowercased. An empty needle matches everything.
    #[must_use]
    pub fn matches_name(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.display_name.to_lowercase().contains(needle)
            || self.short_name.to_lowercase().contains(needle)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Check per-record and cross-record constraints, excluding the subject rule.
pub(crate) fn validate_institutions(records: &[InstitutionRecord]) -> Result<(), DatasetError> {
    if records.is_empty() {
        return Err(DatasetError::InvariantViolation(
            "dataset must contain at least one institution".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();

    for record in records {
        if !is_valid_id(&record.id) {
            return Err(DatasetError::InvariantViolation(format!(
                "institution id '{}' must be non-empty lowercase ascii, digits, or '-'",
                record.id
            )));
        }

        if record.display_name.trim().is_empty() || record.short_name.trim().is_empty() {
            return Err(DatasetError::InvariantViolation(format!(
                "institution '{}' must have a non-empty name and short name",
                record.id
            )));
        }

        if !seen_ids.insert(record.id.as_str()) {
            return Err(DatasetError::InvariantViolation(format!(
                "duplicate institution id: '{}'",
                record.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_record(id: &str, followers: u64) -> InstitutionRecord {
    InstitutionRecord {
        id: id.to_string(),
        display_name: format!("{} University", id.to_uppercase()),
        short_name: id.to_uppercase(),
        subject: false,
        instagram: InstagramAccount {
            handle: None,
            followers,
            posts: None,
            url: None,
        },
        tiktok: TiktokAccount {
            handle: None,
            followers: Some(0),
            active: false,
            url: None,
        },
        color: None,
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_name_on_short_name() {
        let record = sample_record("nyu", 10);
        assert!(record.matches_name("ny"));
        assert!(record.matches_name("university"));
        assert!(!record.matches_name("columbia"));
    }

    #[test]
    fn empty_needle_matches() {
        assert!(sample_record("yu", 1).matches_name(""));
    }

    #[test]
    fn validate_rejects_empty_dataset() {
        let err = validate_institutions(&[]).unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn validate_rejects_uppercase_id() {
        let err = validate_institutions(&[sample_record("NYU", 1)]).unwrap_err();
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn validate_rejects_blank_short_name() {
        let mut record = sample_record("nyu", 1);
        record.short_name = "  ".to_string();
        let err = validate_institutions(&[record]).unwrap_err();
        assert!(err.to_string().contains("non-empty name"));
    }

    #[test]
    fn validate_rejects_duplicate_id() {
        let err =
            validate_institutions(&[sample_record("nyu", 1), sample_record("nyu", 2)]).unwrap_err();
        assert!(err.to_string().contains("duplicate institution id"));
    }

    #[test]
    fn validate_accepts_distinct_records() {
        assert!(validate_institutions(&[sample_record("yu", 1), sample_record("nyu", 2)]).is_ok());
    }

    #[test]
    fn unknown_tiktok_followers_deserialize_as_none() {
        let yaml = r#"
id: rutgers
name: Rutgers University
short_name: Rutgers
instagram: { handle: "@rutgersu", followers: 124000, posts: null, url: null }
tiktok: { handle: "@rutgersu", followers: null, active: true, url: null }
"#;
        let record: InstitutionRecord = serde_yaml::from_str(yaml).unwrap();
        assert!(!record.is_subject());
        assert_eq!(record.instagram_posts(), None);
        assert_eq!(record.tiktok_followers(), None);
        assert!(record.tiktok_active());
        assert_eq!(record.display_name, "Rutgers University");
    }
}
