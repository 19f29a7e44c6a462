//! Record builders shared by the unit tests in this crate.

use unibench_core::{InstagramAccount, InstitutionRecord, TiktokAccount};

pub(crate) fn record(id: &str, name: &str, followers: u64) -> InstitutionRecord {
    InstitutionRecord {
        id: id.to_string(),
        display_name: name.to_string(),
        short_name: id.to_uppercase(),
        subject: false,
        instagram: InstagramAccount {
            handle: Some(format!("@{id}")),
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

pub(crate) fn with_posts(mut record: InstitutionRecord, posts: u64) -> InstitutionRecord {
    record.instagram.posts = Some(posts);
    record
}

pub(crate) fn with_tiktok(
    mut record: InstitutionRecord,
    followers: Option<u64>,
) -> InstitutionRecord {
    record.tiktok.active = true;
    record.tiktok.followers = followers;
    record
}

pub(crate) fn as_subject(mut record: InstitutionRecord) -> InstitutionRecord {
    record.subject = true;
    record
}

/// The six-institution benchmark set, subject first.
pub(crate) fn universities() -> Vec<InstitutionRecord> {
    vec![
        as_subject(with_posts(record("yu", "Yeshiva University", 15_000), 2_260)),
        with_tiktok(
            with_posts(record("nyu", "New York University", 593_000), 2_613),
            Some(112_400),
        ),
        record("columbia", "Columbia University", 457_000),
        with_tiktok(record("rutgers", "Rutgers University", 124_000), None),
        with_tiktok(
            with_posts(record("brandeis", "Brandeis University", 25_000), 2_965),
            None,
        ),
        with_posts(record("maryland", "University of Maryland", 4_932), 1_258),
    ]
}
