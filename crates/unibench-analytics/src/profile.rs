//! Head-to-head profile of one comparator against the subject.

use serde::Serialize;
use unibench_core::InstitutionRecord;

use crate::gap::{gap_vs_record, GapResult};
use crate::{as_f64, MetricField};

/// Follower count that maps to a full reach score.
pub const REACH_NORMALIZER: f64 = 600_000.0;
/// Post count that maps to a full content score.
pub const CONTENT_NORMALIZER: f64 = 3_000.0;
/// Content score used when the post count is unknown.
pub const NEUTRAL_CONTENT_SCORE: f64 = 50.0;
pub const SHORT_VIDEO_ACTIVE_SCORE: f64 = 80.0;

/// Radar-chart axes, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarScores {
    pub reach: f64,
    pub content: f64,
    pub short_video: f64,
}

impl RadarScores {
    #[must_use]
    pub fn for_record(record: &InstitutionRecord) -> Self {
        let reach = as_f64(record.instagram_followers()) / REACH_NORMALIZER * 100.0;
        let content = record
            .instagram_posts()
            .map_or(NEUTRAL_CONTENT_SCORE, |posts| {
                as_f64(posts) / CONTENT_NORMALIZER * 100.0
            });
        let short_video = if record.tiktok_active() {
            SHORT_VIDEO_ACTIVE_SCORE
        } else {
            0.0
        };

        Self {
            reach: reach.clamp(0.0, 100.0),
            content: content.clamp(0.0, 100.0),
            short_video,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitorProfile<'a> {
    pub institution: &'a InstitutionRecord,
    /// `None` when the subject has zero followers.
    pub followers_gap: Option<GapResult>,
    /// `None` when either post count is unknown or the subject's is zero.
    pub posts_gap: Option<GapResult>,
    pub short_video_active: bool,
    pub subject_short_video_active: bool,
    pub radar: RadarScores,
    pub subject_radar: RadarScores,
}

/// Compare `other` with `subject` across every tracked dimension.
#[must_use]
pub fn competitor_profile<'a>(
    subject: &InstitutionRecord,
    other: &'a InstitutionRecord,
) -> CompetitorProfile<'a> {
    CompetitorProfile {
        institution: other,
        followers_gap: gap_vs_record(subject, other, MetricField::InstagramFollowers).ok(),
        posts_gap: gap_vs_record(subject, other, MetricField::InstagramPosts).ok(),
        short_video_active: other.tiktok_active(),
        subject_short_video_active: subject.tiktok_active(),
        radar: RadarScores::for_record(other),
        subject_radar: RadarScores::for_record(subject),
    }
}
