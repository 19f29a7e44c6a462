//! Relative standing of the subject institution against its comparators.
//!
//! Records with an unknown value for the requested field are skipped by every
//! aggregate here (average, leader, closest, rank). Comparators are identified
//! by id, so the subject record passed in does not need to be the same
//! allocation as the one inside `records`.

use serde::Serialize;
use unibench_core::{DatasetError, InstitutionRecord};

use crate::{as_f64, AnalyticsError, MetricField};

/// Difference between the subject and a comparator or aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GapResult {
    /// `other - subject`.
    pub absolute_difference: f64,
    /// `other / subject`.
    pub ratio: f64,
    /// `(ratio - 1) * 100`.
    pub percentage_difference: f64,
}

impl GapResult {
    fn between(baseline: u64, other: f64, baseline_label: &str) -> Result<Self, AnalyticsError> {
        if baseline == 0 {
            return Err(AnalyticsError::DivisionUndefined(baseline_label.to_string()));
        }
        let baseline = as_f64(baseline);
        let ratio = other / baseline;
        Ok(Self {
            absolute_difference: other - baseline,
            ratio,
            percentage_difference: (ratio - 1.0) * 100.0,
        })
    }
}

/// A specific comparator together with its gap to the subject.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison<'a> {
    pub comparator: &'a InstitutionRecord,
    pub value: u64,
    pub gap: GapResult,
}

/// 1-based descending position among records with a known value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub position: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub field: MetricField,
    /// Records with a known value.
    pub count: usize,
    pub total: u64,
    pub mean: f64,
    pub max: u64,
    pub min: u64,
}

/// Everything the gap panel shows for one field.
///
/// Parts that cannot be computed (zero baseline, no comparator with data)
/// are `None` rather than failing the whole report.
#[derive(Debug, Clone, Serialize)]
pub struct GapReport<'a> {
    pub field: MetricField,
    pub subject: &'a InstitutionRecord,
    pub subject_value: u64,
    pub average: Option<f64>,
    pub vs_average: Option<GapResult>,
    pub vs_leader: Option<Comparison<'a>>,
    pub closest: Option<Comparison<'a>>,
    pub rank: Rank,
    /// Comparators running an active short-video account.
    pub comparators_with_short_video: usize,
}

fn baseline_label(subject: &InstitutionRecord, field: MetricField) -> String {
    format!("{field} of '{}'", subject.id)
}

fn comparators<'a>(
    subject: &'a InstitutionRecord,
    records: &'a [InstitutionRecord],
    field: MetricField,
) -> impl Iterator<Item = (&'a InstitutionRecord, u64)> + 'a {
    records
        .iter()
        .filter(move |r| r.id != subject.id)
        .filter_map(move |r| field.value(r).map(|v| (r, v)))
}

/// Gap between the subject and one other record.
///
/// # Errors
///
/// Returns `UnknownValue` if either record lacks `field`, and
/// `DivisionUndefined` if the subject's value is zero.
pub fn gap_vs_record(
    subject: &InstitutionRecord,
    other: &InstitutionRecord,
    field: MetricField,
) -> Result<GapResult, AnalyticsError> {
    let baseline = field.require(subject)?;
    let value = field.require(other)?;
    GapResult::between(baseline, as_f64(value), &baseline_label(subject, field))
}

/// Gap between the subject and the mean over all records with a known value.
///
/// The subject itself is part of the mean.
///
/// # Errors
///
/// Returns `UnknownValue` if the subject lacks `field`, `NoComparatorAvailable`
/// if no record has it, and `DivisionUndefined` for a zero subject value.
pub fn gap_vs_average(
    subject: &InstitutionRecord,
    records: &[InstitutionRecord],
    field: MetricField,
) -> Result<GapResult, AnalyticsError> {
    let baseline = field.require(subject)?;
    let average = mean(records, field)?;
    GapResult::between(baseline, average, &baseline_label(subject, field))
}

/// Gap between the subject and the non-subject record with the largest value.
///
/// Ties go to the record that appears first in `records`.
///
/// # Errors
///
/// Returns `UnknownValue` if the subject lacks `field`, `NoComparatorAvailable`
/// if no comparator has it, and `DivisionUndefined` for a zero subject value.
pub fn gap_vs_leader<'a>(
    subject: &'a InstitutionRecord,
    records: &'a [InstitutionRecord],
    field: MetricField,
) -> Result<Comparison<'a>, AnalyticsError> {
    let baseline = field.require(subject)?;
    let mut leader: Option<(&InstitutionRecord, u64)> = None;
    for (record, value) in comparators(subject, records, field) {
        if leader.is_none_or(|(_, best)| value > best) {
            leader = Some((record, value));
        }
    }
    let (comparator, value) = leader.ok_or(AnalyticsError::NoComparatorAvailable(field))?;

    Ok(Comparison {
        comparator,
        value,
        gap: GapResult::between(baseline, as_f64(value), &baseline_label(subject, field))?,
    })
}

/// The comparator whose value is nearest the subject's.
///
/// Ties go to the record that appears first in `records`.
///
/// # Errors
///
/// Returns `UnknownValue` if the subject lacks `field`, `NoComparatorAvailable`
/// if no comparator has it, and `DivisionUndefined` for a zero subject value.
pub fn closest_comparator<'a>(
    subject: &'a InstitutionRecord,
    records: &'a [InstitutionRecord],
    field: MetricField,
) -> Result<Comparison<'a>, AnalyticsError> {
    let baseline = field.require(subject)?;
    let mut closest: Option<(&InstitutionRecord, u64, u64)> = None;
    for (record, value) in comparators(subject, records, field) {
        let distance = value.abs_diff(baseline);
        if closest.is_none_or(|(_, _, best)| distance < best) {
            closest = Some((record, value, distance));
        }
    }
    let (comparator, value, _) = closest.ok_or(AnalyticsError::NoComparatorAvailable(field))?;

    Ok(Comparison {
        comparator,
        value,
        gap: GapResult::between(baseline, as_f64(value), &baseline_label(subject, field))?,
    })
}

/// The subject's descending rank among records with a known value.
///
/// Equal values keep dataset order, so a subject tied with an earlier record
/// ranks below it.
///
/// # Errors
///
/// Returns `UnknownValue` if the subject lacks `field`.
pub fn rank(
    subject: &InstitutionRecord,
    records: &[InstitutionRecord],
    field: MetricField,
) -> Result<Rank, AnalyticsError> {
    field.require(subject)?;

    let mut known: Vec<(&InstitutionRecord, u64)> = records
        .iter()
        .filter_map(|r| field.value(r).map(|v| (r, v)))
        .collect();
    known.sort_by(|a, b| b.1.cmp(&a.1));

    let position = known
        .iter()
        .position(|(r, _)| r.id == subject.id)
        .ok_or_else(|| DatasetError::NotFound(subject.id.clone()))?;

    Ok(Rank {
        position: position + 1,
        total: known.len(),
    })
}

/// Count, total, mean, and extremes over records with a known value.
///
/// # Errors
///
/// Returns `NoComparatorAvailable` if no record has `field`.
#[allow(clippy::cast_precision_loss)]
pub fn summary_statistics(
    records: &[InstitutionRecord],
    field: MetricField,
) -> Result<SummaryStatistics, AnalyticsError> {
    let values: Vec<u64> = records.iter().filter_map(|r| field.value(r)).collect();
    let (Some(&max), Some(&min)) = (values.iter().max(), values.iter().min()) else {
        return Err(AnalyticsError::NoComparatorAvailable(field));
    };
    let total: u64 = values.iter().sum();

    Ok(SummaryStatistics {
        field,
        count: values.len(),
        total,
        mean: as_f64(total) / values.len() as f64,
        max,
        min,
    })
}

/// Build the full gap panel for `field`.
///
/// # Errors
///
/// Returns `UnknownValue` if the subject lacks `field`, or `NotFound` if the
/// subject is not part of `records`.
pub fn gap_report<'a>(
    subject: &'a InstitutionRecord,
    records: &'a [InstitutionRecord],
    field: MetricField,
) -> Result<GapReport<'a>, AnalyticsError> {
    let subject_value = field.require(subject)?;
    let rank = rank(subject, records, field)?;

    let average = not_applicable_as_none(mean(records, field))?;
    let vs_average = not_applicable_as_none(gap_vs_average(subject, records, field))?;
    let vs_leader = not_applicable_as_none(gap_vs_leader(subject, records, field))?;
    let closest = not_applicable_as_none(closest_comparator(subject, records, field))?;

    let comparators_with_short_video = records
        .iter()
        .filter(|r| r.id != subject.id && r.tiktok_active())
        .count();

    tracing::debug!(
        %field,
        subject = %subject.id,
        position = rank.position,
        total = rank.total,
        "built gap report"
    );

    Ok(GapReport {
        field,
        subject,
        subject_value,
        average,
        vs_average,
        vs_leader,
        closest,
        rank,
        comparators_with_short_video,
    })
}

fn mean(records: &[InstitutionRecord], field: MetricField) -> Result<f64, AnalyticsError> {
    summary_statistics(records, field).map(|stats| stats.mean)
}

fn not_applicable_as_none<T>(result: Result<T, AnalyticsError>) -> Result<Option<T>, AnalyticsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_applicable() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{as_subject, record, universities, with_tiktok};

    fn approx(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn gap_vs_record_matches_reference_scenario() {
        let records = universities();
        let gap = gap_vs_record(&records[0], &records[1], MetricField::InstagramFollowers).unwrap();
        assert!(approx(gap.absolute_difference, 578_000.0, f64::EPSILON));
        assert!(approx(gap.ratio, 39.53, 0.01), "ratio {}", gap.ratio);
        assert!(
            approx(gap.percentage_difference, 3853.3, 0.1),
            "percentage {}",
            gap.percentage_difference
        );
    }

    #[test]
    fn gap_vs_record_absolute_difference_is_exact_for_every_record() {
        let records = universities();
        let subject = &records[0];
        for other in &records {
            let gap = gap_vs_record(subject, other, MetricField::InstagramFollowers).unwrap();
            let expected = as_f64(other.instagram_followers()) - as_f64(subject.instagram_followers());
            assert!(approx(gap.absolute_difference, expected, 0.0));
        }
    }

    #[test]
    fn gap_vs_record_against_zero_baseline_is_undefined() {
        let subject = as_subject(record("yu", "Yeshiva University", 0));
        let other = record("nyu", "New York University", 10);
        let err = gap_vs_record(&subject, &other, MetricField::InstagramFollowers).unwrap_err();
        assert!(matches!(err, AnalyticsError::DivisionUndefined(_)));
    }

    #[test]
    fn gap_vs_record_rejects_unknown_comparator_value() {
        let records = universities();
        let err = gap_vs_record(&records[0], &records[2], MetricField::InstagramPosts).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::UnknownValue {
                id: "columbia".to_string(),
                field: MetricField::InstagramPosts,
            }
        );
    }

    #[test]
    fn gap_vs_average_excludes_unknown_values() {
        let records = universities();
        // Known posts: 2260, 2613, 2965, 1258 -> mean 2274.
        let gap = gap_vs_average(&records[0], &records, MetricField::InstagramPosts).unwrap();
        assert!(approx(gap.absolute_difference, 14.0, 1e-9));
    }

    #[test]
    fn gap_vs_average_includes_subject() {
        let records = universities();
        let gap = gap_vs_average(&records[0], &records, MetricField::InstagramFollowers).unwrap();
        let mean = 1_218_932.0 / 6.0;
        assert!(approx(gap.absolute_difference, mean - 15_000.0, 1e-6));
    }

    #[test]
    fn gap_vs_leader_picks_maximum() {
        let records = universities();
        let leader = gap_vs_leader(&records[0], &records, MetricField::InstagramFollowers).unwrap();
        assert_eq!(leader.comparator.id, "nyu");
        for other in records.iter().skip(1) {
            assert!(leader.value >= other.instagram_followers());
        }
    }

    #[test]
    fn gap_vs_leader_breaks_ties_by_dataset_order() {
        let records = vec![
            as_subject(record("yu", "Yeshiva University", 10)),
            record("b", "Beta", 50),
            record("a", "Alpha", 50),
        ];
        let leader = gap_vs_leader(&records[0], &records, MetricField::InstagramFollowers).unwrap();
        assert_eq!(leader.comparator.id, "b");
    }

    #[test]
    fn gap_vs_leader_never_selects_subject() {
        let records = vec![
            as_subject(record("yu", "Yeshiva University", 900)),
            record("nyu", "New York University", 100),
        ];
        let leader = gap_vs_leader(&records[0], &records, MetricField::InstagramFollowers).unwrap();
        assert_eq!(leader.comparator.id, "nyu");
        assert!(leader.gap.absolute_difference < 0.0);
    }

    #[test]
    fn closest_comparator_finds_brandeis() {
        let records = universities();
        let closest =
            closest_comparator(&records[0], &records, MetricField::InstagramFollowers).unwrap();
        // Brandeis is 10 000 away, Maryland 10 068.
        assert_eq!(closest.comparator.id, "brandeis");
        assert!(approx(closest.gap.percentage_difference, 66.67, 0.01));
    }

    #[test]
    fn closest_comparator_skips_unknown_values() {
        let records = universities();
        let closest = closest_comparator(&records[0], &records, MetricField::InstagramPosts).unwrap();
        assert_eq!(closest.comparator.id, "nyu");
    }

    #[test]
    fn closest_comparator_without_known_values_fails() {
        let records = vec![
            as_subject(record("yu", "Yeshiva University", 10)),
            record("nyu", "New York University", 100),
        ];
        let err = closest_comparator(&records[0], &records, MetricField::InstagramPosts)
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownValue { .. }));

        let records = vec![
            as_subject(crate::test_support::with_posts(
                record("yu", "Yeshiva University", 10),
                5,
            )),
            record("nyu", "New York University", 100),
        ];
        let err = closest_comparator(&records[0], &records, MetricField::InstagramPosts)
            .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::NoComparatorAvailable(MetricField::InstagramPosts)
        );
    }

    #[test]
    fn rank_places_subject_fifth_of_six() {
        let records = universities();
        let rank = rank(&records[0], &records, MetricField::InstagramFollowers).unwrap();
        assert_eq!(rank, Rank { position: 5, total: 6 });
    }

    #[test]
    fn rank_excludes_unknown_values_from_total() {
        let records = universities();
        let rank = rank(&records[0], &records, MetricField::InstagramPosts).unwrap();
        // Known: brandeis 2965, nyu 2613, yu 2260, maryland 1258.
        assert_eq!(rank, Rank { position: 3, total: 4 });
    }

    #[test]
    fn rank_ties_keep_dataset_order() {
        let records = vec![
            record("nyu", "New York University", 50),
            as_subject(record("yu", "Yeshiva University", 50)),
        ];
        let rank = rank(&records[1], &records, MetricField::InstagramFollowers).unwrap();
        assert_eq!(rank.position, 2);
    }

    #[test]
    fn summary_statistics_over_followers() {
        let stats = summary_statistics(&universities(), MetricField::InstagramFollowers).unwrap();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.total, 1_218_932);
        assert_eq!(stats.max, 593_000);
        assert_eq!(stats.min, 4_932);
    }

    #[test]
    fn summary_statistics_without_values_fails() {
        let records = vec![with_tiktok(record("a", "Alpha", 1), None)];
        assert!(summary_statistics(&records, MetricField::TiktokFollowers).is_err());
    }

    #[test]
    fn gap_report_collects_panel() {
        let records = universities();
        let report = gap_report(&records[0], &records, MetricField::InstagramFollowers).unwrap();
        assert_eq!(report.subject_value, 15_000);
        assert_eq!(report.rank.position, 5);
        assert_eq!(report.vs_leader.as_ref().unwrap().comparator.id, "nyu");
        assert_eq!(report.closest.as_ref().unwrap().comparator.id, "brandeis");
        assert!(report.vs_average.is_some());
        assert_eq!(report.comparators_with_short_video, 3);
    }

    #[test]
    fn gap_report_omits_ratios_for_zero_baseline() {
        let records = universities();
        // The subject has no short-video account: zero followers, a real zero.
        let report = gap_report(&records[0], &records, MetricField::TiktokFollowers).unwrap();
        assert_eq!(report.subject_value, 0);
        assert!(report.vs_average.is_none());
        assert!(report.vs_leader.is_none());
        assert!(report.closest.is_none());
        assert!(report.average.is_some());
    }
}
