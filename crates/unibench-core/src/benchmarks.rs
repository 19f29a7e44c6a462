//! Industry reference values and the canonical growth-model coefficients.

use serde::{Deserialize, Serialize};

use crate::DatasetError;

/// Inclusive posting-frequency range (posts per week).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRange {
    pub min: u32,
    pub max: u32,
}

/// A posting range together with the engagement rate observed inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostingBand {
    pub min: u32,
    pub max: u32,
    /// Percent, e.g. `4.52`.
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramBenchmarks {
    pub average_engagement: f64,
    pub optimal_posting: PostingBand,
    pub minimum_effective: PostingBand,
    pub best_time: Option<String>,
    pub best_content: Option<String>,
    pub reels_engagement: f64,
    pub carousel_engagement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacebookBenchmarks {
    pub optimal_engagement: f64,
    pub posting_frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterBenchmarks {
    pub optimal_engagement: f64,
    pub posting_frequency: u32,
    pub industry_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedinBenchmarks {
    pub optimal_engagement: f64,
    pub posting_frequency: PostingRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiktokBenchmarks {
    /// Percent per week, e.g. `2.28`.
    pub weekly_follower_growth: f64,
    pub engagement_multiplier: f64,
}

/// Coefficients of the follower-growth projection.
///
/// Rates are per sub-period (a week); reported periods (months) contain
/// `sub_periods_per_period` compounding steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthModel {
    pub base_rate: f64,
    pub post_bonus_coefficient: f64,
    pub posts_normalizer: f64,
    pub short_form_bonus_coefficient: f64,
    pub short_form_normalizer: f64,
    pub platform_adoption_bonus: f64,
    pub sub_periods_per_period: u32,
    /// Flat, non-compounding rate of the strategy-independent baseline.
    pub conservative_flat_rate: f64,
    pub engagement_base: f64,
    pub engagement_short_form_weight: f64,
    pub engagement_adoption_weight: f64,
}

impl Default for GrowthModel {
    fn default() -> Self {
        Self {
            base_rate: 0.005,
            post_bonus_coefficient: 0.003,
            posts_normalizer: 12.0,
            short_form_bonus_coefficient: 0.008,
            short_form_normalizer: 3.0,
            platform_adoption_bonus: 0.0228,
            sub_periods_per_period: 4,
            conservative_flat_rate: 0.005,
            engagement_base: 2.99,
            engagement_short_form_weight: 100.0,
            engagement_adoption_weight: 50.0,
        }
    }
}

impl GrowthModel {
    fn validate(&self) -> Result<(), DatasetError> {
        let rates = [
            ("base_rate", self.base_rate),
            ("post_bonus_coefficient", self.post_bonus_coefficient),
            ("short_form_bonus_coefficient", self.short_form_bonus_coefficient),
            ("platform_adoption_bonus", self.platform_adoption_bonus),
            ("conservative_flat_rate", self.conservative_flat_rate),
            ("engagement_base", self.engagement_base),
            ("engagement_short_form_weight", self.engagement_short_form_weight),
            ("engagement_adoption_weight", self.engagement_adoption_weight),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(DatasetError::InvariantViolation(format!(
                    "growth_model.{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("posts_normalizer", self.posts_normalizer),
            ("short_form_normalizer", self.short_form_normalizer),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DatasetError::InvariantViolation(format!(
                    "growth_model.{name} must be positive, got {value}"
                )));
            }
        }

        if self.sub_periods_per_period == 0 {
            return Err(DatasetError::InvariantViolation(
                "growth_model.sub_periods_per_period must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Process-wide, read-only industry reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConstants {
    pub instagram: InstagramBenchmarks,
    pub facebook: FacebookBenchmarks,
    pub twitter: TwitterBenchmarks,
    pub linkedin: LinkedinBenchmarks,
    pub tiktok: TiktokBenchmarks,
    #[serde(default)]
    pub growth_model: GrowthModel,
}

impl BenchmarkConstants {
    pub(crate) fn validate(&self) -> Result<(), DatasetError> {
        let ranges = [
            (
                "instagram.optimal_posting",
                self.instagram.optimal_posting.min,
                self.instagram.optimal_posting.max,
            ),
            (
                "instagram.minimum_effective",
                self.instagram.minimum_effective.min,
                self.instagram.minimum_effective.max,
            ),
            (
                "linkedin.posting_frequency",
                self.linkedin.posting_frequency.min,
                self.linkedin.posting_frequency.max,
            ),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(DatasetError::InvariantViolation(format!(
                    "{name} has min {min} greater than max {max}"
                )));
            }
        }

        let rates = [
            ("instagram.average_engagement", self.instagram.average_engagement),
            (
                "instagram.optimal_posting.engagement_rate",
                self.instagram.optimal_posting.engagement_rate,
            ),
            (
                "instagram.minimum_effective.engagement_rate",
                self.instagram.minimum_effective.engagement_rate,
            ),
            ("instagram.reels_engagement", self.instagram.reels_engagement),
            ("instagram.carousel_engagement", self.instagram.carousel_engagement),
            ("facebook.optimal_engagement", self.facebook.optimal_engagement),
            ("twitter.optimal_engagement", self.twitter.optimal_engagement),
            ("twitter.industry_average", self.twitter.industry_average),
            ("linkedin.optimal_engagement", self.linkedin.optimal_engagement),
            ("tiktok.weekly_follower_growth", self.tiktok.weekly_follower_growth),
            ("tiktok.engagement_multiplier", self.tiktok.engagement_multiplier),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(DatasetError::InvariantViolation(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        self.growth_model.validate()
    }
}

#[cfg(test)]
pub(crate) fn sample_benchmarks() -> BenchmarkConstants {
    BenchmarkConstants {
        instagram: InstagramBenchmarks {
            average_engagement: 2.99,
            optimal_posting: PostingBand {
                min: 8,
                max: 28,
                engagement_rate: 4.52,
            },
            minimum_effective: PostingBand {
                min: 2,
                max: 15,
                engagement_rate: 2.99,
            },
            best_time: Some("8 PM Wednesday".to_string()),
            best_content: None,
            reels_engagement: 1.99,
            carousel_engagement: 0.80,
        },
        facebook: FacebookBenchmarks {
            optimal_engagement: 2.97,
            posting_frequency: 2,
        },
        twitter: TwitterBenchmarks {
            optimal_engagement: 2.61,
            posting_frequency: 2,
            industry_average: 10.1,
        },
        linkedin: LinkedinBenchmarks {
            optimal_engagement: 2.95,
            posting_frequency: PostingRange { min: 2, max: 3 },
        },
        tiktok: TiktokBenchmarks {
            weekly_follower_growth: 2.28,
            engagement_multiplier: 4.0,
        },
        growth_model: GrowthModel::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_benchmarks_validate() {
        assert!(sample_benchmarks().validate().is_ok());
    }

    #[test]
    fn inverted_posting_range_is_rejected() {
        let mut benchmarks = sample_benchmarks();
        benchmarks.instagram.optimal_posting.min = 30;
        let err = benchmarks.validate().unwrap_err();
        assert!(err.to_string().contains("instagram.optimal_posting"));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut benchmarks = sample_benchmarks();
        benchmarks.tiktok.weekly_follower_growth = -1.0;
        let err = benchmarks.validate().unwrap_err();
        assert!(err.to_string().contains("tiktok.weekly_follower_growth"));
    }

    #[test]
    fn zero_normalizer_is_rejected() {
        let mut benchmarks = sample_benchmarks();
        benchmarks.growth_model.posts_normalizer = 0.0;
        let err = benchmarks.validate().unwrap_err();
        assert!(err.to_string().contains("posts_normalizer"));
    }

    #[test]
    fn zero_sub_periods_is_rejected() {
        let mut benchmarks = sample_benchmarks();
        benchmarks.growth_model.sub_periods_per_period = 0;
        assert!(benchmarks.validate().is_err());
    }

    #[test]
    fn growth_model_fields_default_when_omitted() {
        let model: GrowthModel = serde_yaml::from_str("base_rate: 0.01").unwrap();
        assert!((model.base_rate - 0.01).abs() < f64::EPSILON);
        assert_eq!(model.sub_periods_per_period, 4);
        assert!((model.platform_adoption_bonus - 0.0228).abs() < f64::EPSILON);
    }
}
