//! Deterministic follower-growth forecast under a fixed posting strategy.
//!
//! The periodic rate is
//! `base + post_coef * posts/posts_norm + short_coef * short/short_norm + adoption_bonus`
//! and compounds `sub_periods_per_period` times per reported period.

use serde::{Deserialize, Serialize};
use unibench_core::{BenchmarkConstants, GrowthModel};

use crate::AnalyticsError;

/// Longest forecast the projector accepts.
pub const MAX_HORIZON_PERIODS: u32 = 120;

/// Strategy inputs, all per reported period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub posts_per_period: f64,
    pub short_form_posts_per_period: f64,
    pub platform_adoption_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub period_index: u32,
    pub projected_followers: f64,
    /// Percent.
    pub projected_engagement_rate: f64,
    /// Strategy-independent linear reference line.
    pub baseline_followers: f64,
}

impl ProjectionPoint {
    /// Followers rounded to the nearest whole account, for display.
    #[must_use]
    pub fn rounded_followers(&self) -> f64 {
        self.projected_followers.round()
    }
}

/// Applies a [`GrowthModel`] to strategy parameters.
#[derive(Debug, Clone, Copy)]
pub struct GrowthProjector<'a> {
    model: &'a GrowthModel,
}

impl<'a> GrowthProjector<'a> {
    #[must_use]
    pub fn new(model: &'a GrowthModel) -> Self {
        Self { model }
    }

    /// Projector using the dataset's configured growth model.
    #[must_use]
    pub fn from_benchmarks(benchmarks: &'a BenchmarkConstants) -> Self {
        Self::new(&benchmarks.growth_model)
    }

    /// Growth rate applied once per sub-period.
    #[must_use]
    pub fn periodic_growth_rate(&self, params: &ProjectionParams) -> f64 {
        let m = self.model;
        m.base_rate
            + m.post_bonus_coefficient * (params.posts_per_period / m.posts_normalizer)
            + self.short_form_bonus(params)
            + self.adoption_bonus(params)
    }

    /// Engagement rate (percent) implied by the strategy, never negative.
    #[must_use]
    pub fn engagement_rate(&self, params: &ProjectionParams) -> f64 {
        let m = self.model;
        (m.engagement_base
            + self.short_form_bonus(params) * m.engagement_short_form_weight
            + self.adoption_bonus(params) * m.engagement_adoption_weight)
            .max(0.0)
    }

    fn short_form_bonus(&self, params: &ProjectionParams) -> f64 {
        self.model.short_form_bonus_coefficient
            * (params.short_form_posts_per_period / self.model.short_form_normalizer)
    }

    fn adoption_bonus(&self, params: &ProjectionParams) -> f64 {
        if params.platform_adoption_active {
            self.model.platform_adoption_bonus
        } else {
            0.0
        }
    }

    /// Forecast `horizon_periods` periods ahead of `start_value`.
    ///
    /// Returns `horizon_periods + 1` points; point 0 is the start value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a non-positive or non-finite start
    /// value, negative or non-finite posting rates, or a horizon above
    /// [`MAX_HORIZON_PERIODS`].
    pub fn project(
        &self,
        start_value: f64,
        horizon_periods: u32,
        params: &ProjectionParams,
    ) -> Result<Vec<ProjectionPoint>, AnalyticsError> {
        validate(start_value, horizon_periods, params)?;

        let rate = self.periodic_growth_rate(params);
        let engagement = self.engagement_rate(params);
        let sub_periods = f64::from(self.model.sub_periods_per_period);

        tracing::debug!(
            start_value,
            horizon_periods,
            rate,
            "projecting follower growth"
        );

        let points = (0..=horizon_periods)
            .map(|i| {
                let steps = sub_periods * f64::from(i);
                ProjectionPoint {
                    period_index: i,
                    projected_followers: start_value * (1.0 + rate).powf(steps),
                    projected_engagement_rate: engagement,
                    baseline_followers: start_value
                        * (1.0 + self.model.conservative_flat_rate * steps),
                }
            })
            .collect();

        Ok(points)
    }
}

fn validate(
    start_value: f64,
    horizon_periods: u32,
    params: &ProjectionParams,
) -> Result<(), AnalyticsError> {
    if !start_value.is_finite() || start_value <= 0.0 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "start value must be positive, got {start_value}"
        )));
    }
    if horizon_periods > MAX_HORIZON_PERIODS {
        return Err(AnalyticsError::InvalidParameter(format!(
            "horizon must be at most {MAX_HORIZON_PERIODS} periods, got {horizon_periods}"
        )));
    }
    for (name, value) in [
        ("posts per period", params.posts_per_period),
        ("short-form posts per period", params.short_form_posts_per_period),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

/// Percent change between the first and last point of a projection.
///
/// # Errors
///
/// Returns `InvalidParameter` for an empty projection and
/// `DivisionUndefined` when the first point is zero.
pub fn total_growth_percent(projection: &[ProjectionPoint]) -> Result<f64, AnalyticsError> {
    let (Some(first), Some(last)) = (projection.first(), projection.last()) else {
        return Err(AnalyticsError::InvalidParameter(
            "projection has no points".to_string(),
        ));
    };
    if first.projected_followers == 0.0 {
        return Err(AnalyticsError::DivisionUndefined(
            "first projected follower count".to_string(),
        ));
    }
    Ok((last.projected_followers - first.projected_followers) / first.projected_followers * 100.0)
}
