//! Growth projection handler.

use std::fmt::Write as _;

use serde::Serialize;
use unibench_analytics::{
    total_growth_percent, GrowthProjector, ProjectionParams, ProjectionPoint,
};
use unibench_core::DatasetStore;

use crate::format::{fmt_percent, print_json};

#[derive(Debug, Clone, Copy)]
pub(crate) struct ProjectArgs {
    pub start: Option<f64>,
    pub horizon: u32,
    pub posts: f64,
    pub short_form: f64,
    pub platform_adoption: bool,
}

#[derive(Debug, Serialize)]
struct ProjectionOutput<'a> {
    start_value: f64,
    params: ProjectionParams,
    total_growth_percent: f64,
    points: &'a [ProjectionPoint],
}

pub(crate) fn render_projection(points: &[ProjectionPoint], total_growth: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}{:>14}{:>14}{:>12}",
        "MONTH", "PROJECTED", "BASELINE", "ENGAGE %"
    );
    for point in points {
        let _ = writeln!(
            out,
            "{:<8}{:>14.0}{:>14.0}{:>12.2}",
            point.period_index,
            point.rounded_followers(),
            point.baseline_followers.round(),
            point.projected_engagement_rate
        );
    }
    let _ = writeln!(out, "\ntotal growth {}", fmt_percent(total_growth));
    out
}

/// Project follower growth from `args.start`, or the subject's followers.
///
/// # Errors
///
/// Returns an error for invalid parameters or when the subject is missing.
pub(crate) fn run_project(
    store: &DatasetStore,
    args: &ProjectArgs,
    json: bool,
) -> anyhow::Result<()> {
    #[allow(clippy::cast_precision_loss)]
    let start_value = match args.start {
        Some(start) => start,
        None => store.subject()?.instagram_followers() as f64,
    };
    let params = ProjectionParams {
        posts_per_period: args.posts,
        short_form_posts_per_period: args.short_form,
        platform_adoption_active: args.platform_adoption,
    };

    let projector = GrowthProjector::from_benchmarks(store.benchmarks());
    let points = projector.project(start_value, args.horizon, &params)?;
    let total_growth = total_growth_percent(&points)?;

    if json {
        return print_json(&ProjectionOutput {
            start_value,
            params,
            total_growth_percent: total_growth,
            points: &points,
        });
    }
    print!("{}", render_projection(&points, total_growth));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use unibench_core::GrowthModel;

    #[test]
    fn projection_table_has_row_per_month() {
        let model = GrowthModel::default();
        let params = ProjectionParams {
            posts_per_period: 12.0,
            short_form_posts_per_period: 3.0,
            platform_adoption_active: false,
        };
        let points = GrowthProjector::new(&model)
            .project(15_000.0, 3, &params)
            .unwrap();
        let total = total_growth_percent(&points).unwrap();
        let text = render_projection(&points, total);

        assert_eq!(text.lines().count(), 1 + 4 + 2);
        assert!(text.lines().nth(1).unwrap().contains("15000"));
        assert!(text.contains("total growth +"));
    }
}
