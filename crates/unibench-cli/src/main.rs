mod analyze;
mod explore;
mod format;
mod project;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use unibench_core::{AppConfig, ConfigError, DatasetStore};

#[derive(Debug, Parser)]
#[command(name = "unibench")]
#[command(about = "University social media benchmarking")]
struct Cli {
    /// Dataset file; overrides UNIBENCH_DATASET_PATH
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List institutions, optionally filtered and sorted
    List {
        /// Case-insensitive substring of the name or short name
        #[arg(long, default_value = "")]
        search: String,
        /// any, instagram, or tiktok
        #[arg(long, default_value = "any")]
        platform: String,
        /// followers or name
        #[arg(long, default_value = "followers")]
        sort: String,
    },
    /// Show one institution and its profile against the subject
    Show {
        /// Institution id (e.g. nyu)
        id: String,
    },
    /// Gap between the subject and one institution, or the full gap panel
    Gap {
        /// instagram-followers, instagram-posts, or tiktok-followers
        #[arg(long, default_value = "instagram-followers")]
        field: String,
        /// Compare against this institution only
        #[arg(long)]
        against: Option<String>,
    },
    /// Subject's rank among institutions with a known value
    Rank {
        #[arg(long, default_value = "instagram-followers")]
        field: String,
    },
    /// Totals, mean, and extremes for a field
    Stats {
        #[arg(long, default_value = "instagram-followers")]
        field: String,
    },
    /// Project follower growth under a posting strategy
    Project {
        /// Starting followers; defaults to the subject's Instagram followers
        #[arg(long)]
        start: Option<f64>,
        /// Number of months to project
        #[arg(long, default_value = "6")]
        horizon: u32,
        /// Instagram posts per month
        #[arg(long, default_value = "8")]
        posts: f64,
        /// Short-form videos (Reels) per month
        #[arg(long, default_value = "2")]
        short_form: f64,
        /// Model launching a short-video platform account
        #[arg(long)]
        platform_adoption: bool,
    },
    /// Export the dataset as comma-delimited text
    Export {
        /// Comma-separated column list (e.g. name,instagram-followers)
        #[arg(long)]
        columns: Option<String>,
        /// Write to this file, or into this directory under the default name
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build a side-by-side comparison from institution ids
    Compare {
        /// Ids toggled into the selection in order
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show industry benchmark constants
    Benchmarks,
    /// Key research findings, most urgent first
    Findings,
    /// Strategy recommendations at or above a priority
    Recommendations {
        /// immediate, high, medium, or low
        #[arg(long, default_value = "low")]
        priority: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli, unibench_core::load_app_config)
}

/// Dispatch a parsed command line. Configuration is loaded only once a
/// subcommand needs it, so a bad environment never blocks the bare command.
fn run<F>(cli: Cli, load_config: F) -> anyhow::Result<()>
where
    F: FnOnce() -> Result<AppConfig, ConfigError>,
{
    let Some(command) = cli.command else {
        println!("unibench: run `unibench --help` for available commands");
        return Ok(());
    };

    let config = load_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let dataset_path = cli.dataset.unwrap_or(config.dataset_path.clone());
    let store = DatasetStore::load(&dataset_path)?;
    tracing::debug!(
        path = %dataset_path.display(),
        institutions = store.all().len(),
        "dataset loaded"
    );

    match command {
        Commands::List {
            search,
            platform,
            sort,
        } => explore::run_list(&store, &search, &platform, &sort, cli.json)?,
        Commands::Show { id } => explore::run_show(&store, &id, cli.json)?,
        Commands::Gap { field, against } => {
            analyze::run_gap(&store, &field, against.as_deref(), cli.json)?;
        }
        Commands::Rank { field } => analyze::run_rank(&store, &field, cli.json)?,
        Commands::Stats { field } => analyze::run_stats(&store, &field, cli.json)?,
        Commands::Project {
            start,
            horizon,
            posts,
            short_form,
            platform_adoption,
        } => project::run_project(
            &store,
            &project::ProjectArgs {
                start,
                horizon,
                posts,
                short_form,
                platform_adoption,
            },
            cli.json,
        )?,
        Commands::Export { columns, output } => {
            explore::run_export(&store, columns.as_deref(), output.as_deref())?;
        }
        Commands::Compare { ids } => {
            explore::run_compare(&store, &ids, config.compare_capacity, cli.json)?;
        }
        Commands::Benchmarks => analyze::run_benchmarks(&store, cli.json)?,
        Commands::Findings => report::run_findings(&store, cli.json)?,
        Commands::Recommendations { priority } => {
            report::run_recommendations(&store, &priority, cli.json)?;
        }
    }

    Ok(())
}
