use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use dashboard::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fitness dashboard route and summary tools", long_about = None)]
struct Cli {
    /// JSON config file (environment variables still override it)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the speed heatmap gradient for a GPX route
    Gradient(GradientArgs),
    /// Print distance, duration, and map region for a GPX route
    Route {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },
    /// Load GPX files as runs and print the dashboard summary
    Summary(SummaryArgs),
}

#[derive(Parser, Debug)]
struct GradientArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Spacing between analysis samples, in meters
    #[arg(long)]
    sample_distance: Option<f64>,

    /// Fallback route color as RRGGBB
    #[arg(long)]
    default_color: Option<Color>,

    /// Stop placement: window or legacy
    #[arg(long)]
    alignment: Option<StopAlignment>,
}

#[derive(Parser, Debug)]
struct SummaryArgs {
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    inputs: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = RangeArg::Today)]
    range: RangeArg,

    /// Reference time (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RangeArg {
    Today,
    Yesterday,
    #[value(name = "last7-days")]
    Last7Days,
}

impl From<RangeArg> for SummaryRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::Today => SummaryRange::Today,
            RangeArg::Yesterday => SummaryRange::Yesterday,
            RangeArg::Last7Days => SummaryRange::Last7Days,
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    let config = match path {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::from_env().context("reading config from environment")?,
    };
    Ok(config)
}

fn read_route(path: &Path) -> Result<Vec<LocationSample>> {
    let points = load_route(path).with_context(|| format!("loading route {}", path.display()))?;
    tracing::info!("Loaded {} route points from {}", points.len(), path.display());
    Ok(points)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn run_gradient(mut config: DashboardConfig, args: GradientArgs) -> Result<()> {
    if let Some(meters) = args.sample_distance {
        config.sample_distance_meters = meters;
    }
    if let Some(alignment) = args.alignment {
        config.stop_alignment = alignment;
    }
    if let Some(color) = args.default_color {
        config.default_route_color = color;
    }
    config.validate()?;

    let points = read_route(&args.input)?;
    let gradient = config
        .heatmap_generator()
        .gradient(&points, config.default_route_color);
    print_json(&gradient)
}

fn run_route(input: &Path) -> Result<()> {
    let points = read_route(input)?;
    let metrics = score_route(&points);
    let region = RouteRegion::from_points(&points);
    print_json(&serde_json::json!({
        "metrics": metrics,
        "region": region,
    }))
}

async fn run_summary(config: DashboardConfig, args: SummaryArgs) -> Result<()> {
    let now = match &args.now {
        Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)
            .with_context(|| format!("invalid --now value {raw:?}"))?,
        None => OffsetDateTime::now_utc(),
    };

    let provider = InMemoryProvider::new();
    for input in &args.inputs {
        let points = read_route(input)?;
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            bail!("{} has no timestamped points", input.display());
        };

        let mut workout =
            Workout::new(WorkoutActivityType::Running, first.timestamp, last.timestamp);
        workout.distance_meters = Some(score_route(&points).distance_meters);
        provider.add_workout(workout, points);
    }

    let aggregator = SummaryAggregator::with_config(provider, &config);
    let summary = aggregator.fetch_summary(args.range.into(), now).await;
    print_json(&summary)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Gradient(args) => run_gradient(config, args),
        Command::Route { input } => run_route(&input),
        Command::Summary(args) => run_summary(config, args).await,
    }
}
