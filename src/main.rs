//! CLI entry point for the bike rental dashboard.
//!
//! Loads the daily and hourly datasets, then prints the date bounds, a
//! report for a selected date range, or exports the chart series as CSV.

use anyhow::{Context, Result};
use bike_rental_dashboard::{
    DashboardStats, LabelConfig, RentalDataset,
    output::{export_series, print_pretty, render_json, render_text},
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_rental_dashboard")]
#[command(about = "Summaries of daily and hourly bike rental data", long_about = None)]
struct Cli {
    /// Daily records CSV [env: DASHBOARD_DAY_CSV, default: day_data.csv]
    #[arg(long, global = true, value_name = "FILE")]
    day: Option<String>,

    /// Hourly records CSV [env: DASHBOARD_HOUR_CSV, default: hour_data.csv]
    #[arg(long, global = true, value_name = "FILE")]
    hour: Option<String>,

    /// JSON file with season and weather labels [env: DASHBOARD_LABELS]
    #[arg(long, global = true, value_name = "FILE")]
    labels: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RangeArgs {
    /// First day of the range (YYYY-MM-DD), defaults to the earliest date
    #[arg(short, long)]
    start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD), defaults to the latest date
    #[arg(short, long)]
    end: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the earliest and latest dates in the daily data
    Bounds,
    /// Print every summary for a date range
    Report {
        #[command(flatten)]
        range: RangeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Write each chart series for a date range as a CSV file
    Export {
        #[command(flatten)]
        range: RangeArgs,

        /// Directory to write the CSV files to
        #[arg(short, long, default_value = "series")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bike_rental_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bike_rental_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", LevelFilter::INFO));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let dataset = load_dataset(&cli)?;

    match cli.command {
        Commands::Bounds => match dataset.bounds() {
            Some(bounds) => println!("{} {}", bounds.start, bounds.end),
            None => anyhow::bail!("the daily dataset has no rows"),
        },
        Commands::Report { range, format } => {
            let stats = build_stats(&dataset, &range)?;
            print_pretty(&stats);
            match format {
                Format::Text => print!("{}", render_text(&stats)),
                Format::Json => println!("{}", render_json(&stats)?),
            }
        }
        Commands::Export { range, output_dir } => {
            let stats = build_stats(&dataset, &range)?;
            let paths = export_series(&output_dir, &stats)?;
            for path in paths {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Filter read from `var`, falling back to `default` when the variable is
/// unset or empty.
fn env_filter(var: &str, default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(var)
        .from_env_lossy()
}

/// Builds the report, pointing range failures at the `bounds` command.
fn build_stats(dataset: &RentalDataset, range: &RangeArgs) -> Result<DashboardStats> {
    DashboardStats::build(dataset, range.start, range.end).map_err(|e| {
        if e.is_range_error() {
            anyhow::Error::new(e)
                .context("the selected date range is not usable; run `bounds` to see valid dates")
        } else {
            e.into()
        }
    })
}

/// Resolves input paths from flags, then env vars, then defaults, and loads
/// both datasets.
fn load_dataset(cli: &Cli) -> Result<RentalDataset> {
    let day_path = setting(&cli.day, "DASHBOARD_DAY_CSV").unwrap_or_else(|| "day_data.csv".into());
    let hour_path =
        setting(&cli.hour, "DASHBOARD_HOUR_CSV").unwrap_or_else(|| "hour_data.csv".into());

    let labels = match setting(&cli.labels, "DASHBOARD_LABELS") {
        Some(path) => {
            info!(path = %path, "Loading label tables");
            LabelConfig::load(&path).with_context(|| format!("loading labels from {path}"))?
        }
        None => LabelConfig::default(),
    };

    RentalDataset::load(&day_path, &hour_path, labels)
        .with_context(|| format!("loading datasets {day_path} and {hour_path}"))
}

fn setting(flag: &Option<String>, env_key: &str) -> Option<String> {
    flag.clone()
        .or_else(|| std::env::var(env_key).ok())
        .filter(|v| !v.is_empty())
}
