//! CLI entry point for listing_stats.
//!
//! Reads the calendar and listings datasets, aggregates averages per
//! neighbourhood and room type, then opens the chart menu, prints a summary,
//! or exports the averages to CSV.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use listing_stats::analyzers::aggregate::{SeriesTable, group_averages};
use listing_stats::listings::{self, ListingsSummary};
use listing_stats::menu::Menu;
use listing_stats::output::{SummaryReport, print_json, print_pretty, write_averages_csv};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "listing_stats")]
#[command(about = "Occupancy, price and rating by neighbourhood and room type", long_about = None)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct DataArgs {
    /// Gzip-compressed calendar CSV
    #[arg(long, env = "CALENDAR_PATH", default_value = "files/calendar.csv.gz", global = true)]
    calendar: PathBuf,

    /// Gzip-compressed listings CSV
    #[arg(long, env = "LISTINGS_PATH", default_value = "files/listings.csv.gz", global = true)]
    listings: PathBuf,

    /// City name shown in titles
    #[arg(long, env = "CITY_NAME", default_value = "Copenhagen", global = true)]
    city: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chart menu (default)
    Menu,
    /// Print averages for every neighbourhood and room type
    Summary {
        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write averages for every neighbourhood and room type to a CSV file
    Export {
        /// CSV file to write
        #[arg(short, long, default_value = "averages.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/listing_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("listing_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let data = cli.data;

    info!(
        calendar = %data.calendar.display(),
        listings = %data.listings.display(),
        "Loading datasets"
    );
    let summary = listings::load(&data.calendar, &data.listings)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => run_menu(&data.city, &summary)?,
        Commands::Summary { json } => {
            let rows = group_averages(&summary);
            let mut stdout = std::io::stdout().lock();
            if json {
                let report = SummaryReport::new(&data.city, summary.stats, &rows);
                print_json(&mut stdout, &report)?;
            } else {
                print_pretty(&mut stdout, &data.city, &rows)?;
            }
        }
        Commands::Export { output } => {
            let rows = group_averages(&summary);
            write_averages_csv(&output, &rows)?;
        }
    }

    Ok(())
}

fn run_menu(city: &str, summary: &ListingsSummary) -> Result<()> {
    let table = SeriesTable::build(summary);
    info!(
        neighbourhoods = table.neighbourhoods.len(),
        room_types = table.room_types.len(),
        "Chart series ready"
    );

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut stdout = std::io::stdout().lock();
    Menu::new(city, &table).run(&mut input, &mut stdout)
}
