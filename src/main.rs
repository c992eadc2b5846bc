//! CLI entry point for the bike traffic mapper.
//!
//! Provides subcommands for rendering a marker frame for one time-of-day
//! selection, exporting per-station counts as CSV, and sweeping the full
//! day window by window.

use anyhow::{Context, Result};
use bike_traffic::app::App;
use bike_traffic::fetch::{BasicClient, load_source};
use bike_traffic::render::{append_counts_csv, write_json};
use bike_traffic::stations::parse_stations;
use bike_traffic::traffic::window::TimeFilter;
use bike_traffic::trips::parse_trips;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_traffic")]
#[command(about = "Aggregate and map bike-share station traffic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a marker frame for one time-of-day selection
    Render {
        /// Station metadata JSON, path or URL (default: $STATIONS_URL)
        #[arg(long)]
        stations: Option<String>,

        /// Trip records CSV, path or URL (default: $TRIPS_URL)
        #[arg(long)]
        trips: Option<String>,

        /// Center minute of the ±60-minute window; -1 shows all trips
        #[arg(long, default_value_t = -1)]
        at: i32,

        /// Output file for the frame JSON; "-" for stdout
        #[arg(short, long, default_value = "-")]
        output: String,
    },
    /// Export per-station counts as CSV rows
    Export {
        /// Station metadata JSON, path or URL (default: $STATIONS_URL)
        #[arg(long)]
        stations: Option<String>,

        /// Trip records CSV, path or URL (default: $TRIPS_URL)
        #[arg(long)]
        trips: Option<String>,

        /// Center minute of the ±60-minute window; -1 counts all trips
        #[arg(long, default_value_t = -1)]
        at: i32,

        /// CSV file to append counts to
        #[arg(short, long, default_value = "station_counts.csv")]
        output: String,
    },
    /// Render one frame per step across the whole day
    Sweep {
        /// Station metadata JSON, path or URL (default: $STATIONS_URL)
        #[arg(long)]
        stations: Option<String>,

        /// Trip records CSV, path or URL (default: $TRIPS_URL)
        #[arg(long)]
        trips: Option<String>,

        /// Minutes between frame centers
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(1..=1439))]
        step: u16,

        /// Output file for the frame array JSON; "-" for stdout
        #[arg(short, long, default_value = "-")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bike_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bike_traffic.log"));

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

    match cli.command {
        Commands::Render {
            stations,
            trips,
            at,
            output,
        } => {
            let mut app = load_app(stations, trips).await?;
            app.set_filter(TimeFilter::from_raw(at)?);

            let frame = app.frame();
            write_json(&output, &frame)?;
            info!(
                markers = frame.markers.len(),
                time = %frame.time_label,
                output = %output,
                "Frame written"
            );
        }
        Commands::Export {
            stations,
            trips,
            at,
            output,
        } => {
            let mut app = load_app(stations, trips).await?;
            app.set_filter(TimeFilter::from_raw(at)?);

            let enriched = app.enriched();
            append_counts_csv(&output, &enriched, app.filter())?;
            info!(rows = enriched.len(), output = %output, "Station counts exported");
        }
        Commands::Sweep {
            stations,
            trips,
            step,
            output,
        } => {
            let app = load_app(stations, trips).await?;

            let frames = app.sweep(step);
            write_json(&output, &frames)?;
            info!(frames = frames.len(), step, output = %output, "Day sweep written");
        }
    }

    Ok(())
}

fn resolve_source(arg: Option<String>, env_key: &str) -> Result<String> {
    match arg {
        Some(source) => Ok(source),
        None => std::env::var(env_key)
            .with_context(|| format!("no source given on the command line and {env_key} is unset")),
    }
}

/// Loads both sources concurrently and applies whatever arrived.
///
/// The loads complete in either order; a failed or unparseable source is
/// logged and simply leaves that side of the state empty, so the commands
/// still render what is available.
async fn load_app(stations_arg: Option<String>, trips_arg: Option<String>) -> Result<App> {
    let stations_src = resolve_source(stations_arg, "STATIONS_URL")?;
    let trips_src = resolve_source(trips_arg, "TRIPS_URL")?;

    let client = BasicClient::new();
    let (stations_bytes, trips_bytes) = tokio::join!(
        load_source(&client, &stations_src),
        load_source(&client, &trips_src),
    );

    let mut app = App::new();

    match stations_bytes.and_then(|bytes| parse_stations(&bytes)) {
        Ok(stations) => {
            info!(count = stations.len(), source = %stations_src, "Stations loaded");
            app.set_stations(stations);
        }
        Err(e) => error!(error = %e, source = %stations_src, "Station load failed"),
    }

    match trips_bytes.and_then(|bytes| parse_trips(&bytes)) {
        Ok(trips) => {
            info!(count = trips.len(), source = %trips_src, "Trips loaded");
            app.set_trips(trips);
        }
        Err(e) => error!(error = %e, source = %trips_src, "Trip load failed"),
    }

    Ok(app)
}
