//! CLI entry point for the Amtrak ridership dashboard.
//!
//! Loads the ridership and station-coordinate sources once, then either
//! serves the interactive dashboard or prints a single view.

use amtrak_dashboard::config::{DEFAULT_COORDINATES_URL, DEFAULT_RIDERSHIP_URL, DashboardConfig};
use amtrak_dashboard::dashboard::Dashboard;
use amtrak_dashboard::dataset::{Dataset, Sources};
use amtrak_dashboard::fetch::BasicClient;
use amtrak_dashboard::output::{print_json, print_pretty, write_records, write_summary};
use amtrak_dashboard::server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "amtrak_dashboard")]
#[command(about = "Amtrak ridership actuals and forecasts dashboard", long_about = None)]
struct Cli {
    /// Ridership CSV (URL or path); defaults to $RIDERSHIP_URL or the published dataset
    #[arg(long, global = true)]
    ridership: Option<String>,

    /// Station coordinates CSV (URL or path); defaults to $COORDINATES_URL or the published dataset
    #[arg(long, global = true)]
    coordinates: Option<String>,

    /// Dashboard config JSON; defaults to $DASHBOARD_CONFIG when set
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive dashboard
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 8050)]
        port: u16,
    },
    /// Print the business line by year summary table
    Summary {
        /// Only show this business line
        #[arg(short, long)]
        business_line: Option<String>,

        /// Write the table to a CSV file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print monthly ridership of the top parent routes as a figure
    TopRoutes {
        #[arg(short, long)]
        business_line: String,

        #[arg(short, long)]
        year: i32,
    },
    /// Print the per-station small multiples for a parent route as a figure
    Stations {
        #[arg(short = 'r', long)]
        parent_route: String,
    },
    /// Print the station ranking for a business line, parent route and year
    Ranking {
        #[arg(short, long)]
        business_line: String,

        #[arg(short = 'r', long)]
        parent_route: String,

        #[arg(short, long)]
        year: i32,

        /// Write the ranking to a CSV file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

// Single-threaded: every view is a short synchronous computation.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();

    let cli = Cli::parse();

    let sources = Sources {
        ridership: cli
            .ridership
            .or_else(|| std::env::var("RIDERSHIP_URL").ok())
            .unwrap_or_else(|| DEFAULT_RIDERSHIP_URL.to_string()),
        coordinates: cli
            .coordinates
            .or_else(|| std::env::var("COORDINATES_URL").ok())
            .unwrap_or_else(|| DEFAULT_COORDINATES_URL.to_string()),
    };
    let config_path = cli.config.or_else(|| std::env::var("DASHBOARD_CONFIG").ok());
    let config = DashboardConfig::load_or_default(config_path.as_deref())?;

    let dataset = Dataset::load(&BasicClient::new(), &sources)
        .await
        .context("failed to load ridership dataset")?;
    let dashboard = Dashboard::new(dataset, config);

    match cli.command {
        Commands::Serve { bind, port } => {
            let addr: SocketAddr = format!("{bind}:{port}")
                .parse()
                .with_context(|| format!("invalid bind address '{bind}:{port}'"))?;
            server::serve(dashboard.shared(), addr).await;
        }
        Commands::Summary {
            business_line,
            output,
        } => {
            let table = dashboard.summary_table(business_line.as_deref());
            match output {
                Some(path) => write_summary(&path, &table)?,
                None => print_json(&table)?,
            }
        }
        Commands::TopRoutes {
            business_line,
            year,
        } => {
            let view = dashboard.top_routes(&business_line, year);
            print_pretty(&view);
            print_json(&view.to_figure())?;
        }
        Commands::Stations { parent_route } => {
            let view = dashboard.station_detail(&parent_route);
            info!(
                parent_route = %view.parent_route,
                rows = view.grid.rows,
                columns = view.grid.columns,
                "Station grid"
            );
            print_json(&view.to_figure(dashboard.config()))?;
        }
        Commands::Ranking {
            business_line,
            parent_route,
            year,
            output,
        } => {
            let ranking = dashboard
                .route_map(&business_line, &parent_route, year)
                .ranking();
            match output {
                Some(path) => write_records(&path, &ranking)?,
                None => print_json(&ranking)?,
            }
        }
    }

    Ok(())
}

/// Colored stderr plus a JSON daily rolling log file.
fn init_tracing() -> WorkerGuard {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/amtrak_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("amtrak_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}
