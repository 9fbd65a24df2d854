//! Bagging Explorer CLI: proxy server and terminal walkthrough.
//!
//! Runs the training-backend proxy, walks through the six steps of the
//! explorer against a backend (or its demo fallback), and renders saved
//! results and CSV datasets in the terminal.

mod commands;
mod render;

use bagging_core::{BaseModel, ComparisonModel, DatasetOption};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Bagging Explorer: learn bootstrap aggregation step by step
#[derive(Parser, Debug)]
#[command(name = "bagging-explorer", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the proxy server in front of the training backend
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Training backend base URL
        #[arg(long)]
        backend_url: Option<String>,
    },
    /// Run the six-step walkthrough and print the results
    Walkthrough {
        /// Built-in dataset: iris, wine or cancer
        #[arg(short, long, default_value = "iris")]
        dataset: DatasetOption,
        /// Use a CSV file instead of a built-in dataset
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Base model to bag
        #[arg(short, long, default_value = "Decision Tree")]
        base_model: BaseModel,
        /// Number of models in the ensemble (1-50)
        #[arg(short = 'n', long, default_value_t = 10)]
        estimators: i64,
        /// Ensemble methods to compare against (defaults: Random Forest, AdaBoost)
        #[arg(long, value_delimiter = ',')]
        compare: Option<Vec<ComparisonModel>>,
        /// Seed for demo data
        #[arg(long)]
        seed: Option<u64>,
        /// Save the training result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a saved training result
    Inspect {
        /// Result JSON file
        path: PathBuf,
    },
    /// Load, validate and preview a CSV dataset
    Dataset {
        /// CSV file with a header row
        path: PathBuf,
        /// Rows to preview
        #[arg(short, long, default_value_t = 5)]
        rows: usize,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file to the workspace
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "bagging", "bagging-explorer")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "bagging-explorer.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace, cli.config.as_deref()).await
}
