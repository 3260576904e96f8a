//! Heritage report CLI
//!
//! Loads a JSON dataset into in-memory stores and prints one report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use heritage_report::storage::{Dataset, InMemoryStores};
use heritage_report::{Config, ReportEngine, ReportRequest, ReportRuntime};

#[derive(Parser, Debug)]
#[command(name = "report-cli")]
#[command(about = "Generate a filtered dashboard report from a dataset")]
struct Args {
    /// Dataset JSON file
    #[arg(long, env = "HERITAGE_DATASET")]
    dataset: PathBuf,

    /// TOML configuration file
    #[arg(long, env = "HERITAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Record kind (`tradition`, `publicPolicy`, `ethnicGroup`, `creativeActivity`) or `all`
    #[arg(long)]
    data_type: Option<String>,

    /// Buddhist Era year, e.g. 2566, or `all`
    #[arg(long)]
    year: Option<String>,

    /// Region, or `all`
    #[arg(long)]
    region: Option<String>,

    /// Province, or `all`
    #[arg(long)]
    province: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print only the overview counts
    #[arg(long)]
    overview_only: bool,
}

impl Args {
    fn request(&self) -> ReportRequest {
        ReportRequest {
            data_type: self.data_type.clone(),
            year: self.year.clone(),
            region: self.region.clone(),
            province: self.province.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heritage_report=warn,report_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("{message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, String> {
    let config = match &args.config {
        Some(path) => Config::load(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };

    let dataset = Dataset::load(&args.dataset).map_err(|e| e.to_string())?;
    info!(records = dataset.len(), path = %args.dataset.display(), "dataset loaded");
    let stores = InMemoryStores::from_dataset(dataset).map_err(|e| e.to_string())?;

    let engine = ReportEngine::new(stores.record_stores())
        .with_user_count(stores.users.clone())
        .with_config(config.engine);
    let runtime = ReportRuntime::new(engine, &config.runtime).map_err(|e| e.to_string())?;

    let request = args.request();
    let value = if args.overview_only {
        let overview = runtime.overview(request).map_err(|e| e.to_string())?;
        serde_json::to_value(overview)
    } else {
        let report = runtime.generate(request).map_err(|e| e.to_string())?;
        serde_json::to_value(report)
    }
    .map_err(|e| e.to_string())?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    output.map_err(|e| e.to_string())
}
