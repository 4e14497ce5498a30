//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::{PortfolioError, Result};
use crate::domain::metrics::PerformanceSummary;
use crate::domain::pipeline;
use crate::domain::request::{AnalysisRequest, NumericField, RawAnalysisRequest};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_source::PriceSource;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-figures",
    about = "Risk and return figures for a BTC/ETH/GOLD allocation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute performance figures for an allocation
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// CSV price file, overriding the configured source
        #[arg(short, long)]
        prices: Option<PathBuf>,
        #[arg(long, allow_negative_numbers = true)]
        btc: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        eth: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        gold: Option<f64>,
        #[arg(long)]
        past_years: Option<u32>,
        /// End of the lookback window (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Load a CSV price file into the SQLite store
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show the date range of the configured price source
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        prices: Option<PathBuf>,
    },
    /// Start the HTTP server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Allocation values given on the command line; each overrides the config.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationArgs {
    pub btc: Option<f64>,
    pub eth: Option<f64>,
    pub gold: Option<f64>,
    pub past_years: Option<u32>,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Analyze {
            config,
            prices,
            btc,
            eth,
            gold,
            past_years,
            as_of,
        } => {
            let args = AllocationArgs {
                btc,
                eth,
                gold,
                past_years,
            };
            run_analyze(config.as_deref(), prices.as_deref(), args, as_of)
        }
        Command::Import { config, csv } => run_import(&config, &csv),
        Command::Info { config, prices } => run_info(config.as_deref(), prices.as_deref()),
        Command::Serve { config } => run_serve(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| PortfolioError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_optional_config(path: Option<&Path>) -> Result<Option<FileConfigAdapter>> {
    path.map(load_config).transpose()
}

/// Merges command-line values over the `[allocation]` section and validates them.
pub fn resolve_request(
    args: AllocationArgs,
    config: Option<&dyn ConfigPort>,
) -> Result<AnalysisRequest> {
    let pick = |flag: Option<f64>, key: &str| {
        flag.map(NumericField::Number).or_else(|| {
            config
                .and_then(|c| c.get_string("allocation", key))
                .map(NumericField::Text)
        })
    };

    let raw = RawAnalysisRequest {
        btc_allocation: pick(args.btc, "btc"),
        eth_allocation: pick(args.eth, "eth"),
        gold_allocation: pick(args.gold, "gold"),
        past_years: pick(args.past_years.map(f64::from), "past_years"),
    };
    raw.validate()
}

/// Chooses the price source: an explicit CSV path, else `[data] source`.
pub fn open_price_source(
    prices: Option<&Path>,
    config: Option<&dyn ConfigPort>,
) -> Result<Box<dyn PriceSource + Send + Sync>> {
    if let Some(path) = prices {
        return Ok(Box::new(CsvAdapter::new(path.to_path_buf())));
    }

    let config = config.ok_or_else(|| PortfolioError::ConfigMissing {
        section: "data".into(),
        key: "csv_path".into(),
    })?;

    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .to_lowercase();

    match source.as_str() {
        "csv" => {
            let path = config.get_string("data", "csv_path").ok_or_else(|| {
                PortfolioError::ConfigMissing {
                    section: "data".into(),
                    key: "csv_path".into(),
                }
            })?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(path))))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let adapter = crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?;
            adapter.initialize_schema()?;
            Ok(Box::new(adapter))
        }
        other => Err(PortfolioError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unsupported source {other:?}"),
        }),
    }
}

pub fn analyze_with(
    source: &dyn PriceSource,
    request: &AnalysisRequest,
    as_of: Option<NaiveDate>,
) -> Result<PerformanceSummary> {
    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    pipeline::analyze(source, request, as_of)
}

fn run_analyze(
    config_path: Option<&Path>,
    prices: Option<&Path>,
    args: AllocationArgs,
    as_of: Option<NaiveDate>,
) -> Result<()> {
    let config = load_optional_config(config_path)?;
    let config_port = config.as_ref().map(|c| c as &dyn ConfigPort);

    let request = resolve_request(args, config_port)?;
    let source = open_price_source(prices, config_port)?;
    let summary = analyze_with(source.as_ref(), &request, as_of)?;

    let json = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}

#[cfg(feature = "sqlite")]
fn run_import(config_path: &Path, csv_path: &Path) -> Result<()> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let config = load_config(config_path)?;
    let store = SqliteAdapter::from_config(&config)?;
    store.initialize_schema()?;

    let records = CsvAdapter::new(csv_path.to_path_buf()).read_all()?;
    let count = store.insert_records(&records)?;
    eprintln!("Imported {} price records from {}", count, csv_path.display());
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
fn run_import(_config_path: &Path, _csv_path: &Path) -> Result<()> {
    Err(PortfolioError::ConfigInvalid {
        section: "data".into(),
        key: "source".into(),
        reason: "sqlite feature is required for import".into(),
    })
}

fn run_info(config_path: Option<&Path>, prices: Option<&Path>) -> Result<()> {
    let config = load_optional_config(config_path)?;
    let config_port = config.as_ref().map(|c| c as &dyn ConfigPort);
    let source = open_price_source(prices, config_port)?;

    match source.data_range()? {
        Some((first, last, count)) => println!("{count} records, {first} to {last}"),
        None => eprintln!("No price data found"),
    }
    Ok(())
}

#[cfg(feature = "web")]
fn run_serve(config_path: &Path) -> Result<()> {
    use crate::adapters::web::{AppState, build_router};
    use std::net::SocketAddr;
    use std::sync::Arc;

    let config = load_config(config_path)?;
    let source: Arc<dyn PriceSource + Send + Sync> =
        Arc::from(open_price_source(None, Some(&config))?);

    let listen = config
        .get_string("web", "listen")
        .unwrap_or_else(|| "127.0.0.1:3000".to_string());
    let addr: SocketAddr = listen.parse().map_err(|_| PortfolioError::ConfigInvalid {
        section: "web".into(),
        key: "listen".into(),
        reason: format!("{listen:?} is not a socket address"),
    })?;

    let router = build_router(AppState::new(source));

    tokio::runtime::Runtime::new()?.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "web server listening");
        axum::serve(listener, router).await
    })?;
    Ok(())
}

#[cfg(not(feature = "web"))]
fn run_serve(_config_path: &Path) -> Result<()> {
    Err(PortfolioError::ConfigInvalid {
        section: "web".into(),
        key: "listen".into(),
        reason: "web feature is required for serve".into(),
    })
}
