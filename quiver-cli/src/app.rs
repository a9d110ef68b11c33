use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quiver_config::PipelineConfig;
use quiver_data::{CsvOptions, ReadMode};
use quiver_strategy::BacktestConfig;
use tracing::info;

use crate::backtest::{render_report, run_backtest_file, BacktestRequest};
use crate::pipeline::{run_pipeline, PipelineRequest};
use crate::telemetry::init_tracing;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Moving-average pipeline and crossover backtests over NPY price files"
)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute SMA and EMA for a price file and save both series
    Run {
        /// Input array file holding the price series
        input: PathBuf,

        /// Output prefix; results go to <prefix>_sma.npy and <prefix>_ema.npy
        output_prefix: PathBuf,

        /// Indicator window (defaults to the configured window)
        #[arg(short, long)]
        window: Option<usize>,

        /// Reject payloads that do not match the header shape exactly
        #[arg(long)]
        strict: bool,
    },
    /// Print the header of an array file
    Inspect {
        /// Array file to inspect
        path: PathBuf,
    },
    /// Extract one price column of a CSV file into an array file
    Convert {
        /// CSV input, one OHLCVT row per line
        input: PathBuf,

        /// Array file to write
        output: PathBuf,

        /// Zero-based column holding the price (4 is the close of OHLCVT rows)
        #[arg(long, default_value_t = 4)]
        column: usize,

        /// Skip the first row of the CSV file
        #[arg(long)]
        has_headers: bool,
    },
    /// Backtest SMA and EMA crossover strategies over a price file
    Backtest {
        /// Input array file holding the close prices
        input: PathBuf,

        /// Fast moving-average window (defaults to the configured value)
        #[arg(long)]
        fast: Option<usize>,

        /// Slow moving-average window (defaults to the configured value)
        #[arg(long)]
        slow: Option<usize>,

        /// Per-period risk-free rate for the Sharpe ratio
        #[arg(long)]
        risk_free_rate: Option<f64>,

        /// Reject payloads that do not match the header shape exactly
        #[arg(long)]
        strict: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config =
        PipelineConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.log_level)?;

    match cli.command {
        Commands::Run {
            input,
            output_prefix,
            window,
            strict,
        } => {
            let mode = read_mode(strict, &config);
            let output = run_pipeline(&PipelineRequest {
                input,
                output_prefix,
                window: window.unwrap_or(config.window),
                mode,
                preview: config.preview,
            })?;
            println!("{}", output.sma_path.display());
            println!("{}", output.ema_path.display());
        }
        Commands::Inspect { path } => {
            let header = quiver_data::inspect(&path)
                .with_context(|| format!("failed to inspect {}", path.display()))?;
            println!("version: {}", header.version);
            println!("header length: {}", header.header_len);
            println!("descr: {}", header.descr);
            println!("fortran order: {}", header.fortran_order);
            println!("shape: {:?}", header.shape);
            println!("payload offset: {}", header.payload_offset()?);
        }
        Commands::Convert {
            input,
            output,
            column,
            has_headers,
        } => {
            let options = CsvOptions {
                column,
                has_headers,
                ..CsvOptions::default()
            };
            let rows = quiver_data::convert_csv(&input, &output, &options)
                .with_context(|| format!("failed to convert {}", input.display()))?;
            info!(rows, path = %output.display(), "saved price column");
            println!("{}", output.display());
        }
        Commands::Backtest {
            input,
            fast,
            slow,
            risk_free_rate,
            strict,
        } => {
            let defaults = config.backtest;
            let report = run_backtest_file(&BacktestRequest {
                input,
                config: BacktestConfig {
                    fast: fast.unwrap_or(defaults.fast),
                    slow: slow.unwrap_or(defaults.slow),
                    risk_free_rate: risk_free_rate.unwrap_or(defaults.risk_free_rate),
                },
                mode: read_mode(strict, &config),
            })?;
            print!("{}", render_report(&report));
        }
    }
    Ok(())
}

fn read_mode(strict: bool, config: &PipelineConfig) -> ReadMode {
    if strict {
        ReadMode::Strict
    } else {
        config.codec.mode
    }
}
