use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use quiver_data::ReadMode;
use quiver_strategy::{run_backtest, BacktestConfig, BacktestReport, StrategyStats};
use tracing::info;

/// Inputs of one crossover backtest.
#[derive(Debug, Clone)]
pub struct BacktestRequest {
    /// Close-price series file.
    pub input: PathBuf,
    /// Windows and risk-free rate.
    pub config: BacktestConfig,
    /// How the reader treats trailing payload bytes.
    pub mode: ReadMode,
}

pub fn run_backtest_file(request: &BacktestRequest) -> Result<BacktestReport> {
    info!(path = %request.input.display(), "loading price series");
    let prices = quiver_data::load_with(&request.input, request.mode)
        .with_context(|| format!("failed to load {}", request.input.display()))?;
    info!(
        points = prices.len(),
        fast = request.config.fast,
        slow = request.config.slow,
        "running crossover backtest"
    );
    let report = run_backtest(&prices, &request.config).context("backtest failed")?;
    info!(
        sma_trades = report.sma.stats.trades,
        ema_trades = report.ema.stats.trades,
        "done"
    );
    Ok(report)
}

/// Formats both families as `<FAMILY> <Metric>: <value>` lines, four decimals.
pub fn render_report(report: &BacktestReport) -> String {
    let mut out = String::new();
    render_family(&mut out, "SMA", &report.sma.stats);
    out.push('\n');
    render_family(&mut out, "EMA", &report.ema.stats);
    out
}

fn render_family(out: &mut String, family: &str, stats: &StrategyStats) {
    let rows = [
        ("Total Simple Return", stats.total_simple_return),
        ("Total Log Return", stats.total_log_return),
        ("Max Drawdown", stats.max_drawdown),
        ("Sharpe Ratio", stats.sharpe_ratio),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{family} {label}: {value:.4}");
    }
    let _ = writeln!(out, "{family} Trades: {}", stats.trades);
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn request(input: PathBuf, fast: usize, slow: usize) -> BacktestRequest {
        BacktestRequest {
            input,
            config: BacktestConfig {
                fast,
                slow,
                risk_free_rate: 0.0,
            },
            mode: ReadMode::Lenient,
        }
    }

    #[test]
    fn renders_both_families() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("close.npy");
        quiver_data::save(&input, &[3.0, 2.0, 1.0, 2.0, 3.0, 4.0]).unwrap();

        let report = run_backtest_file(&request(input, 1, 2)).unwrap();
        let text = render_report(&report);

        assert!(text.contains("SMA Total Simple Return: 1.0000\n"));
        assert!(text.contains("SMA Total Log Return: 0.6931\n"));
        assert!(text.contains("SMA Max Drawdown: 0.0000\n"));
        assert!(text.contains("EMA Trades: 1\n"));
        assert!(text.find("SMA Sharpe Ratio").unwrap() < text.find("EMA Total").unwrap());
    }

    #[test]
    fn invalid_windows_surface_as_errors() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("close.npy");
        quiver_data::save(&input, &[1.0, 2.0, 3.0]).unwrap();

        let err = run_backtest_file(&request(input, 3, 2)).unwrap_err();
        assert!(format!("{err:#}").contains("must be shorter than slow window"));
    }
}
