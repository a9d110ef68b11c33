use quiver_indicators::{compute_ema, compute_sma};
use tracing::debug;

use crate::error::{StrategyError, StrategyResult};
use crate::returns::{log_returns, simple_returns, total_log_return, total_simple_return};
use crate::signal::{crossover_signals, Signal};
use crate::stats::{max_drawdown, sharpe_ratio};

/// Parameters of a crossover backtest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    /// Window of the fast moving average.
    pub fast: usize,
    /// Window of the slow moving average.
    pub slow: usize,
    /// Per-period risk-free rate subtracted in the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            fast: 10,
            slow: 30,
            risk_free_rate: 0.0,
        }
    }
}

impl BacktestConfig {
    /// Checks that both windows are usable and the fast one is shorter.
    pub fn validate(&self) -> StrategyResult<()> {
        if self.fast == 0 || self.slow == 0 {
            return Err(StrategyError::InvalidConfig(
                "fast and slow windows must be at least 1".into(),
            ));
        }
        if self.fast >= self.slow {
            return Err(StrategyError::InvalidConfig(format!(
                "fast window ({}) must be shorter than slow window ({})",
                self.fast, self.slow
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(StrategyError::InvalidConfig(
                "risk_free_rate must be a finite number".into(),
            ));
        }
        Ok(())
    }
}

/// Summary figures of one strategy run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyStats {
    /// Compounded simple return of the strategy.
    pub total_simple_return: f64,
    /// Summed log return of the strategy.
    pub total_log_return: f64,
    /// Largest equity drawdown as a fraction of the running peak.
    pub max_drawdown: f64,
    /// Sharpe ratio of the strategy's per-period simple returns.
    pub sharpe_ratio: f64,
    /// Number of times the book went from flat to long.
    pub trades: usize,
}

/// Signals, book and outcome of one moving-average family.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    /// Crossover signal per price.
    pub signals: Vec<Signal>,
    /// Exposure per price, `1.0` long or `0.0` flat.
    pub positions: Vec<f64>,
    /// Equity curve starting at `1.0`.
    pub equity: Vec<f64>,
    /// Summary figures.
    pub stats: StrategyStats,
}

/// Outcome of a backtest for both moving-average families.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    /// Crossover of simple moving averages.
    pub sma: StrategyRun,
    /// Crossover of exponential moving averages.
    pub ema: StrategyRun,
}

/// Replays signals as a long-or-flat book: long from a buy, flat from a sell.
pub fn positions(signals: &[Signal]) -> Vec<f64> {
    let mut held = 0.0;
    signals
        .iter()
        .map(|signal| {
            match signal {
                Signal::Buy => held = 1.0,
                Signal::Sell => held = 0.0,
                Signal::Hold => {}
            }
            held
        })
        .collect()
}

/// Equity of a book holding `positions` over `prices`, starting at `1.0`.
///
/// The exposure at index `i - 1` earns the return from `i - 1` to `i`.
pub fn equity_curve(prices: &[f64], positions: &[f64]) -> StrategyResult<Vec<f64>> {
    let len = prices.len().min(positions.len());
    let returns = simple_returns(&prices[..len])?;
    Ok(compound(&exposed(positions, &returns), len))
}

/// Computes SMA and EMA crossovers over `prices` and evaluates each.
pub fn run_backtest(prices: &[f64], config: &BacktestConfig) -> StrategyResult<BacktestReport> {
    config.validate()?;
    if prices.len() < 2 {
        return Err(StrategyError::NotEnoughData);
    }
    let simple = simple_returns(prices)?;
    let log = log_returns(prices)?;

    let sma = evaluate(
        &compute_sma(prices, config.fast)?,
        &compute_sma(prices, config.slow)?,
        &simple,
        &log,
        config.risk_free_rate,
    );
    let ema = evaluate(
        &compute_ema(prices, config.fast)?,
        &compute_ema(prices, config.slow)?,
        &simple,
        &log,
        config.risk_free_rate,
    );
    debug!(
        prices = prices.len(),
        fast = config.fast,
        slow = config.slow,
        sma_trades = sma.stats.trades,
        ema_trades = ema.stats.trades,
        "backtest complete"
    );
    Ok(BacktestReport { sma, ema })
}

fn evaluate(
    fast: &[f64],
    slow: &[f64],
    simple: &[f64],
    log: &[f64],
    risk_free_rate: f64,
) -> StrategyRun {
    let signals = crossover_signals(fast, slow);
    let positions = positions(&signals);
    let strategy_simple = exposed(&positions, simple);
    let strategy_log = exposed(&positions, log);
    let equity = compound(&strategy_simple, positions.len());

    let stats = StrategyStats {
        total_simple_return: total_simple_return(&strategy_simple),
        total_log_return: total_log_return(&strategy_log),
        max_drawdown: max_drawdown(&equity),
        sharpe_ratio: sharpe_ratio(&strategy_simple, risk_free_rate),
        trades: entries(&positions),
    };
    StrategyRun {
        signals,
        positions,
        equity,
        stats,
    }
}

/// Per-period returns earned by the book; `returns[i]` runs from `i` to `i + 1`.
fn exposed(positions: &[f64], returns: &[f64]) -> Vec<f64> {
    positions.iter().zip(returns).map(|(held, r)| held * r).collect()
}

fn compound(returns: &[f64], len: usize) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    let mut equity = Vec::with_capacity(len);
    let mut value = 1.0;
    equity.push(value);
    for r in returns.iter().take(len - 1) {
        value *= 1.0 + r;
        equity.push(value);
    }
    equity
}

fn entries(positions: &[f64]) -> usize {
    let mut prev = 0.0;
    positions
        .iter()
        .filter(|&&held| {
            let entered = held > prev;
            prev = held;
            entered
        })
        .count()
}
