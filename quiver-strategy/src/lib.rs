#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

/// Orchestration of a full crossover backtest.
pub mod backtest;
mod error;
/// Return series derived from prices.
pub mod returns;
/// Crossover signal generation.
pub mod signal;
/// Performance statistics.
pub mod stats;

pub use backtest::{
    equity_curve, positions, run_backtest, BacktestConfig, BacktestReport, StrategyRun,
    StrategyStats,
};
pub use error::{StrategyError, StrategyResult};
pub use returns::{log_returns, simple_returns, total_log_return, total_simple_return};
pub use signal::{crossover_signals, Signal};
pub use stats::{max_drawdown, sharpe_ratio};
