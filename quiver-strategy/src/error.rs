use quiver_indicators::IndicatorError;
use thiserror::Error;

/// Result alias used across the strategy crate.
pub type StrategyResult<T> = Result<T, StrategyError>;

/// Failure variants surfaced while evaluating a strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Raised when the backtest parameters are inconsistent.
    #[error("configuration is invalid: {0}")]
    InvalidConfig(String),
    /// Raised when the series is too short to produce a single return.
    #[error("not enough historical data to compute returns")]
    NotEnoughData,
    /// Raised when a price cannot take part in a return computation.
    #[error("price {price} at index {index} cannot be used to compute a return")]
    InvalidPrice {
        /// Position of the offending price in the series.
        index: usize,
        /// The offending price.
        price: f64,
    },
    /// Raised when a moving average cannot be computed.
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}
