//! Core traits and shared error type for indicator implementations.

use thiserror::Error;

/// Result alias used across the indicator crate.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// Errors produced while constructing or driving an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// The lookback window must be at least one observation.
    #[error("{name} window must be greater than zero (got {period})")]
    InvalidPeriod {
        /// Indicator that rejected the window.
        name: &'static str,
        /// The offending window length.
        period: usize,
    },
    /// The indicator needs at least one observation to produce output.
    #[error("{name} requires at least one observation")]
    EmptySeries {
        /// Indicator that rejected the series.
        name: &'static str,
    },
}

impl IndicatorError {
    /// Convenience constructor for [`IndicatorError::InvalidPeriod`].
    pub fn invalid_period(name: &'static str, period: usize) -> Self {
        Self::InvalidPeriod { name, period }
    }

    /// Convenience constructor for [`IndicatorError::EmptySeries`].
    pub fn empty_series(name: &'static str) -> Self {
        Self::EmptySeries { name }
    }
}

/// Values that can be fed into an indicator.
pub trait Input {
    /// Returns the observation as a double.
    fn value(&self) -> f64;
}

impl Input for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

impl Input for &f64 {
    fn value(&self) -> f64 {
        **self
    }
}

impl Input for f32 {
    fn value(&self) -> f64 {
        f64::from(*self)
    }
}

/// A stateful indicator that consumes one observation at a time.
pub trait Indicator {
    /// Type of each observation.
    type Input;
    /// Type of each emitted value.
    type Output;

    /// Feeds the next observation. Returns `None` while the indicator is warming up.
    fn next(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Clears all accumulated state.
    fn reset(&mut self);
}

pub(crate) fn f64_from_usize(value: usize) -> f64 {
    value as f64
}
