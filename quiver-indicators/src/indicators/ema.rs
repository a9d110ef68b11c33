//! Exponential Moving Average (EMA).

use std::marker::PhantomData;

use crate::core::{f64_from_usize, Indicator, IndicatorError, Input};

/// Computes an exponentially-weighted moving average with `alpha = 2 / (period + 1)`.
///
/// The first observation seeds the average, so a value is produced for every
/// input; there is no warm-up period.
#[derive(Debug, Clone)]
pub struct Ema<I = f64> {
    period: usize,
    alpha: f64,
    state: Option<f64>,
    marker: PhantomData<I>,
}

impl<I> Ema<I>
where
    I: Input,
{
    /// Creates a new EMA with the provided period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::invalid_period("EMA", period));
        }

        Ok(Self {
            period,
            alpha: 2.0 / (f64_from_usize(period) + 1.0),
            state: None,
            marker: PhantomData,
        })
    }

    /// Returns the configured lookback period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Returns the smoothing factor.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the current EMA value, if the indicator has produced one.
    pub fn value(&self) -> Option<f64> {
        self.state
    }
}

impl<I> Indicator for Ema<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let value = input.value();
        let next = match self.state {
            None => value,
            Some(prev) => self.alpha * value + (1.0 - self.alpha) * prev,
        };
        self.state = Some(next);
        Some(next)
    }

    fn reset(&mut self) {
        self.state = None;
    }
}
