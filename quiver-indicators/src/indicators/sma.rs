//! Simple Moving Average (SMA).

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::core::{f64_from_usize, Indicator, IndicatorError, Input};

/// Upper bound on the window buffer reserved up front by [`Sma::new`].
const DEFAULT_WINDOW_CAPACITY: usize = 64;

/// Computes the arithmetic mean over a rolling window.
///
/// The window sum is maintained incrementally: each observation is added as it
/// arrives and the observation falling out of the window is subtracted, so the
/// accumulated rounding matches a single forward scan of the series.
#[derive(Debug, Clone)]
pub struct Sma<I = f64> {
    period: usize,
    divisor: f64,
    sum: f64,
    window: VecDeque<f64>,
    marker: PhantomData<I>,
}

impl<I> Sma<I>
where
    I: Input,
{
    /// Creates a new SMA with the provided period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Self::with_window_capacity(period, DEFAULT_WINDOW_CAPACITY)
    }

    /// Creates a new SMA reserving room for at most `capacity` buffered observations.
    ///
    /// The buffer never holds more than `period + 1` values, so the reservation is
    /// clamped to that; it grows on demand past `capacity`.
    pub fn with_window_capacity(period: usize, capacity: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::invalid_period("SMA", period));
        }

        Ok(Self {
            period,
            divisor: f64_from_usize(period),
            sum: 0.0,
            window: VecDeque::with_capacity(capacity.min(period.saturating_add(1))),
            marker: PhantomData,
        })
    }

    /// Returns the configured lookback period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Returns `true` once a full window of observations has been seen.
    pub fn is_ready(&self) -> bool {
        self.window.len() == self.period
    }
}

impl<I> Indicator for Sma<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let value = input.value();
        self.window.push_back(value);
        self.sum += value;

        if self.window.len() > self.period {
            if let Some(oldest) = self.window.pop_front() {
                self.sum -= oldest;
            }
        }

        if self.is_ready() {
            Some(self.sum / self.divisor)
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.window.clear();
    }
}
