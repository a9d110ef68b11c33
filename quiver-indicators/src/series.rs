//! Batch kernels that evaluate an indicator across an entire price series.
//!
//! Every kernel returns a series of the same length as its input, with index
//! `i` of the output aligned to index `i` of the prices.

use crate::core::{Indicator, IndicatorError, IndicatorResult};
use crate::indicators::{Ema, Sma};

/// Value emitted by [`compute_sma`] for indices that lack a full window.
pub const SMA_WARMUP_VALUE: f64 = 0.0;

/// Computes the simple moving average of `prices` over `window` observations.
///
/// Indices before `window - 1` hold [`SMA_WARMUP_VALUE`]. An empty input yields
/// an empty output, and a window longer than the series yields all warm-up values.
pub fn compute_sma(prices: &[f64], window: usize) -> IndicatorResult<Vec<f64>> {
    let mut sma = Sma::<f64>::with_window_capacity(window, prices.len())?;
    let mut out = Vec::with_capacity(prices.len());
    out.extend(
        prices
            .iter()
            .map(|price| sma.next(*price).unwrap_or(SMA_WARMUP_VALUE)),
    );
    Ok(out)
}

/// Computes the exponential moving average of `prices` with `alpha = 2 / (window + 1)`.
///
/// The first output equals the first price. Fails with
/// [`IndicatorError::EmptySeries`] when `prices` is empty since there is no seed.
pub fn compute_ema(prices: &[f64], window: usize) -> IndicatorResult<Vec<f64>> {
    let mut ema = Ema::<f64>::new(window)?;
    if prices.is_empty() {
        return Err(IndicatorError::empty_series("EMA"));
    }
    let mut out = Vec::with_capacity(prices.len());
    for price in prices {
        if let Some(value) = ema.next(*price) {
            out.push(value);
        }
    }
    Ok(out)
}
