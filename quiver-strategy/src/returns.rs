use crate::error::{StrategyError, StrategyResult};

/// Period-over-period simple returns, one shorter than `prices`.
///
/// Fails when a price other than the last one is zero.
pub fn simple_returns(prices: &[f64]) -> StrategyResult<Vec<f64>> {
    prices
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let (prev, curr) = (pair[0], pair[1]);
            if prev == 0.0 {
                return Err(StrategyError::InvalidPrice { index, price: prev });
            }
            Ok((curr - prev) / prev)
        })
        .collect()
}

/// Period-over-period log returns, one shorter than `prices`.
///
/// Every price must be strictly positive.
pub fn log_returns(prices: &[f64]) -> StrategyResult<Vec<f64>> {
    if let Some((index, &price)) = prices
        .iter()
        .enumerate()
        .find(|(_, price)| price.is_nan() || **price <= 0.0)
    {
        return Err(StrategyError::InvalidPrice { index, price });
    }
    Ok(prices
        .windows(2)
        .map(|pair| (pair[1] / pair[0]).ln())
        .collect())
}

/// Compounds simple returns into a single return over the whole period.
pub fn total_simple_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Sums log returns into a single return over the whole period.
pub fn total_log_return(returns: &[f64]) -> f64 {
    returns.iter().sum()
}
