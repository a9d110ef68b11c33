/// Largest peak-to-trough decline of `series`, as a fraction of the peak.
///
/// The running peak starts at the first value. Returns `0.0` for an empty series.
pub fn max_drawdown(series: &[f64]) -> f64 {
    let Some(&first) = series.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut worst = 0.0;
    for &value in series {
        if value > peak {
            peak = value;
        }
        let drawdown = (peak - value) / peak;
        if drawdown > worst {
            worst = drawdown;
        }
    }
    worst
}

/// Mean excess return over the population standard deviation of `returns`.
///
/// Returns `0.0` when there are no returns or they do not vary.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let count = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / count;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / count;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return 0.0;
    }
    (mean - risk_free_rate) / std_dev
}
