use std::fmt;

/// Action suggested at one observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The fast average crossed above the slow one.
    Buy,
    /// The fast average crossed below the slow one.
    Sell,
    /// No crossover.
    #[default]
    Hold,
}

impl Signal {
    /// Upper-case label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emits a signal per index of the shorter input, flagging the points where
/// `fast` crosses `slow`.
///
/// Index 0 has no predecessor and is always [`Signal::Hold`].
pub fn crossover_signals(fast: &[f64], slow: &[f64]) -> Vec<Signal> {
    let len = fast.len().min(slow.len());
    let mut signals = vec![Signal::Hold; len];
    for (idx, (fast_pair, slow_pair)) in fast[..len]
        .windows(2)
        .zip(slow[..len].windows(2))
        .enumerate()
    {
        let (fast_prev, fast_curr) = (fast_pair[0], fast_pair[1]);
        let (slow_prev, slow_curr) = (slow_pair[0], slow_pair[1]);
        if fast_curr > slow_curr && fast_prev <= slow_prev {
            signals[idx + 1] = Signal::Buy;
        } else if fast_curr < slow_curr && fast_prev >= slow_prev {
            signals[idx + 1] = Signal::Sell;
        }
    }
    signals
}
