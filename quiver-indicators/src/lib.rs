#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Moving-average indicators over double-precision price series.

/// Foundational traits and shared abstractions.
pub mod core;
/// Built-in indicator implementations.
pub mod indicators;
/// Whole-series kernels built on the streaming indicators.
pub mod series;

/// Re-export of the core traits and error type to make the crate easy to consume.
pub use crate::core::{Indicator, IndicatorError, IndicatorResult, Input};
pub use crate::indicators::{Ema, Sma};
pub use crate::series::{compute_ema, compute_sma};
