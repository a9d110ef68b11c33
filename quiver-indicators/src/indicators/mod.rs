//! Built-in indicator implementations provided by the crate.

pub mod ema;
pub mod sma;

pub use ema::Ema;
pub use sma::Sma;
