pub mod app;
pub mod backtest;
pub mod pipeline;
pub mod telemetry;
