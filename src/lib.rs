//! WaveTrend signal engine.
//!
//! Polls an exchange for candlestick data, derives WaveTrend, RSI, MACD,
//! trend-EMA and volume indicators, and emits deduplicated BUY/SELL signals.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
