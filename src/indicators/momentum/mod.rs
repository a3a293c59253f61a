//! Momentum indicators: RSI, MACD, WaveTrend

pub mod macd;
pub mod rsi;
pub mod wavetrend;

pub use macd::*;
pub use rsi::*;
pub use wavetrend::*;
