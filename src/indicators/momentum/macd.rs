//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::math::{to_series, zip_with};
use crate::indicators::trend::ema;
use crate::models::indicators::Series;

/// MACD series aligned with the input closes
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Calculate MACD
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal_period) of MACD
/// Histogram = MACD - Signal
pub fn macd(closes: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdSeries {
    let closes = to_series(closes);
    let fast = ema(&closes, fast_period);
    let slow = ema(&closes, slow_period);

    let line = zip_with(&fast, &slow, |f, s| f - s);
    let signal = ema(&line, signal_period);
    let histogram = zip_with(&line, &signal, |m, s| m - s);

    MacdSeries {
        line,
        signal,
        histogram,
    }
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn macd_default(closes: &[f64]) -> MacdSeries {
    macd(closes, 12, 26, 9)
}
