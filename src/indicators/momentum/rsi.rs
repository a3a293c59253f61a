//! RSI (Relative Strength Index) indicator

use crate::models::indicators::Series;

/// Default RSI look-back
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate the RSI series with Wilder smoothing.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// The first value sits at index `period`, seeded from the plain mean of the
/// first `period` changes. A zero average loss gives 100.
pub fn rsi(closes: &[f64], period: usize) -> Series {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let change = |i: usize| closes[i] - closes[i - 1];

    let (mut avg_gain, mut avg_loss) = (1..=period).fold((0.0, 0.0), |(g, l), i| {
        let diff = change(i);
        (g + diff.max(0.0), l + (-diff).max(0.0))
    });
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    let p = period as f64;
    for i in (period + 1)..closes.len() {
        let diff = change(i);
        avg_gain = (avg_gain * (p - 1.0) + diff.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-diff).max(0.0)) / p;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate RSI with the default period (14)
pub fn rsi_default(closes: &[f64]) -> Series {
    rsi(closes, DEFAULT_RSI_PERIOD)
}
