//! Moving averages (SMA, EMA)

use crate::models::indicators::Series;

/// Simple moving average.
///
/// Slot `i` holds the mean of the `period` values ending at `i`; slots before
/// `period - 1`, and windows containing an absent value, are absent.
pub fn sma(series: &[Option<f64>], period: usize) -> Series {
    let mut out = vec![None; series.len()];
    if period == 0 {
        return out;
    }

    for i in (period - 1)..series.len() {
        let window = &series[i + 1 - period..=i];
        let sum: Option<f64> = window.iter().copied().sum();
        out[i] = sum.map(|s| s / period as f64);
    }
    out
}

/// Exponential moving average with `k = 2 / (period + 1)`.
///
/// Seeded with the first defined value (not an SMA), so every slot from the
/// seed onwards is defined. An absent input after the seed produces an absent
/// slot and leaves the running average untouched.
pub fn ema(series: &[Option<f64>], period: usize) -> Series {
    if period == 0 {
        return vec![None; series.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev: Option<f64> = None;

    series
        .iter()
        .map(|value| {
            let value = (*value)?;
            let next = match prev {
                Some(p) => value * k + p * (1.0 - k),
                None => value,
            };
            prev = Some(next);
            Some(next)
        })
        .collect()
}

/// EMA of bar closes used as the trend filter
pub fn trend_ema(closes: &[f64], period: usize) -> Series {
    ema(&crate::indicators::math::to_series(closes), period)
}
