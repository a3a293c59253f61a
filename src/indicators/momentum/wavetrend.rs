//! WaveTrend oscillator
//!
//! ap  = (high + low + close) / 3
//! esa = EMA(ap, channel)
//! d   = EMA(|ap - esa|, channel)
//! ci  = (ap - esa) / (0.015 * d), 0 when d is 0
//! wt1 = EMA(ci, average)
//! wt2 = SMA(wt1, signal)

use crate::indicators::math::{map, to_series, zip_with};
use crate::indicators::trend::{ema, sma};
use crate::models::bar::Bar;
use crate::models::indicators::Series;

const CI_SCALE: f64 = 0.015;

/// WaveTrend lines aligned with the input bars
#[derive(Debug, Clone, PartialEq)]
pub struct WaveTrendSeries {
    /// Oscillator line (tci)
    pub wt1: Series,
    /// Signal line
    pub wt2: Series,
}

pub fn wave_trend(
    bars: &[Bar],
    channel_length: usize,
    average_length: usize,
    signal_length: usize,
) -> WaveTrendSeries {
    let typical: Vec<f64> = bars.iter().map(Bar::typical_price).collect();
    let ap = to_series(&typical);

    let esa = ema(&ap, channel_length);
    let spread = zip_with(&ap, &esa, |a, e| a - e);
    let d = ema(&map(&spread, f64::abs), channel_length);

    let ci = zip_with(&spread, &d, |s, d| if d == 0.0 { 0.0 } else { s / (CI_SCALE * d) });

    let wt1 = ema(&ci, average_length);
    let wt2 = sma(&wt1, signal_length);

    WaveTrendSeries { wt1, wt2 }
}
