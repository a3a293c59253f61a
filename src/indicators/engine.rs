//! Computes every indicator the signal generator consumes.

use crate::config::IndicatorParams;
use crate::indicators::math::to_series;
use crate::indicators::momentum::{macd, rsi, wave_trend};
use crate::indicators::trend::trend_ema;
use crate::indicators::volume::volume_average;
use crate::models::bar::Bar;
use crate::models::indicators::IndicatorSeries;

/// Stateless indicator calculator. Each call recomputes from scratch over
/// the full bar sequence.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Bars required before a signal can be decided
    pub fn min_bars(&self) -> usize {
        self.params.min_bars()
    }

    pub fn compute(&self, bars: &[Bar]) -> IndicatorSeries {
        let p = &self.params;
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let wt = wave_trend(bars, p.wt_channel_length, p.wt_average_length, p.wt_signal_length);
        let macd_series = macd(&closes, p.macd_fast, p.macd_slow, p.macd_signal);

        IndicatorSeries {
            times: bars.iter().map(|b| b.time).collect(),
            trend_ema: trend_ema(&closes, p.ema_trend_period),
            wt1: wt.wt1,
            wt2: wt.wt2,
            macd_line: macd_series.line,
            macd_signal: macd_series.signal,
            macd_histogram: macd_series.histogram,
            rsi: rsi(&closes, p.rsi_period),
            volume: to_series(&volumes),
            volume_avg: volume_average(&volumes, p.volume_avg_period),
            closes,
        }
    }
}
