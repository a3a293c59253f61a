//! Unit tests for the indicator engine

use crate::common_bars::zigzag;
use wavesignal::config::IndicatorParams;
use wavesignal::indicators::IndicatorEngine;

#[test]
fn test_default_min_bars_is_trend_period() {
    assert_eq!(IndicatorEngine::default().min_bars(), 50);
}

#[test]
fn test_min_bars_follows_longest_lookback() {
    let params = IndicatorParams {
        macd_slow: 40,
        macd_signal: 15,
        ..IndicatorParams::default()
    };
    assert_eq!(params.min_bars(), 55);
}

#[test]
fn test_compute_aligns_every_series() {
    let bars = zigzag(60, 100.0, 1.0);
    let series = IndicatorEngine::default().compute(&bars);

    assert_eq!(series.len(), 60);
    for s in [
        &series.trend_ema,
        &series.wt1,
        &series.wt2,
        &series.macd_line,
        &series.macd_signal,
        &series.macd_histogram,
        &series.rsi,
        &series.volume,
        &series.volume_avg,
    ] {
        assert_eq!(s.len(), 60);
    }
    assert_eq!(series.times[59], bars[59].time);
}

#[test]
fn test_compute_warm_up_slots() {
    let bars = zigzag(60, 100.0, 1.0);
    let series = IndicatorEngine::default().compute(&bars);

    assert_eq!(series.trend_ema[0], Some(bars[0].close));
    assert_eq!(series.rsi[13], None);
    assert!(series.rsi[14].is_some());
    assert_eq!(series.wt2[2], None);
    assert!(series.wt2[3].is_some());
    assert_eq!(series.volume_avg[18], None);
    assert_eq!(series.volume_avg[19], Some(1000.0));
}

#[test]
fn test_snapshots_at_the_end() {
    let bars = zigzag(60, 100.0, 1.0);
    let series = IndicatorEngine::default().compute(&bars);

    let latest = series.latest().expect("latest snapshot");
    let previous = series.previous().expect("previous snapshot");
    assert_eq!(latest.time, bars[59].time);
    assert_eq!(latest.close, bars[59].close);
    assert_eq!(previous.time, bars[58].time);
    assert!(latest.wt1.is_some() && latest.rsi.is_some());
}

#[test]
fn test_compute_is_deterministic() {
    let bars = zigzag(120, 100.0, 1.0);
    let engine = IndicatorEngine::default();
    assert_eq!(engine.compute(&bars), engine.compute(&bars));
}

#[test]
fn test_compute_empty_input() {
    let series = IndicatorEngine::default().compute(&[]);
    assert!(series.is_empty());
    assert!(series.latest().is_none());
    assert!(series.previous().is_none());
}
