//! Synthetic bar sequences shared by unit and integration tests

#![allow(dead_code)]

use wavesignal::models::bar::Bar;

pub const MINUTE_MS: i64 = 60_000;

/// Sawtooth market: `up` bars moving by `step`, then `down` bars moving back
/// by `step`, repeated. A positive step gives a net uptrend, a negative one
/// a net downtrend. High/low sit 0.5 around the close.
pub fn zigzag(count: usize, base: f64, step: f64) -> Vec<Bar> {
    zigzag_with_volume(count, base, step, |_| 1000.0)
}

pub fn zigzag_with_volume<F>(count: usize, base: f64, step: f64, volume: F) -> Vec<Bar>
where
    F: Fn(usize) -> f64,
{
    extend_zigzag(Vec::new(), count, base, step, volume)
}

/// Continue `bars` with another zigzag leg starting from the last close
pub fn extend_zigzag<F>(mut bars: Vec<Bar>, count: usize, base: f64, step: f64, volume: F) -> Vec<Bar>
where
    F: Fn(usize) -> f64,
{
    let offset = bars.len();
    let mut price = bars.last().map(|b| b.close).unwrap_or(base);
    for k in 0..count {
        let i = offset + k;
        if i > 0 {
            price += if k % 10 < 7 { step } else { -step };
        }
        bars.push(bar(i as i64 * MINUTE_MS, price, volume(i)));
    }
    bars
}

pub fn bar(time: i64, close: f64, volume: f64) -> Bar {
    Bar::new(time, close, close + 0.5, close - 0.5, close, volume)
}

pub fn flat(count: usize, price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| Bar::new(i as i64 * MINUTE_MS, price, price, price, price, 1000.0))
        .collect()
}
