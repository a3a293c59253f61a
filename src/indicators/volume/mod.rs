//! Volume indicators

use crate::indicators::math::to_series;
use crate::indicators::trend::sma;
use crate::models::indicators::Series;

/// SMA of bar volumes
pub fn volume_average(volumes: &[f64], period: usize) -> Series {
    sma(&to_series(volumes), period)
}

/// True when `volume` exceeds `multiplier` times its average.
/// An absent operand never counts as a spike.
pub fn volume_spike(volume: Option<f64>, average: Option<f64>, multiplier: f64) -> bool {
    match (volume, average) {
        (Some(v), Some(avg)) => v > avg * multiplier,
        _ => false,
    }
}
