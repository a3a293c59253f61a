//! Combinators over `Series` values.
//!
//! Any operation with an absent operand produces an absent result.

use crate::models::indicators::Series;

/// Lift plain values into a fully defined series
pub fn to_series(values: &[f64]) -> Series {
    values.iter().map(|&v| Some(v)).collect()
}

/// Apply `f` to every defined slot
pub fn map<F>(series: &[Option<f64>], f: F) -> Series
where
    F: Fn(f64) -> f64,
{
    series.iter().map(|v| v.map(&f)).collect()
}

/// Combine two aligned series slot by slot.
///
/// The result has the length of the shorter input.
pub fn zip_with<F>(a: &[Option<f64>], b: &[Option<f64>], f: F) -> Series
where
    F: Fn(f64, f64) -> f64,
{
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(f(*x, *y)),
            _ => None,
        })
        .collect()
}

/// Value at `index`, absent when out of range
pub fn value_at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}
