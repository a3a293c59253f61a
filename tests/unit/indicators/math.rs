//! Unit tests for series combinators

use wavesignal::indicators::math::{map, to_series, value_at, zip_with};

#[test]
fn to_series_defines_every_slot() {
    assert_eq!(to_series(&[1.0, 2.0]), vec![Some(1.0), Some(2.0)]);
}

#[test]
fn map_skips_absent_slots() {
    let out = map(&[Some(-2.0), None, Some(3.0)], f64::abs);
    assert_eq!(out, vec![Some(2.0), None, Some(3.0)]);
}

#[test]
fn zip_with_is_absent_when_either_side_is() {
    let a = vec![Some(5.0), None, Some(1.0)];
    let b = vec![Some(2.0), Some(4.0), None];
    assert_eq!(zip_with(&a, &b, |x, y| x - y), vec![Some(3.0), None, None]);
}

#[test]
fn zip_with_truncates_to_shorter_input() {
    let a = vec![Some(1.0), Some(2.0), Some(3.0)];
    let b = vec![Some(1.0)];
    assert_eq!(zip_with(&a, &b, |x, y| x + y).len(), 1);
}

#[test]
fn value_at_handles_out_of_range() {
    let series = vec![Some(1.0), None];
    assert_eq!(value_at(&series, 0), Some(1.0));
    assert_eq!(value_at(&series, 1), None);
    assert_eq!(value_at(&series, 7), None);
}
