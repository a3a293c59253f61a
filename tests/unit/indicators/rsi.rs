//! Unit tests for RSI indicator

use wavesignal::indicators::momentum::{rsi, rsi_default};

#[test]
fn test_rsi_insufficient_data() {
    let out = rsi(&[1.0, 2.0, 3.0], 3);
    assert_eq!(out, vec![None, None, None]);
}

#[test]
fn test_rsi_first_value_at_period() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let out = rsi_default(&closes);
    assert!(out[..14].iter().all(Option::is_none));
    assert_eq!(out[14], Some(100.0));
}

#[test]
fn test_rsi_seed_index_with_no_losses() {
    let closes: Vec<f64> = (0..15).map(|i| 10.0 + i as f64 * 0.5).collect();
    let out = rsi(&closes, 14);
    assert_eq!(out.len(), 15);
    assert_eq!(out[14], Some(100.0));
}

#[test]
fn test_rsi_zero_period_is_absent() {
    assert!(rsi(&[1.0, 2.0, 3.0], 0).iter().all(Option::is_none));
}

#[test]
fn test_rsi_all_losses_is_zero() {
    let closes: Vec<f64> = (0..16).map(|i| 100.0 - i as f64).collect();
    let out = rsi(&closes, 14);
    assert_eq!(out[14], Some(0.0));
    assert_eq!(out[15], Some(0.0));
}

#[test]
fn test_rsi_wilder_smoothing() {
    let out = rsi(&[1.0, 2.0, 1.0, 2.0, 1.0], 2);
    assert_eq!(out[0], None);
    assert_eq!(out[1], None);
    assert!((out[2].unwrap() - 50.0).abs() < 1e-9);
    assert!((out[3].unwrap() - 75.0).abs() < 1e-9);
    assert!((out[4].unwrap() - 37.5).abs() < 1e-9);
}

#[test]
fn test_rsi_stays_in_range() {
    let closes: Vec<f64> = (0..200)
        .map(|i| 100.0 + ((i as f64) * 0.7).sin() * 5.0)
        .collect();
    for value in rsi(&closes, 14).into_iter().flatten() {
        assert!((0.0..=100.0).contains(&value));
    }
}
