//! Unit tests for MACD indicator

use wavesignal::indicators::momentum::{macd, macd_default};

#[test]
fn test_macd_flat_market_is_zero() {
    let result = macd_default(&[50.0; 40]);
    assert_eq!(result.line.len(), 40);
    assert!(result.line.iter().all(|v| *v == Some(0.0)));
    assert!(result.signal.iter().all(|v| *v == Some(0.0)));
    assert!(result.histogram.iter().all(|v| *v == Some(0.0)));
}

#[test]
fn test_macd_positive_in_uptrend() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let result = macd(&closes, 12, 26, 9);
    assert_eq!(result.line[0], Some(0.0));
    assert!(result.line[1..].iter().all(|v| v.unwrap() > 0.0));
}

#[test]
fn test_macd_histogram_is_line_minus_signal() {
    let closes: Vec<f64> = (0..80)
        .map(|i| 100.0 + ((i as f64) / 5.0).sin() * 3.0)
        .collect();
    let result = macd_default(&closes);
    for i in 0..closes.len() {
        let expected = result.line[i].unwrap() - result.signal[i].unwrap();
        assert!((result.histogram[i].unwrap() - expected).abs() < 1e-12);
    }
}

#[test]
fn test_macd_empty_input() {
    let result = macd_default(&[]);
    assert!(result.line.is_empty());
    assert!(result.signal.is_empty());
}
