//! Market scenarios run bar by bar through the signal engine

use crate::common_bars::{bar, extend_zigzag, flat, zigzag, zigzag_with_volume, MINUTE_MS};
use wavesignal::config::{IndicatorParams, SignalParams};
use wavesignal::models::bar::Bar;
use wavesignal::models::signal::{Signal, SignalHistory, SignalLevel, SignalType};
use wavesignal::signals::{Decision, DedupPolicy, SignalEngine};

/// Feed growing prefixes of `bars` to the engine the way the poll loop does,
/// returning every accepted signal and the number of suppressed candidates.
fn replay(engine: &SignalEngine, bars: &[Bar]) -> (Vec<Signal>, usize) {
    let mut history = SignalHistory::default();
    let mut suppressed = 0;
    for end in 1..=bars.len() {
        match engine.evaluate(&bars[..end], history.last()).decision {
            Decision::Accepted(signal) => history.push(signal),
            Decision::Suppressed(_) => suppressed += 1,
            _ => {}
        }
    }
    let mut accepted = history.to_vec();
    accepted.reverse();
    (accepted, suppressed)
}

#[test]
fn test_short_sequence_is_insufficient() {
    let bars = zigzag(49, 100.0, 1.0);
    let evaluation = SignalEngine::default().evaluate(&bars, None);
    assert_eq!(evaluation.decision, Decision::Insufficient);
    assert!(evaluation.snapshot.is_none());
}

#[test]
fn test_short_sequence_never_signals_whatever_the_shape() {
    let engine = SignalEngine::default();
    let short = engine.min_bars() - 1;

    // sharp V: straight down, then straight back up
    let v_reversal: Vec<Bar> = (0..short)
        .map(|i| {
            let from_bottom = (i as f64 - (short / 2) as f64).abs();
            bar(i as i64 * MINUTE_MS, 50.0 + 5.0 * from_bottom, 1000.0)
        })
        .collect();
    let spiking = zigzag_with_volume(short, 100.0, 1.0, |i| if i + 1 == short { 50_000.0 } else { 1000.0 });

    for bars in [v_reversal, spiking] {
        assert_eq!(bars.len(), short);
        let evaluation = engine.evaluate(&bars, None);
        assert_eq!(evaluation.decision, Decision::Insufficient);
        assert!(evaluation.snapshot.is_none());
        assert!(!evaluation.trend_weakening);

        let (accepted, suppressed) = replay(&engine, &bars);
        assert!(accepted.is_empty());
        assert_eq!(suppressed, 0);
    }
}

#[test]
fn test_flat_market_never_signals() {
    let bars = flat(120, 100.0);
    let (accepted, suppressed) = replay(&SignalEngine::default(), &bars);
    assert!(accepted.is_empty());
    assert_eq!(suppressed, 0);

    let evaluation = SignalEngine::default().evaluate(&bars, None);
    assert_eq!(evaluation.decision, Decision::NoCandidate);
    let snapshot = evaluation.snapshot.expect("snapshot");
    assert_eq!(snapshot.wt1, Some(0.0));
    assert_eq!(snapshot.wt2, Some(0.0));
}

#[test]
fn test_uptrend_emits_single_buy() {
    let bars = zigzag(120, 100.0, 1.0);
    let (accepted, suppressed) = replay(&SignalEngine::default(), &bars);

    assert_eq!(
        accepted,
        vec![Signal::new(SignalType::Buy, SignalLevel::Medium, 122.0, 52 * MINUTE_MS)]
    );
    // every later pullback recovery repeats the BUY
    assert_eq!(suppressed, 6);
}

#[test]
fn test_volume_spike_upgrades_to_high() {
    let bars = zigzag_with_volume(60, 100.0, 1.0, |i| if i == 52 { 5000.0 } else { 1000.0 });
    let (accepted, _) = replay(&SignalEngine::default(), &bars);
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].level, SignalLevel::High);
}

#[test]
fn test_downtrend_emits_single_sell() {
    let bars = zigzag(120, 300.0, -1.0);
    let (accepted, _) = replay(&SignalEngine::default(), &bars);
    assert_eq!(
        accepted,
        vec![Signal::new(SignalType::Sell, SignalLevel::Medium, 278.0, 52 * MINUTE_MS)]
    );
}

#[test]
fn test_reversal_alternates_buy_then_sell() {
    let up = zigzag(120, 100.0, 1.0);
    let bars = extend_zigzag(up, 120, 0.0, -1.0, |_| 1000.0);
    let (accepted, _) = replay(&SignalEngine::default(), &bars);

    let types: Vec<SignalType> = accepted.iter().map(|s| s.signal_type).collect();
    assert_eq!(types, vec![SignalType::Buy, SignalType::Sell]);
    assert_eq!(accepted[1].time, 142 * MINUTE_MS);
}

#[test]
fn test_without_trend_gate_every_crossover_alternates() {
    let engine = SignalEngine::new(
        IndicatorParams::default(),
        SignalParams {
            require_trend: false,
            ..SignalParams::default()
        },
    );
    let (accepted, suppressed) = replay(&engine, &zigzag(120, 100.0, 1.0));

    assert_eq!(accepted.len(), 14);
    assert_eq!(suppressed, 0);
    for pair in accepted.windows(2) {
        assert_ne!(pair[0].signal_type, pair[1].signal_type);
    }
    // counter-trend SELLs carry no confirmation
    assert!(accepted
        .iter()
        .filter(|s| s.signal_type == SignalType::Sell)
        .all(|s| s.level == SignalLevel::Low));
}

#[test]
fn test_history_makes_evaluation_idempotent() {
    let bars = zigzag(53, 100.0, 1.0);
    let engine = SignalEngine::new(
        IndicatorParams::default(),
        SignalParams {
            dedup: DedupPolicy::TypeAndLevel,
            ..SignalParams::default()
        },
    );

    let first = engine.evaluate(&bars, None).signal().expect("signal");
    let again = engine.evaluate(&bars, Some(&first));
    assert_eq!(again.decision, Decision::Suppressed(first));
}
