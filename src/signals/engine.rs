//! Bars-in, decision-out evaluation: indicators followed by the generator.

use crate::config::{IndicatorParams, SignalParams};
use crate::indicators::engine::IndicatorEngine;
use crate::models::bar::Bar;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::Signal;
use crate::signals::decision::trend_weakening;
use crate::signals::signal_generator::{Decision, SignalGenerator};

/// Result of evaluating one bar sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub decision: Decision,
    /// Indicators at the newest bar, absent when the input was too short
    pub snapshot: Option<IndicatorSnapshot>,
    /// MACD lines are converging
    pub trend_weakening: bool,
}

impl Evaluation {
    fn insufficient() -> Self {
        Self {
            decision: Decision::Insufficient,
            snapshot: None,
            trend_weakening: false,
        }
    }

    pub fn signal(&self) -> Option<Signal> {
        self.decision.into_signal()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    indicators: IndicatorEngine,
    generator: SignalGenerator,
}

impl SignalEngine {
    pub fn new(indicator_params: IndicatorParams, signal_params: SignalParams) -> Self {
        Self {
            indicators: IndicatorEngine::new(indicator_params),
            generator: SignalGenerator::new(signal_params),
        }
    }

    pub fn min_bars(&self) -> usize {
        self.indicators.min_bars()
    }

    /// Recompute indicators over `bars` and decide on the newest bar.
    ///
    /// Sequences shorter than the longest warm-up never produce a signal.
    pub fn evaluate(&self, bars: &[Bar], last_accepted: Option<&Signal>) -> Evaluation {
        if bars.len() < self.min_bars().max(2) {
            return Evaluation::insufficient();
        }

        let series = self.indicators.compute(bars);
        let (Some(current), Some(previous)) = (series.latest(), series.previous()) else {
            return Evaluation::insufficient();
        };

        let decision = self.generator.evaluate(&current, &previous, last_accepted);
        let trend_weakening = match (current.macd_line, current.macd_signal) {
            (Some(line), Some(signal)) => {
                trend_weakening(line, signal, self.generator.params().trend_warning_ratio)
            }
            _ => false,
        };

        Evaluation {
            decision,
            snapshot: Some(current),
            trend_weakening,
        }
    }
}
