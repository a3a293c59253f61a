use crate::config::SignalParams;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::{Signal, SignalType};
use crate::signals::decision::{level_for, ConfirmationInputs, Confirmations, Crossover};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Rule for suppressing a candidate that repeats the last accepted signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Same type as the last signal is a duplicate; signals strictly alternate
    #[default]
    Type,
    /// Only an identical type and level pair is a duplicate
    TypeAndLevel,
}

impl DedupPolicy {
    pub fn is_duplicate(self, last: &Signal, candidate: &Signal) -> bool {
        match self {
            DedupPolicy::Type => last.signal_type == candidate.signal_type,
            DedupPolicy::TypeAndLevel => {
                last.signal_type == candidate.signal_type && last.level == candidate.level
            }
        }
    }
}

impl FromStr for DedupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "type" => Ok(DedupPolicy::Type),
            "type_level" | "type_and_level" => Ok(DedupPolicy::TypeAndLevel),
            other => Err(format!("unknown dedup policy '{}'", other)),
        }
    }
}

/// Outcome of one decision step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Some required indicator is not available yet
    Insufficient,
    NoCandidate,
    /// A candidate formed but repeats the last accepted signal
    Suppressed(Signal),
    Accepted(Signal),
}

impl Decision {
    pub fn into_signal(self) -> Option<Signal> {
        match self {
            Decision::Accepted(signal) => Some(signal),
            _ => None,
        }
    }
}

/// Turns consecutive indicator snapshots into BUY/SELL signals.
///
/// Holds no state between calls; the last accepted signal is passed in by the
/// caller.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    params: SignalParams,
}

impl SignalGenerator {
    pub fn new(params: SignalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    /// Signal to emit for the bar at `current`, if any
    pub fn decide(
        &self,
        current: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
        last_accepted: Option<&Signal>,
    ) -> Option<Signal> {
        self.evaluate(current, previous, last_accepted).into_signal()
    }

    pub fn evaluate(
        &self,
        current: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
        last_accepted: Option<&Signal>,
    ) -> Decision {
        let Some((inputs, crossover, wt1)) = Self::required_inputs(current, previous) else {
            return Decision::Insufficient;
        };

        let Some(signal_type) = crossover.signal_type() else {
            return Decision::NoCandidate;
        };

        if !self.within_band(signal_type, wt1) {
            return Decision::NoCandidate;
        }

        let confirmations = Confirmations::evaluate(signal_type, &inputs, &self.params);
        if self.params.require_trend && !confirmations.trend {
            return Decision::NoCandidate;
        }

        let candidate = Signal::new(signal_type, level_for(&confirmations), current.close, current.time);

        match last_accepted {
            Some(last) if self.params.dedup.is_duplicate(last, &candidate) => {
                Decision::Suppressed(candidate)
            }
            _ => Decision::Accepted(candidate),
        }
    }

    fn required_inputs(
        current: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
    ) -> Option<(ConfirmationInputs, Crossover, f64)> {
        let wt1 = current.wt1?;
        let crossover = Crossover::detect(previous.wt1?, previous.wt2?, wt1, current.wt2?);
        let inputs = ConfirmationInputs {
            close: current.close,
            trend_ema: current.trend_ema?,
            macd_line: current.macd_line?,
            macd_signal: current.macd_signal?,
            rsi: current.rsi?,
            volume: current.volume,
            volume_avg: current.volume_avg,
        };
        Some((inputs, crossover, wt1))
    }

    fn within_band(&self, signal_type: SignalType, wt1: f64) -> bool {
        match signal_type {
            SignalType::Buy => self.params.wt_oversold.map_or(true, |band| wt1 < band),
            SignalType::Sell => self.params.wt_overbought.map_or(true, |band| wt1 > band),
        }
    }
}
