//! Crossover detection, confirmation scoring and level assignment

use crate::config::SignalParams;
use crate::indicators::volume::volume_spike;
use crate::models::signal::{SignalLevel, SignalType};
use serde::{Deserialize, Serialize};

/// Direction in which a fast line crossed a slow line between two bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossover {
    Bullish,
    Bearish,
    None,
}

impl Crossover {
    /// Strict crossing: the lines must swap sides, touching does not count.
    pub fn detect(prev_fast: f64, prev_slow: f64, fast: f64, slow: f64) -> Self {
        if prev_fast < prev_slow && fast > slow {
            Crossover::Bullish
        } else if prev_fast > prev_slow && fast < slow {
            Crossover::Bearish
        } else {
            Crossover::None
        }
    }

    pub fn signal_type(self) -> Option<SignalType> {
        match self {
            Crossover::Bullish => Some(SignalType::Buy),
            Crossover::Bearish => Some(SignalType::Sell),
            Crossover::None => None,
        }
    }
}

/// Indicator values at the decision bar, all required to be present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmationInputs {
    pub close: f64,
    pub trend_ema: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub rsi: f64,
    pub volume: Option<f64>,
    pub volume_avg: Option<f64>,
}

/// Which auxiliary indicators agree with a candidate's direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Confirmations {
    pub macd: bool,
    pub rsi: bool,
    pub trend: bool,
    pub volume_spike: bool,
}

impl Confirmations {
    pub fn evaluate(direction: SignalType, inputs: &ConfirmationInputs, params: &SignalParams) -> Self {
        let volume_spike = volume_spike(inputs.volume, inputs.volume_avg, params.volume_spike_multiplier);
        match direction {
            SignalType::Buy => Self {
                macd: inputs.macd_line > inputs.macd_signal,
                rsi: inputs.rsi > params.rsi_midline,
                trend: inputs.close > inputs.trend_ema,
                volume_spike,
            },
            SignalType::Sell => Self {
                macd: inputs.macd_line < inputs.macd_signal,
                rsi: inputs.rsi < params.rsi_midline,
                trend: inputs.close < inputs.trend_ema,
                volume_spike,
            },
        }
    }

    /// Agreeing indicators on the 0-3 scale. The volume spike is a boost,
    /// not a point.
    pub fn count(&self) -> u8 {
        [self.macd, self.rsi, self.trend]
            .iter()
            .filter(|&&agrees| agrees)
            .count() as u8
    }
}

/// High needs two confirmations plus a volume spike; Medium needs one.
pub fn level_for(confirmations: &Confirmations) -> SignalLevel {
    let count = confirmations.count();
    if count >= 2 && confirmations.volume_spike {
        SignalLevel::High
    } else if count >= 1 {
        SignalLevel::Medium
    } else {
        SignalLevel::Low
    }
}

/// The MACD histogram has shrunk below `ratio` of the MACD value.
pub fn trend_weakening(macd_line: f64, macd_signal: f64, ratio: f64) -> bool {
    (macd_line - macd_signal).abs() < macd_line.abs() * ratio
}
