use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Display cap for the in-memory signal history.
pub const DEFAULT_HISTORY_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
}

impl SignalType {
    pub fn opposite(self) -> Self {
        match self {
            SignalType::Buy => SignalType::Sell,
            SignalType::Sell => SignalType::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(SignalType::Buy),
            "SELL" => Ok(SignalType::Sell),
            other => Err(format!("unknown signal type '{}'", other)),
        }
    }
}

/// Confidence level of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalLevel {
    Low,
    Medium,
    High,
}

impl SignalLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalLevel::Low => "Low",
            SignalLevel::Medium => "Medium",
            SignalLevel::High => "High",
        }
    }
}

impl fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(SignalLevel::Low),
            "Medium" => Ok(SignalLevel::Medium),
            "High" => Ok(SignalLevel::High),
            other => Err(format!("unknown signal level '{}'", other)),
        }
    }
}

/// A discrete trade signal. `price` and `time` are the close and open time of
/// the bar that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub level: SignalLevel,
    pub price: f64,
    pub time: i64,
}

impl Signal {
    pub fn new(signal_type: SignalType, level: SignalLevel, price: f64, time: i64) -> Self {
        Self {
            signal_type,
            level,
            price,
            time,
        }
    }

    /// Bar time as a UTC timestamp, `None` when out of chrono's range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}

/// Rolling list of accepted signals, newest first.
#[derive(Debug, Clone)]
pub struct SignalHistory {
    signals: VecDeque<Signal>,
    capacity: usize,
}

impl SignalHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            signals: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an accepted signal, dropping the oldest when full.
    pub fn push(&mut self, signal: Signal) {
        self.signals.push_front(signal);
        self.signals.truncate(self.capacity);
    }

    /// Replace the contents with persisted signals (newest first).
    pub fn seed(&mut self, newest_first: Vec<Signal>) {
        self.signals = newest_first.into_iter().take(self.capacity).collect();
    }

    /// Most recently accepted signal
    pub fn last(&self) -> Option<&Signal> {
        self.signals.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<Signal> {
        self.signals.iter().copied().collect()
    }
}

impl Default for SignalHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
