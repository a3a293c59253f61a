use serde::{Deserialize, Serialize};

/// One slot per bar; `None` where the indicator has not warmed up yet.
pub type Series = Vec<Option<f64>>;

/// Indicator values at a single bar index
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub time: i64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_ema: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wt1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wt2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_line: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_avg: Option<f64>,
}

/// Every indicator series computed over a bar sequence, aligned
/// index-for-index with the bars.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorSeries {
    pub times: Vec<i64>,
    pub closes: Vec<f64>,
    pub trend_ema: Series,
    pub wt1: Series,
    pub wt2: Series,
    pub macd_line: Series,
    pub macd_signal: Series,
    pub macd_histogram: Series,
    pub rsi: Series,
    pub volume: Series,
    pub volume_avg: Series,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn snapshot_at(&self, index: usize) -> Option<IndicatorSnapshot> {
        if index >= self.len() {
            return None;
        }
        let at = |series: &Series| series.get(index).copied().flatten();

        Some(IndicatorSnapshot {
            time: self.times[index],
            close: self.closes[index],
            trend_ema: at(&self.trend_ema),
            wt1: at(&self.wt1),
            wt2: at(&self.wt2),
            macd_line: at(&self.macd_line),
            macd_signal: at(&self.macd_signal),
            rsi: at(&self.rsi),
            volume: at(&self.volume),
            volume_avg: at(&self.volume_avg),
        })
    }

    /// Snapshot at the newest bar
    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(1).and_then(|i| self.snapshot_at(i))
    }

    /// Snapshot one bar before the newest
    pub fn previous(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(2).and_then(|i| self.snapshot_at(i))
    }
}
