use serde::{Deserialize, Serialize};

use crate::models::bar::Bar;
use crate::models::indicators::IndicatorSnapshot;

/// Buffered price data with the indicators at the newest bar, as published
/// by the poll loop after every successful tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub symbol: String,
    pub interval: String,
    pub bars: Vec<Bar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSnapshot>,
    pub trend_weakening: bool,
}
