//! Shared data models spanning the engine layers.

pub mod bar;
pub mod chart;
pub mod indicators;
pub mod signal;

pub use bar::Bar;
pub use chart::ChartSnapshot;
pub use indicators::{IndicatorSeries, IndicatorSnapshot, Series};
pub use signal::{Signal, SignalHistory, SignalLevel, SignalType, DEFAULT_HISTORY_LIMIT};
