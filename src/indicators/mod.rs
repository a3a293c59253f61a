//! Indicator computation over bar sequences.
//!
//! Every function here is pure and total: insufficient history shows up as
//! `None` slots in the returned series, never as an error.

pub mod engine;
pub mod math;

pub mod momentum;
pub mod trend;
pub mod volume;

pub use engine::IndicatorEngine;
pub use momentum::*;
pub use trend::*;
pub use volume::*;
