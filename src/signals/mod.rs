//! Signal decision interfaces.

pub mod decision;
pub mod engine;
pub mod signal_generator;

pub use decision::*;
pub use engine::{Evaluation, SignalEngine};
pub use signal_generator::*;
