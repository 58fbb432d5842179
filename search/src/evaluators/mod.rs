//! Stock evaluators: g, sum, max, weighted.
//!
//! `f = g + h` is spelled `SumEvaluator` over a `GEvaluator` and a
//! heuristic.

mod combination;
mod g;

pub use combination::{MaxEvaluator, SumEvaluator, WeightedEvaluator};
pub use g::GEvaluator;
