//! Detection of heuristic progress.
//!
//! Tracks, per evaluator, the best (lowest) finite value seen so far.
//! Whenever an evaluation context carries a new minimum for any of its
//! evaluators, the search has "made progress": it logs a checkpoint and
//! rewards preferred-operator open lists with a boost.

use std::collections::HashMap;

use tracing::info;

use crate::context::EvaluationContext;
use crate::evaluator::evaluator_key;

#[derive(Default)]
pub struct SearchProgress {
    best_values: HashMap<*const (), i64>,
}

impl SearchProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect every result memoized in `ctx`; returns true if any
    /// evaluator reached a new minimum.
    pub fn check_progress(&mut self, ctx: &EvaluationContext<'_>) -> bool {
        let mut progress = false;
        for (evaluator, result) in ctx.cached_results() {
            if result.is_infinite() {
                continue;
            }
            let value = result.value();
            let key = evaluator_key(evaluator);
            let best = self.best_values.entry(key).or_insert(i64::MAX);
            if value < *best {
                *best = value;
                progress = true;
                info!(
                    "New best heuristic value for {}: {value}",
                    evaluator.description()
                );
            }
        }
        progress
    }
}
