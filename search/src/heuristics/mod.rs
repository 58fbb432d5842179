//! Heuristic evaluators.
//!
//! Heuristics are ordinary [`Evaluator`](crate::evaluator::Evaluator)s
//! that estimate cost-to-goal. The per-state estimate cache lives here:
//! dense by [`StateId`], entries never evicted during a run.

mod hmax;
mod relaxation;

pub use hmax::HspMaxHeuristic;

use crate::collections::SegmentedVec;
use crate::registry::StateId;

const NO_VALUE: i64 = i64::MIN;

/// Dense per-state estimate storage with a "not computed" sentinel.
#[derive(Debug, Default)]
pub(crate) struct EstimateCache {
    values: SegmentedVec<i64>,
}

impl EstimateCache {
    pub(crate) fn new() -> Self {
        Self {
            values: SegmentedVec::new(),
        }
    }

    pub(crate) fn get(&self, state: StateId) -> Option<i64> {
        if state.index() < self.values.len() {
            let value = self.values[state.index()];
            (value != NO_VALUE).then_some(value)
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, state: StateId, value: i64) {
        debug_assert!(value != NO_VALUE);
        if state.index() >= self.values.len() {
            self.values.resize(state.index() + 1, NO_VALUE);
        }
        self.values[state.index()] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_entries_read_as_none() {
        let cache = EstimateCache::new();
        assert_eq!(cache.get(StateId(3)), None);
    }

    #[test]
    fn set_then_get() {
        let mut cache = EstimateCache::new();
        cache.set(StateId(10), 42);
        assert_eq!(cache.get(StateId(10)), Some(42));
        assert_eq!(cache.get(StateId(9)), None);
    }
}
