//! Round-robin alternation over several open lists.
//!
//! Every insertion goes into all sublists (each applying its own
//! preferred-only filter). `remove_min` pops from the non-empty sublist
//! with the lowest priority counter and then charges that sublist its
//! weight, so sublists with weight 1 alternate evenly and a sublist with
//! a larger weight is popped proportionally less often.
//!
//! `boost_preferred` subtracts the boost amount from the counters of all
//! preferred-only sublists, scheduling extra pops from them until the
//! credit is used up.

use crate::context::EvaluationContext;
use crate::evaluator::OrderedEvaluatorSet;
use crate::open_list::OpenList;
use crate::registry::StateId;

pub const DEFAULT_BOOST: i64 = 1000;

pub struct AlternationOpenList {
    sublists: Vec<Box<dyn OpenList>>,
    priorities: Vec<i64>,
    weights: Vec<i64>,
    boost_amount: i64,
}

impl AlternationOpenList {
    /// Alternate evenly between `sublists`.
    ///
    /// # Panics
    ///
    /// Panics if `sublists` is empty.
    #[must_use]
    pub fn new(sublists: Vec<Box<dyn OpenList>>, boost_amount: i64) -> Self {
        let weights = vec![1; sublists.len()];
        Self::with_weights(sublists, weights, boost_amount)
    }

    /// Alternate with per-sublist weights; a sublist of weight `w` gets
    /// roughly a `1/w` share of pops.
    ///
    /// # Panics
    ///
    /// Panics if `sublists` is empty, the lengths differ, or a weight is
    /// not positive.
    #[must_use]
    pub fn with_weights(
        sublists: Vec<Box<dyn OpenList>>,
        weights: Vec<i64>,
        boost_amount: i64,
    ) -> Self {
        assert!(!sublists.is_empty(), "alternation over zero open lists");
        assert_eq!(sublists.len(), weights.len(), "one weight per sublist");
        assert!(weights.iter().all(|&w| w > 0), "weights must be positive");
        let priorities = vec![0; sublists.len()];
        Self {
            sublists,
            priorities,
            weights,
            boost_amount,
        }
    }
}

impl OpenList for AlternationOpenList {
    fn do_insertion(&mut self, ctx: &mut EvaluationContext<'_>, id: StateId) {
        for sublist in &mut self.sublists {
            sublist.insert(ctx, id);
        }
    }

    fn remove_min(&mut self) -> StateId {
        let mut best: Option<usize> = None;
        for (i, sublist) in self.sublists.iter().enumerate() {
            if !sublist.empty()
                && best.is_none_or(|b| self.priorities[i] < self.priorities[b])
            {
                best = Some(i);
            }
        }
        let best = best.expect("remove_min on empty open list");
        self.priorities[best] += self.weights[best];
        self.sublists[best].remove_min()
    }

    fn empty(&self) -> bool {
        self.sublists.iter().all(|sublist| sublist.empty())
    }

    fn clear(&mut self) {
        for sublist in &mut self.sublists {
            sublist.clear();
        }
    }

    fn boost_preferred(&mut self) {
        for (i, sublist) in self.sublists.iter().enumerate() {
            if sublist.only_preferred() {
                self.priorities[i] -= self.boost_amount;
            }
        }
    }

    fn collect_path_dependent(&self, out: &mut OrderedEvaluatorSet) {
        for sublist in &self.sublists {
            sublist.collect_path_dependent(out);
        }
    }

    fn is_dead_end(&self, ctx: &mut EvaluationContext<'_>) -> bool {
        if self.is_reliable_dead_end(ctx) {
            return true;
        }
        self.sublists
            .iter()
            .all(|sublist| sublist.is_dead_end(ctx))
    }

    fn is_reliable_dead_end(&self, ctx: &mut EvaluationContext<'_>) -> bool {
        self.sublists
            .iter()
            .any(|sublist| sublist.is_reliable_dead_end(ctx))
    }
}
