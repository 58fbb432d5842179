//! Open lists: frontier containers keyed by evaluator values.
//!
//! An open list owns its evaluators and turns their context-mediated
//! values into a sort key at insertion time. Keys are never updated in
//! place — a cheaper path to a state inserts a second entry and the older
//! one goes stale (its node will be Closed when popped, and the search
//! loop skips it). No decrease-key, by design.
//!
//! The [`OpenList::insert`] wrapper owns the two standard guards: a
//! preferred-only list drops non-preferred entries, and nothing dead is
//! inserted. Implementations only provide `do_insertion`.

mod alternation;
mod best_first;
mod tiebreaking;

pub use alternation::AlternationOpenList;
pub use best_first::BestFirstOpenList;
pub use tiebreaking::TieBreakingOpenList;

use crate::context::EvaluationContext;
use crate::evaluator::OrderedEvaluatorSet;
use crate::registry::StateId;

pub trait OpenList {
    /// Insert `id` with the key derived from `ctx`. Called only after the
    /// guards in [`insert`](Self::insert) have passed.
    fn do_insertion(&mut self, ctx: &mut EvaluationContext<'_>, id: StateId);

    /// Remove and return the entry with the smallest sort key; FIFO among
    /// equal keys.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    fn remove_min(&mut self) -> StateId;

    fn empty(&self) -> bool;

    fn clear(&mut self);

    /// Notification that the search made progress via preferred
    /// operators. Only alternation lists react.
    fn boost_preferred(&mut self) {}

    /// Recursively collect path-dependent evaluators.
    fn collect_path_dependent(&self, out: &mut OrderedEvaluatorSet);

    /// Whether this list considers the context's state a dead end.
    fn is_dead_end(&self, ctx: &mut EvaluationContext<'_>) -> bool;

    /// Like [`is_dead_end`](Self::is_dead_end), but only believing
    /// evaluators whose dead ends are reliable.
    fn is_reliable_dead_end(&self, ctx: &mut EvaluationContext<'_>) -> bool;

    /// Whether this list only accepts entries reached via preferred
    /// operators.
    fn only_preferred(&self) -> bool {
        false
    }

    /// Guarded insertion; see the module docs.
    fn insert(&mut self, ctx: &mut EvaluationContext<'_>, id: StateId) {
        if self.only_preferred() && !ctx.is_preferred() {
            return;
        }
        if !self.is_dead_end(ctx) {
            self.do_insertion(ctx, id);
        }
    }
}
