//! Evaluators that combine the values of child evaluators.
//!
//! All of them report an infinite value as soon as any child does, forward
//! path-dependence collection into their children, and are reliable
//! dead-end detectors only if every child is.

use crate::context::EvaluationContext;
use crate::evaluator::{
    EvaluationResult, Evaluator, EvaluatorRef, OrderedEvaluatorSet, INFINITY,
};

fn child_values(
    children: &[EvaluatorRef],
    ctx: &mut EvaluationContext<'_>,
) -> Option<Vec<i64>> {
    let mut values = Vec::with_capacity(children.len());
    for child in children {
        let value = ctx.value_or_infinity(child);
        if value == INFINITY {
            return None;
        }
        values.push(value);
    }
    Some(values)
}

fn collect_from_children(children: &[EvaluatorRef], out: &mut OrderedEvaluatorSet) {
    for child in children {
        child.collect_path_dependent(child, out);
    }
}

fn children_reliable(children: &[EvaluatorRef]) -> bool {
    children.iter().all(|child| child.dead_ends_are_reliable())
}

/// Sum of child values (f = g + h is the two-child case).
pub struct SumEvaluator {
    children: Vec<EvaluatorRef>,
}

impl SumEvaluator {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    #[must_use]
    pub fn new(children: Vec<EvaluatorRef>) -> Self {
        assert!(!children.is_empty(), "sum of zero evaluators");
        Self { children }
    }
}

impl Evaluator for SumEvaluator {
    fn description(&self) -> &str {
        "sum"
    }

    fn compute_result(&self, ctx: &mut EvaluationContext<'_>) -> EvaluationResult {
        match child_values(&self.children, ctx) {
            Some(values) => {
                let sum = values.iter().fold(0i64, |acc, &v| acc.saturating_add(v));
                EvaluationResult::of(sum)
            }
            None => EvaluationResult::of(INFINITY),
        }
    }

    fn collect_path_dependent(&self, _self_ref: &EvaluatorRef, out: &mut OrderedEvaluatorSet) {
        collect_from_children(&self.children, out);
    }

    fn dead_ends_are_reliable(&self) -> bool {
        children_reliable(&self.children)
    }
}

/// Maximum of child values.
pub struct MaxEvaluator {
    children: Vec<EvaluatorRef>,
}

impl MaxEvaluator {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    #[must_use]
    pub fn new(children: Vec<EvaluatorRef>) -> Self {
        assert!(!children.is_empty(), "max of zero evaluators");
        Self { children }
    }
}

impl Evaluator for MaxEvaluator {
    fn description(&self) -> &str {
        "max"
    }

    fn compute_result(&self, ctx: &mut EvaluationContext<'_>) -> EvaluationResult {
        match child_values(&self.children, ctx) {
            Some(values) => {
                let max = values.iter().copied().max().unwrap_or(0);
                EvaluationResult::of(max)
            }
            None => EvaluationResult::of(INFINITY),
        }
    }

    fn collect_path_dependent(&self, _self_ref: &EvaluatorRef, out: &mut OrderedEvaluatorSet) {
        collect_from_children(&self.children, out);
    }

    fn dead_ends_are_reliable(&self) -> bool {
        children_reliable(&self.children)
    }
}

/// A child value scaled by a constant non-negative weight.
pub struct WeightedEvaluator {
    child: EvaluatorRef,
    weight: i64,
}

impl WeightedEvaluator {
    #[must_use]
    pub fn new(child: EvaluatorRef, weight: i64) -> Self {
        Self { child, weight }
    }
}

impl Evaluator for WeightedEvaluator {
    fn description(&self) -> &str {
        "weighted"
    }

    fn compute_result(&self, ctx: &mut EvaluationContext<'_>) -> EvaluationResult {
        let value = ctx.value_or_infinity(&self.child);
        if value == INFINITY {
            EvaluationResult::of(INFINITY)
        } else {
            EvaluationResult::of(value.saturating_mul(self.weight))
        }
    }

    fn collect_path_dependent(&self, _self_ref: &EvaluatorRef, out: &mut OrderedEvaluatorSet) {
        self.child.collect_path_dependent(&self.child, out);
    }

    fn dead_ends_are_reliable(&self) -> bool {
        self.child.dead_ends_are_reliable()
    }
}
