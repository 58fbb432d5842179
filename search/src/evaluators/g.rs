//! The g-evaluator: path cost so far.

use crate::context::EvaluationContext;
use crate::evaluator::{EvaluationResult, Evaluator};

/// Returns the g-value carried by the evaluation context.
#[derive(Debug, Default)]
pub struct GEvaluator;

impl GEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for GEvaluator {
    fn description(&self) -> &str {
        "g"
    }

    fn compute_result(&self, ctx: &mut EvaluationContext<'_>) -> EvaluationResult {
        EvaluationResult::of(ctx.g())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvaluatorRef;
    use crate::registry::StateRegistry;
    use sequent_task::{PlanningTask, VariableInfo};
    use std::rc::Rc;

    #[test]
    fn returns_context_g() {
        let task = Rc::new(
            PlanningTask::new(
                vec![VariableInfo {
                    name: "v".to_string(),
                    domain_size: 2,
                    axiom_layer: -1,
                }],
                vec![],
                vec![],
                vec![0],
                vec![],
            )
            .unwrap(),
        );
        let state = StateRegistry::new(task).initial_state();
        let g: EvaluatorRef = Rc::new(GEvaluator::new());
        let mut ctx = EvaluationContext::new(&state, 17, false, false);
        assert_eq!(ctx.value(&g), 17);
    }
}
