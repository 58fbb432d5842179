//! Operator-cost adjustment policy.

use serde::{Deserialize, Serialize};

use crate::proxy::OperatorProxy;

/// How operator costs enter the search's g-values.
///
/// The bound check always uses the true cost (`real_g`); this policy only
/// shapes the ordering g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorCost {
    /// Use the cost as specified by the task.
    #[default]
    Normal,
    /// Treat every operator as cost 1.
    One,
    /// Add 1 to every cost. On unit-cost tasks this degrades to `One` so
    /// that plan length is still what gets minimized.
    PlusOne,
}

impl OperatorCost {
    /// Cost of `op` under this policy.
    #[must_use]
    pub fn adjusted_cost(self, op: &OperatorProxy<'_>, is_unit_cost: bool) -> u32 {
        match self {
            Self::Normal => op.cost(),
            Self::One => 1,
            Self::PlusOne => {
                if is_unit_cost {
                    1
                } else {
                    op.cost() + 1
                }
            }
        }
    }
}
