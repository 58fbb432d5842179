//! Canonical packed-state storage.
//!
//! The registry owns every state reached during search, exactly once, in
//! packed form. Packed data lives in a [`SegmentedArrayVec`] so growth
//! never relocates earlier states; the dedup index maps a hash of the raw
//! words to the dense [`StateId`]s assigned at first registration, with
//! bitwise comparison resolving collisions.
//!
//! Registration cannot fail. Applying an operator whose preconditions do
//! not hold in the parent is a programming error (the successor generator
//! only hands out applicable operators) and trips a debug assertion.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use smallvec::SmallVec;

use sequent_task::{Fact, OperatorProxy, PlanningTask, VariableId};

use crate::axioms::AxiomEvaluator;
use crate::collections::SegmentedArrayVec;
use crate::packer::{IntPacker, PackedWord};

/// Opaque dense index of a registered state. Stable for the lifetime of
/// the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) usize);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl StateId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An unpacked view of a registered state.
///
/// Cheap to produce (O(variables)) and self-contained: it owns its values,
/// so it stays usable while the registry keeps growing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    values: Vec<u32>,
}

impl State {
    #[must_use]
    pub fn id(&self) -> StateId {
        self.id
    }

    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    #[must_use]
    pub fn value(&self, var: VariableId) -> u32 {
        self.values[var.0]
    }

    /// True iff `fact` holds in this state.
    #[must_use]
    pub fn satisfies(&self, fact: Fact) -> bool {
        self.value(fact.var) == fact.value
    }
}

/// Deduplicating store of packed states.
pub struct StateRegistry {
    task: Rc<PlanningTask>,
    packer: IntPacker,
    axiom_evaluator: AxiomEvaluator,
    state_data: SegmentedArrayVec<PackedWord>,
    /// Word-hash → candidate ids. Buckets are almost always singletons.
    index: HashMap<u64, SmallVec<[StateId; 1]>>,
}

impl StateRegistry {
    #[must_use]
    pub fn new(task: Rc<PlanningTask>) -> Self {
        let domain_sizes: Vec<u32> =
            task.variables().iter().map(|v| v.domain_size).collect();
        let packer = IntPacker::new(&domain_sizes);
        let axiom_evaluator = AxiomEvaluator::new(&task);
        let state_data = SegmentedArrayVec::new(packer.num_words());
        Self {
            task,
            packer,
            axiom_evaluator,
            state_data,
            index: HashMap::new(),
        }
    }

    #[must_use]
    pub fn task(&self) -> &Rc<PlanningTask> {
        &self.task
    }

    /// Number of distinct registered states.
    #[must_use]
    pub fn size(&self) -> usize {
        self.state_data.len()
    }

    /// Register and return the task's initial state, with axioms evaluated.
    pub fn initial_state(&mut self) -> State {
        let mut values = self.task.initial_state_values().to_vec();
        self.axiom_evaluator.evaluate(&mut values);
        let id = self.insert_values(&values);
        State { id, values }
    }

    /// Compute, register, and return the successor of `parent` under `op`.
    ///
    /// Conditional effects are tested against `parent`; the result is
    /// closed under axioms before registration. `op` must be applicable in
    /// `parent`.
    pub fn successor_state(&mut self, parent: &State, op: &OperatorProxy<'_>) -> State {
        debug_assert!(
            op.preconditions().iter().all(|&pre| parent.satisfies(pre)),
            "operator {:?} is not applicable in {}",
            op.name(),
            parent.id()
        );
        let mut values = parent.values.clone();
        for effect in op.effects() {
            if effect
                .conditions
                .iter()
                .all(|&cond| parent.satisfies(cond))
            {
                values[effect.fact.var.0] = effect.fact.value;
            }
        }
        self.axiom_evaluator.evaluate(&mut values);
        let id = self.insert_values(&values);
        State { id, values }
    }

    /// Unpack the state registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this registry.
    #[must_use]
    pub fn lookup_state(&self, id: StateId) -> State {
        let buffer = self.state_data.get(id.0);
        let mut values = Vec::new();
        self.packer.unpack_into(buffer, &mut values);
        State { id, values }
    }

    fn insert_values(&mut self, values: &[u32]) -> StateId {
        let buffer = self.packer.pack(values);
        let hash = hash_words(&buffer);
        if let Some(bucket) = self.index.get(&hash) {
            for &id in bucket {
                if self.state_data.get(id.0) == buffer.as_slice() {
                    return id;
                }
            }
        }
        let id = StateId(self.state_data.len());
        self.state_data.push(&buffer);
        self.index.entry(hash).or_default().push(id);
        id
    }
}

impl fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRegistry")
            .field("size", &self.size())
            .field("words_per_state", &self.packer.num_words())
            .finish()
    }
}

fn hash_words(words: &[PackedWord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    words.hash(&mut hasher);
    hasher.finish()
}

/// Enumerate the facts of a state, in variable order.
pub fn state_facts(state: &State) -> impl Iterator<Item = Fact> + '_ {
    state
        .values()
        .iter()
        .enumerate()
        .map(|(var, &value)| Fact::new(var, value))
}
