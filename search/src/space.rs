//! Per-state search bookkeeping: status, g-values, parent chain.
//!
//! The search space is a dense map `StateId → node info`, backed by a
//! [`SegmentedVec`] indexed by the numeric id. Two g-values are kept per
//! node: `g` uses the adjusted cost and drives open-list ordering;
//! `real_g` uses the true cost and guards the cost bound. They coincide
//! under the `Normal` cost policy.
//!
//! Status lifecycle: `New → Open → Closed`, with `Closed → Open` only via
//! [`SearchNode::reopen_closed_node`]. Any node may become `DeadEnd` and
//! stays there.

use std::fmt;

use sequent_task::OperatorId;

use crate::collections::SegmentedVec;
use crate::registry::StateId;

/// Lifecycle status of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    New,
    Open,
    Closed,
    DeadEnd,
}

#[derive(Debug, Clone, Copy)]
struct NodeInfo {
    status: NodeStatus,
    g: i64,
    real_g: i64,
    parent: Option<StateId>,
    creating_operator: Option<OperatorId>,
}

impl NodeInfo {
    const fn new() -> Self {
        Self {
            status: NodeStatus::New,
            g: -1,
            real_g: -1,
            parent: None,
            creating_operator: None,
        }
    }
}

/// Failure when reconstructing a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TracePathError {
    /// The queried state's node is not `Closed`.
    NodeNotClosed { state: StateId, status: NodeStatus },
}

impl fmt::Display for TracePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotClosed { state, status } => {
                write!(f, "cannot trace path to {state}: node is {status:?}")
            }
        }
    }
}

impl std::error::Error for TracePathError {}

/// Dense `StateId → SearchNode` storage.
#[derive(Debug, Default)]
pub struct SearchSpace {
    infos: SegmentedVec<NodeInfo>,
}

impl SearchSpace {
    #[must_use]
    pub fn new() -> Self {
        Self {
            infos: SegmentedVec::new(),
        }
    }

    /// Mutable handle for the node of `state`. Nodes are created lazily
    /// with status `New` the first time they are touched.
    pub fn node(&mut self, state: StateId) -> SearchNode<'_> {
        if state.index() >= self.infos.len() {
            self.infos.resize(state.index() + 1, NodeInfo::new());
        }
        SearchNode {
            id: state,
            info: self.infos.get_mut(state.index()),
        }
    }

    /// Read-only status lookup without creating the node.
    #[must_use]
    pub fn status(&self, state: StateId) -> NodeStatus {
        if state.index() < self.infos.len() {
            self.infos[state.index()].status
        } else {
            NodeStatus::New
        }
    }

    /// Reconstruct the operator sequence leading to `state` by walking the
    /// parent chain back to the root.
    ///
    /// # Errors
    ///
    /// Fails iff the node of `state` is not `Closed`.
    pub fn trace_path(&self, state: StateId) -> Result<Vec<OperatorId>, TracePathError> {
        let status = self.status(state);
        if status != NodeStatus::Closed {
            return Err(TracePathError::NodeNotClosed { state, status });
        }
        let mut path = Vec::new();
        let mut current = state;
        loop {
            let info = &self.infos[current.index()];
            match (info.parent, info.creating_operator) {
                (Some(parent), Some(op)) => {
                    path.push(op);
                    current = parent;
                }
                (None, None) => break,
                _ => unreachable!("parent and creating operator are set together"),
            }
        }
        path.reverse();
        Ok(path)
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.infos.len()
    }
}

/// A mutable handle on one node.
///
/// Transitions panic (debug assertions) when called in the wrong status;
/// the eager loop is responsible for calling them in lifecycle order.
pub struct SearchNode<'a> {
    id: StateId,
    info: &'a mut NodeInfo,
}

impl SearchNode<'_> {
    #[must_use]
    pub fn state_id(&self) -> StateId {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> NodeStatus {
        self.info.status
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.info.status == NodeStatus::New
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.info.status == NodeStatus::Open
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.info.status == NodeStatus::Closed
    }

    #[must_use]
    pub fn is_dead_end(&self) -> bool {
        self.info.status == NodeStatus::DeadEnd
    }

    /// Adjusted-cost g. Undefined (negative) while the node is `New`.
    #[must_use]
    pub fn g(&self) -> i64 {
        self.info.g
    }

    /// True-cost g used for the cost bound.
    #[must_use]
    pub fn real_g(&self) -> i64 {
        self.info.real_g
    }

    /// Open the initial node: g = 0, no parent.
    pub fn open_initial(&mut self) {
        debug_assert!(self.is_new());
        self.info.status = NodeStatus::Open;
        self.info.g = 0;
        self.info.real_g = 0;
        self.info.parent = None;
        self.info.creating_operator = None;
    }

    /// Open a `New` node reached from `parent` via `op`.
    pub fn open_new_node(
        &mut self,
        parent: StateId,
        op: OperatorId,
        g: i64,
        real_g: i64,
    ) {
        debug_assert!(self.is_new());
        debug_assert!(g >= 0 && real_g >= 0, "negative g-value");
        self.info.status = NodeStatus::Open;
        self.info.g = g;
        self.info.real_g = real_g;
        self.info.parent = Some(parent);
        self.info.creating_operator = Some(op);
    }

    /// Rewire an `Open` node onto a strictly cheaper path.
    pub fn update_open_node_parent(
        &mut self,
        parent: StateId,
        op: OperatorId,
        g: i64,
        real_g: i64,
    ) {
        debug_assert!(self.is_open());
        debug_assert!(g < self.info.g, "parent update must lower g");
        self.info.g = g;
        self.info.real_g = real_g;
        self.info.parent = Some(parent);
        self.info.creating_operator = Some(op);
    }

    /// Move a `Closed` node back to `Open` on a strictly cheaper path.
    pub fn reopen_closed_node(
        &mut self,
        parent: StateId,
        op: OperatorId,
        g: i64,
        real_g: i64,
    ) {
        debug_assert!(self.is_closed());
        debug_assert!(g < self.info.g, "reopening must lower g");
        self.info.status = NodeStatus::Open;
        self.info.g = g;
        self.info.real_g = real_g;
        self.info.parent = Some(parent);
        self.info.creating_operator = Some(op);
    }

    /// With reopening disabled, a cheaper path to a `Closed` node only
    /// updates the parent pointers. The recorded g then disagrees with the
    /// cost of the traced path; callers opted into that by disabling
    /// reopening.
    pub fn update_closed_node_parent(&mut self, parent: StateId, op: OperatorId) {
        debug_assert!(self.is_closed());
        self.info.parent = Some(parent);
        self.info.creating_operator = Some(op);
    }

    /// Close an `Open` node.
    pub fn close(&mut self) {
        debug_assert!(self.is_open());
        self.info.status = NodeStatus::Closed;
    }

    /// Terminal transition; allowed from any status.
    pub fn mark_as_dead_end(&mut self) {
        self.info.status = NodeStatus::DeadEnd;
    }
}
