//! Work-queue discipline shared by the layout passes.

use crate::store::NodeId;
use std::collections::VecDeque;

/// How newly discovered nodes enter the work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// New nodes go to the front: one branch is walked fully before its sibling.
    #[default]
    DepthFirst,
    /// New nodes go to the back: sibling branches interleave.
    BreadthFirst,
}

impl Traversal {
    /// `mingle` selects breadth-first interleaving.
    pub fn from_mingle(mingle: bool) -> Self {
        if mingle { Traversal::BreadthFirst } else { Traversal::DepthFirst }
    }

    /// Add `ids` to the queue, keeping their relative order.
    pub fn push(self, queue: &mut VecDeque<NodeId>, ids: &[NodeId]) {
        match self {
            Traversal::DepthFirst => {
                for id in ids.iter().rev() {
                    queue.push_front(*id);
                }
            }
            Traversal::BreadthFirst => queue.extend(ids.iter().copied()),
        }
    }
}

/// Initial queue for a pass: the heads, reversed when `flip` is set.
pub fn seed(heads: &[NodeId], flip: bool) -> VecDeque<NodeId> {
    if flip {
        heads.iter().rev().copied().collect()
    } else {
        heads.iter().copied().collect()
    }
}
