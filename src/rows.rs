//! Row assignment: linearize the graph into print order.
//!
//! A node is placed only once every one of its children has been placed, so
//! no commit prints above one of its descendants. Placed nodes form a doubly
//! linked list through `top`/`bottom`; the head of that list is the first
//! printed row.

use crate::store::{CommitStore, NodeId, PassState, StoreError};
use crate::traversal::{Traversal, seed};
use eyre::Result;
use log::{debug, info};

/// Running tail of the print-order list.
#[derive(Debug, Default)]
struct Chain {
    first: Option<NodeId>,
    previous: Option<NodeId>,
    counter: usize,
}

impl Chain {
    fn next_row(&mut self) -> usize {
        let row = self.counter;
        self.counter += 1;
        row
    }

    /// Splice a newly placed node after the current tail.
    fn append(&mut self, store: &mut CommitStore, id: NodeId) {
        match self.previous {
            Some(prev) => {
                store.node_mut(prev).bottom = Some(id);
                store.node_mut(id).top = Some(prev);
            }
            None => self.first = Some(id),
        }
        let row = self.next_row();
        store.node_mut(id).row = Some(row);
        self.previous = Some(id);
    }

    /// Unlink an already placed node and re-attach it at the tail.
    fn move_to_tail(&mut self, store: &mut CommitStore, id: NodeId) {
        let Some(prev) = self.previous else {
            return;
        };

        let (top, bottom) = {
            let node = store.node(id);
            (node.top, node.bottom)
        };
        match top {
            Some(t) => store.node_mut(t).bottom = bottom,
            None => self.first = bottom,
        }
        if let Some(b) = bottom {
            store.node_mut(b).top = top;
        }

        store.node_mut(prev).bottom = Some(id);
        let row = self.next_row();
        let node = store.node_mut(id);
        node.top = Some(prev);
        node.bottom = None;
        node.row = Some(row);
        self.previous = Some(id);
    }
}

/// Assign a row to every node reachable from `heads`.
///
/// Requires children to be bound. Returns the first node of the print order,
/// or `None` when there are no heads. Rows are contiguous from 0 on return.
pub fn assign_rows(
    store: &mut CommitStore,
    pass: &mut PassState,
    heads: &[NodeId],
    traversal: Traversal,
    flip: bool,
) -> Result<Option<NodeId>> {
    let mut queue = seed(heads, flip);
    let mut seen = store.pass_state();
    let mut chain = Chain::default();

    for head in heads {
        seen.mark_done(*head);
    }

    while let Some(id) = queue.pop_front() {
        if pass.is_done(id) {
            revisit(store, pass, &mut chain, id);
            continue;
        }

        if store.node(id).children.iter().any(|c| !pass.is_done(*c)) {
            debug!("Deferring {}: children pending", store.node(id).id());
            continue;
        }

        chain.append(store, id);

        let parents = store.skip_if_done(&store.node(id).parents, pass);
        for parent in &parents {
            seen.mark_done(*parent);
        }
        traversal.push(&mut queue, &parents);

        pass.mark_done(id);
    }

    let unplaced: Vec<String> = store
        .nodes()
        .filter(|(id, _)| seen.is_done(*id) && !pass.is_done(*id))
        .map(|(_, node)| node.id().to_string())
        .collect();
    if !unplaced.is_empty() {
        return Err(eyre::eyre!(StoreError::CycleDetected { unplaced }));
    }

    let placed = renumber(store, chain.first);
    info!("Assigned rows to {} commits ({:?})", placed, traversal);

    Ok(chain.first)
}

/// A placed node popped again: move it below everything placed since.
fn revisit(store: &mut CommitStore, pass: &PassState, chain: &mut Chain, id: NodeId) {
    if chain.previous == Some(id) {
        return;
    }

    // Moving below a placed parent would print the parent first.
    if store.node(id).parents.iter().any(|p| pass.is_done(*p)) {
        debug!("Keeping {} in place: a parent is already placed", store.node(id).id());
        return;
    }

    debug!("Moving {} to the tail", store.node(id).id());
    chain.move_to_tail(store, id);
}

/// Rewrite rows as consecutive positions along the list.
fn renumber(store: &mut CommitStore, first: Option<NodeId>) -> usize {
    let order = store.print_order(first);
    for (row, id) in order.iter().enumerate() {
        store.node_mut(*id).row = Some(row);
    }
    order.len()
}
