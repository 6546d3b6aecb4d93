//! Column assignment: give every node a lane whose line crosses no other.
//!
//! A node's lane runs down its own column from its row to the lowest of its
//! parents (see [`CommitStore::reach`]). Within a column those spans must not
//! overlap, which is what the upper and lower checks enforce for each
//! candidate cell.

use crate::grid::OccupancyGrid;
use crate::store::{CommitStore, NodeId, PassState};
use crate::traversal::seed;
use log::{debug, info};
use std::cmp::Reverse;

/// Assign a column to every node reachable from `heads`. Rows must be assigned.
///
/// Returns the total width: one more than the largest column used.
pub fn assign_columns(store: &mut CommitStore, pass: &mut PassState, heads: &[NodeId], flip: bool) -> usize {
    let mut queue = seed(heads, flip);
    let mut grid = OccupancyGrid::new();
    let mut width = 0;

    while let Some(id) = queue.pop_front() {
        if pass.is_done(id) {
            continue;
        }

        let column = match store.node(id).column {
            Some(column) => column,
            None => match find_column(store, &mut grid, id, 0) {
                Some(column) => column,
                None => {
                    debug!("Skipping {}: no row assigned", store.node(id).id());
                    pass.mark_done(id);
                    continue;
                }
            },
        };
        width = width.max(column + 1);

        let parents = store.node(id).parents.clone();
        let mut by_row = parents.clone();
        by_row.sort_by_key(|p| Reverse(store.node(*p).row));

        // Lowest parent searches first; the queue keeps source order.
        for parent in &by_row {
            if store.node(*parent).column.is_none() {
                let start = select_starting_column(store, *parent);
                if let Some(found) = find_column(store, &mut grid, *parent, start) {
                    width = width.max(found + 1);
                }
            }
            let node = store.node_mut(*parent);
            node.border = node.border.max(column);
        }

        let pending = store.skip_if_done(&parents, pass);
        queue.extend(pending);
        pass.mark_done(id);
    }

    info!("Assigned columns, width {}", width);
    width
}

/// Preferred first column to try for `id`: the leftmost column among its
/// children that already have one.
pub fn select_starting_column(store: &CommitStore, id: NodeId) -> usize {
    store
        .node(id)
        .children
        .iter()
        .filter_map(|c| store.node(*c).column)
        .min()
        .unwrap_or(0)
}

/// Linear search from `start` for the first column where `id` fits.
fn find_column(store: &mut CommitStore, grid: &mut OccupancyGrid, id: NodeId, start: usize) -> Option<usize> {
    let row = store.node(id).row?;
    let mut column = start;

    loop {
        grid.insert(column, row, id);
        if passes_crossing_checks(store, grid, column, id) {
            break;
        }
        grid.remove(column, row);
        column += 1;
    }

    debug!("Placed {} at column {} (tried from {})", store.node(id).id(), column, start);
    let node = store.node_mut(id);
    node.column = Some(column);
    node.border = node.border.max(column);
    Some(column)
}

/// True when `id`, sitting at its row in `column`, crosses neither neighbour.
pub fn passes_crossing_checks(store: &CommitStore, grid: &OccupancyGrid, column: usize, id: NodeId) -> bool {
    upper_check(store, grid, column, id) && lower_check(store, grid, column, id)
}

/// The nearest occupant above must not reach below `id`.
fn upper_check(store: &CommitStore, grid: &OccupancyGrid, column: usize, id: NodeId) -> bool {
    let Some(row) = store.node(id).row else {
        return false;
    };
    match grid.above(column, row) {
        None => true,
        Some((_, upper)) => store.reach(upper).is_none_or(|reach| reach <= row),
    }
}

/// `id` itself must not reach past the nearest occupant below.
fn lower_check(store: &CommitStore, grid: &OccupancyGrid, column: usize, id: NodeId) -> bool {
    let node = store.node(id);
    let Some(row) = node.row else {
        return false;
    };
    if node.parents.is_empty() {
        return true;
    }
    match grid.below(column, row) {
        None => true,
        Some((lower_row, _)) => store.reach(id).is_none_or(|reach| reach <= lower_row),
    }
}

/// Grid of a finished layout, for re-checking it.
pub fn grid_from_layout(store: &CommitStore) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new();
    for (id, node) in store.nodes() {
        if let (Some(row), Some(column)) = (node.row, node.column) {
            grid.insert(column, row, id);
        }
    }
    grid
}
