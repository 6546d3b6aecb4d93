//! Occupancy grid used by column assignment.

use crate::store::NodeId;
use std::collections::{BTreeMap, HashMap};

/// Per-column record of which node sits at which row.
#[derive(Debug, Default)]
pub struct OccupancyGrid {
    columns: HashMap<usize, BTreeMap<usize, NodeId>>,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: usize, row: usize, id: NodeId) {
        self.columns.entry(column).or_default().insert(row, id);
    }

    pub fn remove(&mut self, column: usize, row: usize) -> Option<NodeId> {
        let rows = self.columns.get_mut(&column)?;
        let removed = rows.remove(&row);
        if rows.is_empty() {
            self.columns.remove(&column);
        }
        removed
    }

    /// Nearest occupant of `column` printed above `row`.
    pub fn above(&self, column: usize, row: usize) -> Option<(usize, NodeId)> {
        self.columns
            .get(&column)?
            .range(..row)
            .next_back()
            .map(|(r, id)| (*r, *id))
    }

    /// Nearest occupant of `column` printed below `row`.
    pub fn below(&self, column: usize, row: usize) -> Option<(usize, NodeId)> {
        self.columns
            .get(&column)?
            .range(row + 1..)
            .next()
            .map(|(r, id)| (*r, *id))
    }

    /// Occupants of `column`, top to bottom.
    pub fn occupants(&self, column: usize) -> Vec<(usize, NodeId)> {
        self.columns
            .get(&column)
            .map(|rows| rows.iter().map(|(r, id)| (*r, *id)).collect())
            .unwrap_or_default()
    }
}
