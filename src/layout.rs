//! Layout orchestration: bind, order, place, then draw.

use crate::columns::assign_columns;
use crate::config::LayoutOptions;
use crate::render::{LaneTracker, Renderer, RowShape};
use crate::rows::assign_rows;
use crate::store::{CommitStore, NodeId, PassState};
use crate::traversal::Traversal;
use eyre::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::collections::VecDeque;
use std::io::{self, Write};

/// Result of a full layout run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// First node in print order
    pub first: Option<NodeId>,

    /// Number of columns used
    pub width: usize,

    /// Nodes in print order
    pub order: Vec<NodeId>,
}

/// Coordinates of one commit, as reported by `braid coords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub id: String,
    pub row: usize,
    pub column: usize,
    pub border: usize,
}

/// Serializable summary of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    pub width: usize,
    pub commits: Vec<Placement>,
}

impl LayoutReport {
    /// Write the report as pretty JSON. A closed pipe ends output quietly.
    pub fn write_json<W: Write>(&self, out: &mut W) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to encode layout")?;
        if emit(out, &[json]).context("Failed to write layout")? {
            finish(out)?;
        }
        Ok(())
    }
}

impl Layout {
    /// Placements in print order.
    pub fn report(&self, store: &CommitStore) -> LayoutReport {
        let commits = self
            .order
            .iter()
            .map(|id| {
                let node = store.node(*id);
                Placement {
                    id: node.id().to_string(),
                    row: node.row.unwrap_or_default(),
                    column: node.column.unwrap_or_default(),
                    border: node.border,
                }
            })
            .collect();

        LayoutReport {
            width: self.width,
            commits,
        }
    }

    /// Row geometry for every node, in print order.
    pub fn shapes(&self, store: &CommitStore) -> Vec<RowShape> {
        let mut tracker = LaneTracker::new(self.width);
        self.order.iter().map(|id| tracker.shape(store, *id)).collect()
    }
}

/// Register every node reachable from `heads` as a child of its parents.
///
/// Resolves parent ids as it goes; an unknown parent id fails with
/// `StoreError::NotFound`. Returns the number of nodes visited.
pub fn bind_children(store: &mut CommitStore, pass: &mut PassState, heads: &[NodeId]) -> Result<usize> {
    let mut queue: VecDeque<NodeId> = heads.iter().copied().collect();
    let mut visited = 0;

    while let Some(id) = queue.pop_front() {
        if pass.is_done(id) {
            continue;
        }
        pass.mark_done(id);
        visited += 1;

        let parents = store
            .resolve(&store.node(id).commit.parents)
            .with_context(|| format!("Failed to resolve parents of {}", store.node(id).id()))?;
        for parent in &parents {
            store.node_mut(*parent).children.push(id);
        }
        queue.extend(store.skip_if_done(&parents, pass));
        store.node_mut(id).parents = parents;
    }

    debug!("Bound children for {} commits", visited);
    Ok(visited)
}

/// Run the three passes and return the print order and width.
///
/// Any layout state left from a previous run is discarded first. With no
/// heads nothing is placed: `first` is `None` and the width is 0.
pub fn compute(store: &mut CommitStore, heads: &[NodeId], options: &LayoutOptions) -> Result<Layout> {
    store.reset_layout();
    let mut pass = store.pass_state();

    let reached = bind_children(store, &mut pass, heads)?;
    pass.clear();

    let traversal = Traversal::from_mingle(options.mingle);
    let first = assign_rows(store, &mut pass, heads, traversal, options.flip)?;
    pass.clear();

    let width = assign_columns(store, &mut pass, heads, options.flip);
    let order = store.print_order(first);

    info!(
        "Laid out {} of {} reached commits, width {}",
        order.len(),
        reached,
        width
    );
    Ok(Layout { first, width, order })
}

/// Lay out the graph and write it to `out`, one rendered block per commit.
///
/// A closed pipe ends output quietly. With `vflip` the blocks are buffered
/// and written bottom-up.
pub fn deploy<W: Write>(
    store: &mut CommitStore,
    heads: &[NodeId],
    options: &LayoutOptions,
    renderer: &dyn Renderer,
    out: &mut W,
) -> Result<Layout> {
    let layout = compute(store, heads, options)?;
    let mut tracker = LaneTracker::new(layout.width);
    let mut buffered: Vec<Vec<String>> = Vec::new();

    for id in &layout.order {
        let shape = tracker.shape(store, *id);
        let lines = renderer.render(&shape, store.node(*id));

        if options.vflip {
            buffered.push(lines);
            continue;
        }
        if !emit(out, &lines).context("Failed to write graph")? {
            return Ok(layout);
        }
    }

    for lines in buffered.iter().rev() {
        if !emit(out, lines).context("Failed to write graph")? {
            return Ok(layout);
        }
    }

    finish(out)?;
    Ok(layout)
}

fn finish<W: Write>(out: &mut W) -> Result<()> {
    match out.flush() {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => debug!("Output closed during flush"),
        result => result.context("Failed to flush output")?,
    }
    Ok(())
}

/// Write lines; `Ok(false)` means the reader went away.
fn emit<W: Write>(out: &mut W, lines: &[String]) -> io::Result<bool> {
    for line in lines {
        if let Err(e) = writeln!(out, "{}", line) {
            if e.kind() == io::ErrorKind::BrokenPipe {
                debug!("Output closed, stopping");
                return Ok(false);
            }
            return Err(e);
        }
    }
    Ok(true)
}
