//! Shared test infrastructure for braid integration tests.
//!
//! Provides TestEnv helper for building graphs and inspecting layouts.

#![allow(dead_code)]

use braid::{
    CommitStore, GlyphRenderer, GraphBuilder, Layout, LayoutOptions, Node, NodeId, compute, deploy, grid_from_layout,
    passes_crossing_checks,
};

/// A commit store plus the heads to lay it out from.
pub struct TestEnv {
    pub store: CommitStore,
    pub heads: Vec<NodeId>,
}

impl TestEnv {
    /// Build a store from `builder` with the given head ids.
    pub fn new(builder: GraphBuilder, heads: &[&str]) -> Self {
        let store = builder.build().expect("Failed to build store");
        let heads = store.resolve(heads).expect("Failed to resolve heads");
        Self { store, heads }
    }

    /// Linear chain `ids[0] -> ids[1] -> ...`, headed by the first id.
    pub fn chain(ids: &[&str]) -> Self {
        let mut builder = GraphBuilder::new();
        for pair in ids.windows(2) {
            builder = builder.commit(pair[0], [pair[1]]);
        }
        if let Some(last) = ids.last() {
            builder = builder.root(*last);
        }
        Self::new(builder, &ids[..1.min(ids.len())])
    }

    /// Diamond: A has parents B and C, both of which have parent D.
    pub fn diamond() -> Self {
        Self::new(
            GraphBuilder::new()
                .commit("A", ["B", "C"])
                .commit("B", ["D"])
                .commit("C", ["D"])
                .root("D"),
            &["A"],
        )
    }

    /// Run the layout passes.
    pub fn layout(&mut self, options: LayoutOptions) -> Layout {
        compute(&mut self.store, &self.heads, &options).expect("Failed to compute layout")
    }

    /// Run the full pipeline and return the uncolored output.
    pub fn draw(&mut self, options: LayoutOptions) -> String {
        let options = options.color(false);
        let mut out = Vec::new();
        deploy(&mut self.store, &self.heads, &options, &GlyphRenderer::new(&options), &mut out)
            .expect("Failed to deploy");
        String::from_utf8(out).expect("Output is not UTF-8")
    }

    pub fn node(&self, id: &str) -> &Node {
        self.store.get(id).unwrap_or_else(|| panic!("No commit {}", id))
    }

    pub fn row(&self, id: &str) -> usize {
        self.node(id).row.unwrap_or_else(|| panic!("{} has no row", id))
    }

    pub fn column(&self, id: &str) -> usize {
        self.node(id).column.unwrap_or_else(|| panic!("{} has no column", id))
    }

    /// Ids in print order.
    pub fn order(&self, layout: &Layout) -> Vec<String> {
        layout
            .order
            .iter()
            .map(|id| self.store.node(*id).id().to_string())
            .collect()
    }

    /// Assert every parent prints below each of its children.
    pub fn assert_rows_ordered(&self) {
        for (_, node) in self.store.nodes() {
            let Some(row) = node.row else {
                continue;
            };
            for parent in &node.parents {
                let parent = self.store.node(*parent);
                assert!(
                    parent.row.is_some_and(|r| r > row),
                    "Parent {} (row {:?}) does not print below {} (row {})",
                    parent.id(),
                    parent.row,
                    node.id(),
                    row
                );
            }
        }
    }

    /// Assert placed rows are exactly `0..n`.
    pub fn assert_rows_contiguous(&self, layout: &Layout) {
        let mut rows: Vec<usize> = layout
            .order
            .iter()
            .map(|id| self.store.node(*id).row.expect("Placed node without row"))
            .collect();
        rows.sort_unstable();
        assert_eq!(rows, (0..layout.order.len()).collect::<Vec<_>>());
    }

    /// Assert the final layout still satisfies the crossing checks.
    pub fn assert_no_crossings(&self) {
        let grid = grid_from_layout(&self.store);
        for (id, node) in self.store.nodes() {
            let Some(column) = node.column else {
                continue;
            };
            assert!(
                passes_crossing_checks(&self.store, &grid, column, id),
                "{} crosses a neighbour in column {}",
                node.id(),
                column
            );
        }
    }

    /// Assert `top`/`bottom` links agree with the print order.
    pub fn assert_links_consistent(&self, layout: &Layout) {
        for (i, id) in layout.order.iter().enumerate() {
            let node = self.store.node(*id);
            let expected_top = if i == 0 { None } else { Some(layout.order[i - 1]) };
            assert_eq!(node.top, expected_top, "Bad top link on {}", node.id());
            assert_eq!(node.bottom, layout.order.get(i + 1).copied(), "Bad bottom link on {}", node.id());
        }
    }

    /// Largest number of lanes open across any row gap.
    pub fn max_in_flight(&self, layout: &Layout) -> usize {
        let rows = layout.order.len();
        (0..rows)
            .map(|r| {
                layout
                    .order
                    .iter()
                    .filter(|id| {
                        let node = self.store.node(**id);
                        let row = node.row.unwrap_or_default();
                        let reach = self.store.reach(**id).unwrap_or(row);
                        row <= r && r < reach.max(row + 1)
                    })
                    .count()
            })
            .max()
            .unwrap_or(0)
    }
}
