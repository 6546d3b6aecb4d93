//! Braid: commit-graph layout for terminal log views.
//!
//! Braid takes a set of commits with parent links and computes, for every
//! commit, a row (print position) and a column (lane) such that the graph
//! can be drawn in a terminal without ambiguous line crossings, as
//! `git log --graph` does.
//!
//! # Example
//!
//! ```
//! use braid::{GlyphRenderer, GraphBuilder, LayoutOptions, deploy};
//!
//! let mut store = GraphBuilder::new()
//!     .commit("merge", ["main", "topic"])
//!     .commit("main", ["base"])
//!     .commit("topic", ["base"])
//!     .root("base")
//!     .build()
//!     .unwrap();
//! let heads = store.resolve(&["merge"]).unwrap();
//!
//! let options = LayoutOptions::default().color(false);
//! let mut out = Vec::new();
//! let layout = deploy(&mut store, &heads, &options, &GlyphRenderer::new(&options), &mut out).unwrap();
//!
//! assert_eq!(layout.width, 2);
//! assert_eq!(layout.order.len(), 4);
//! ```

mod builder;
mod columns;
mod config;
mod grid;
mod layout;
mod render;
mod rows;
mod store;
mod traversal;
mod types;

pub mod source;

// Re-export public API
pub use builder::GraphBuilder;
pub use columns::{assign_columns, grid_from_layout, passes_crossing_checks, select_starting_column};
pub use config::{ConfigFile, LayoutOptions};
pub use grid::OccupancyGrid;
pub use layout::{Layout, LayoutReport, Placement, bind_children, compute, deploy};
pub use render::{Cell, GlyphRenderer, LaneTracker, Renderer, RowShape};
pub use rows::assign_rows;
pub use store::{CommitStore, Node, NodeId, PassState, StoreError};
pub use traversal::Traversal;
pub use types::{Commit, ValidationError};
