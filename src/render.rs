//! Turning laid-out nodes into text.
//!
//! [`LaneTracker`] walks the print order and works out, per row, which
//! columns carry a lane and where horizontal connectors run. A
//! [`Renderer`] turns that geometry plus the commit into output lines.

use crate::config::LayoutOptions;
use crate::store::{CommitStore, Node, NodeId};
use colored::{Color, Colorize};
use std::collections::BTreeMap;

const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// What occupies one column of one output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// A lane passes straight through.
    Lane,
    /// The commit itself.
    Commit,
    /// A child's lane ends here and turns toward the commit.
    Join,
    /// A child's lane turns toward the commit and also keeps going down.
    Fork,
    /// Horizontal connector.
    Run,
}

/// Geometry of one printed commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowShape {
    pub width: usize,
    pub column: usize,
    pub border: usize,
    /// Columns of the commit's parents, in parent order.
    pub parents: Vec<usize>,
    /// Inclusive column range joined by a horizontal connector.
    pub span: Option<(usize, usize)>,
    /// Cells of the commit line.
    pub cells: Vec<Cell>,
    /// Cells of continuation lines printed under the commit line.
    pub trailing: Vec<Cell>,
}

/// Output collaborator: draws one commit.
pub trait Renderer {
    /// Lines to print for `node`, top to bottom.
    fn render(&self, shape: &RowShape, node: &Node) -> Vec<String>;
}

/// Open lanes between rows, keyed by column, valued by the row they end on.
#[derive(Debug)]
pub struct LaneTracker {
    width: usize,
    lanes: BTreeMap<usize, usize>,
}

impl LaneTracker {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            lanes: BTreeMap::new(),
        }
    }

    /// Shape of the next row. Call in print order.
    pub fn shape(&mut self, store: &CommitStore, id: NodeId) -> RowShape {
        let node = store.node(id);
        let row = node.row.unwrap_or_default();
        let column = node.column.unwrap_or_default();

        let mut turns = Vec::new();
        for child in &node.children {
            let Some(child_column) = store.node(*child).column else {
                continue;
            };
            if child_column == column {
                continue;
            }
            let continues = store.reach(*child).is_some_and(|reach| reach > row);
            turns.push((child_column, if continues { Cell::Fork } else { Cell::Join }));
        }

        let lo = turns.iter().map(|(c, _)| *c).fold(column, usize::min);
        let hi = turns.iter().map(|(c, _)| *c).fold(node.border.max(column), usize::max);
        let width = self.width.max(hi + 1);

        let mut cells = vec![Cell::Empty; width];
        for (&lane_column, &end) in &self.lanes {
            if end > row && lane_column < width {
                cells[lane_column] = Cell::Lane;
            }
        }
        for (turn_column, cell) in &turns {
            cells[*turn_column] = *cell;
        }
        for cell in &mut cells[lo..=hi] {
            if *cell == Cell::Empty {
                *cell = Cell::Run;
            }
        }
        cells[column] = Cell::Commit;

        self.lanes.retain(|_, end| *end > row);
        if let Some(reach) = store.reach(id)
            && reach > row
        {
            self.lanes.insert(column, reach);
        }

        let trailing = (0..width)
            .map(|c| if self.lanes.contains_key(&c) { Cell::Lane } else { Cell::Empty })
            .collect();

        let parents = node.parents.iter().filter_map(|p| store.node(*p).column).collect();

        RowShape {
            width,
            column,
            border: node.border,
            parents,
            span: (lo < hi).then_some((lo, hi)),
            cells,
            trailing,
        }
    }

    /// Columns with a lane still open.
    pub fn open_lanes(&self) -> usize {
        self.lanes.len()
    }
}

/// Default renderer: two characters per column followed by the commit text.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphRenderer {
    pub hflip: bool,
    pub vflip: bool,
    pub color: bool,
}

impl GlyphRenderer {
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            hflip: options.hflip,
            vflip: options.vflip,
            color: options.color,
        }
    }

    fn paint(&self, glyph: char, column: usize) -> String {
        if self.color {
            glyph.to_string().color(PALETTE[column % PALETTE.len()]).to_string()
        } else {
            glyph.to_string()
        }
    }

    fn glyph(&self, cell: Cell, column: usize) -> String {
        match cell {
            Cell::Empty => " ".to_string(),
            Cell::Commit if self.color => "*".bold().to_string(),
            Cell::Commit => "*".to_string(),
            Cell::Lane => self.paint('|', column),
            Cell::Join if self.vflip => self.paint('.', column),
            Cell::Join => self.paint('\'', column),
            Cell::Fork => self.paint('+', column),
            Cell::Run => self.paint('-', column),
        }
    }

    /// Graph prefix for one line, including the separator after each column.
    pub fn graph(&self, cells: &[Cell], span: Option<(usize, usize)>) -> String {
        let order: Vec<usize> = if self.hflip {
            (0..cells.len()).rev().collect()
        } else {
            (0..cells.len()).collect()
        };
        let within = |c: usize| span.is_some_and(|(lo, hi)| lo <= c && c <= hi);

        let mut out = String::new();
        for (pos, &column) in order.iter().enumerate() {
            out.push_str(&self.glyph(cells[column], column));
            match order.get(pos + 1) {
                Some(&next) if within(column) && within(next) => {
                    out.push_str(&self.paint('-', column.max(next)));
                }
                _ => out.push(' '),
            }
        }
        out
    }
}

impl Renderer for GlyphRenderer {
    fn render(&self, shape: &RowShape, node: &Node) -> Vec<String> {
        let commit = &node.commit;
        let short_id = if self.color {
            commit.short_id().yellow().to_string()
        } else {
            commit.short_id().to_string()
        };

        let meta = match (&commit.author, commit.date) {
            (Some(author), Some(date)) => Some(format!("({}, {})", author, date.format("%Y-%m-%d"))),
            (Some(author), None) => Some(format!("({})", author)),
            (None, Some(date)) => Some(format!("({})", date.format("%Y-%m-%d"))),
            (None, None) => None,
        };
        let text = match meta {
            Some(meta) if commit.summary().is_empty() => meta,
            Some(meta) => format!("{} {}", commit.summary(), meta),
            None => commit.summary().to_string(),
        };

        let header = format!("{}{} {}", self.graph(&shape.cells, shape.span), short_id, text);
        let mut lines = vec![header.trim_end().to_string()];
        let continuation = self.graph(&shape.trailing, None);
        let pad = " ".repeat(commit.short_id().chars().count() + 1);
        for line in commit.message.lines().skip(1) {
            lines.push(format!("{}{}{}", continuation, pad, line).trim_end().to_string());
        }

        if self.vflip {
            lines.reverse();
        }
        lines
    }
}
