//! Commit store: an arena of layout nodes addressed by index.

use crate::types::{Commit, ValidationError};
use eyre::Result;
use std::collections::{HashMap, HashSet};

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Commit id not present in the store.
    NotFound(String),
    /// A commit with this id was already inserted.
    DuplicateId(String),
    /// The parent relation contains a cycle; these commits could not be ordered.
    CycleDetected { unplaced: Vec<String> },
    /// Validation error.
    Validation(ValidationError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "commit not found: {}", id),
            StoreError::DuplicateId(id) => write!(f, "duplicate commit id: {}", id),
            StoreError::CycleDetected { unplaced } => {
                write!(f, "parent cycle detected, could not order: {}", unplaced.join(", "))
            }
            StoreError::Validation(e) => write!(f, "validation error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Index of a node inside a [`CommitStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A commit plus the layout state the passes compute for it.
#[derive(Debug, Clone)]
pub struct Node {
    pub commit: Commit,

    /// Resolved parents, in source order. Filled by the binding pass.
    pub parents: Vec<NodeId>,

    /// Nodes that list this one as a parent. Filled by the binding pass.
    pub children: Vec<NodeId>,

    /// Vertical print position
    pub row: Option<usize>,

    /// Horizontal lane
    pub column: Option<usize>,

    /// Rightmost column a child lane reaches on this node's row
    pub border: usize,

    /// Previous node in print order
    pub top: Option<NodeId>,

    /// Next node in print order
    pub bottom: Option<NodeId>,
}

impl Node {
    fn new(commit: Commit) -> Self {
        Self {
            commit,
            parents: Vec::new(),
            children: Vec::new(),
            row: None,
            column: None,
            border: 0,
            top: None,
            bottom: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.commit.id
    }

    fn reset(&mut self) {
        self.parents.clear();
        self.children.clear();
        self.row = None;
        self.column = None;
        self.border = 0;
        self.top = None;
        self.bottom = None;
    }
}

/// Per-traversal completion flags, one per node.
///
/// Each pass (binding, rows, columns) owns one of these; call [`PassState::clear`]
/// before reusing it for the next pass.
#[derive(Debug, Clone)]
pub struct PassState {
    done: Vec<bool>,
}

impl PassState {
    pub fn is_done(&self, id: NodeId) -> bool {
        self.done[id.0]
    }

    pub fn mark_done(&mut self, id: NodeId) {
        self.done[id.0] = true;
    }

    pub fn clear(&mut self) {
        self.done.iter_mut().for_each(|d| *d = false);
    }

    /// Number of nodes marked done in this pass.
    pub fn done_count(&self) -> usize {
        self.done.iter().filter(|d| **d).count()
    }
}

/// Holds one node per commit id.
#[derive(Debug, Default)]
pub struct CommitStore {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl CommitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from commits, validating each one.
    pub fn from_commits(commits: impl IntoIterator<Item = Commit>) -> Result<Self> {
        let mut store = Self::new();
        for commit in commits {
            store.insert(commit)?;
        }
        Ok(store)
    }

    /// Insert a commit. Ids must be unique.
    pub fn insert(&mut self, commit: Commit) -> Result<NodeId> {
        commit
            .validate()
            .map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;

        if self.index.contains_key(&commit.id) {
            return Err(eyre::eyre!(StoreError::DuplicateId(commit.id)));
        }

        let id = NodeId(self.nodes.len());
        self.index.insert(commit.id.clone(), id);
        self.nodes.push(Node::new(commit));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by commit id.
    pub fn at(&self, id: &str) -> Result<NodeId> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| eyre::eyre!(StoreError::NotFound(id.to_string())))
    }

    /// Look up several ids, failing on the first unknown one.
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<NodeId>> {
        ids.iter().map(|id| self.at(id.as_ref())).collect()
    }

    /// Look up a node by commit id without failing.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|n| &self.nodes[n.0])
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Fresh completion flags sized for this store.
    pub fn pass_state(&self) -> PassState {
        PassState {
            done: vec![false; self.nodes.len()],
        }
    }

    /// The subset of `ids` not yet done in `pass`, order preserved.
    pub fn skip_if_done(&self, ids: &[NodeId], pass: &PassState) -> Vec<NodeId> {
        ids.iter().copied().filter(|id| !pass.is_done(*id)).collect()
    }

    /// Largest row among the node's parents, or its own row without parents.
    ///
    /// The node's lane occupies its column from `row` down to this row.
    pub fn reach(&self, id: NodeId) -> Option<usize> {
        let node = self.node(id);
        let own = node.row?;
        Some(
            node.parents
                .iter()
                .filter_map(|p| self.node(*p).row)
                .fold(own, usize::max),
        )
    }

    /// Commits no other commit lists as a parent, in insertion order.
    pub fn heads(&self) -> Vec<NodeId> {
        let referenced: HashSet<&str> = self
            .nodes
            .iter()
            .flat_map(|n| n.commit.parents.iter().map(String::as_str))
            .collect();

        self.nodes()
            .filter(|(_, n)| !referenced.contains(n.id()))
            .map(|(id, _)| id)
            .collect()
    }

    /// Follow `bottom` links from `first`.
    pub fn print_order(&self, first: Option<NodeId>) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut cursor = first;
        while let Some(id) = cursor {
            order.push(id);
            cursor = self.node(id).bottom;
        }
        order
    }

    /// Drop every computed layout field so the pipeline can run again.
    pub fn reset_layout(&mut self) {
        self.nodes.iter_mut().for_each(Node::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_store() -> CommitStore {
        CommitStore::from_commits(vec![
            Commit::new("a", ["b"]),
            Commit::new("b", ["c"]),
            Commit::new("c", Vec::<String>::new()),
        ])
        .unwrap()
    }

    #[test]
    fn test_at_known_and_unknown() {
        let store = setup_test_store();

        let b = store.at("b").unwrap();
        assert_eq!(store.node(b).id(), "b");

        let err = store.at("zzz").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(id)) if id == "zzz"
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = setup_test_store();
        let err = store.insert(Commit::new("a", Vec::<String>::new())).unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::DuplicateId(_))));
    }

    #[test]
    fn test_invalid_commit_rejected() {
        let mut store = CommitStore::new();
        let err = store.insert(Commit::new("x", ["x"])).unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_skip_if_done_preserves_order() {
        let store = setup_test_store();
        let ids = store.resolve(&["c", "a", "b"]).unwrap();
        let mut pass = store.pass_state();
        pass.mark_done(ids[1]);

        let remaining = store.skip_if_done(&ids, &pass);
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_pass_state_clear() {
        let store = setup_test_store();
        let mut pass = store.pass_state();
        for (id, _) in store.nodes() {
            pass.mark_done(id);
        }
        assert_eq!(pass.done_count(), 3);

        pass.clear();
        assert_eq!(pass.done_count(), 0);
    }

    #[test]
    fn test_heads_are_unreferenced_commits() {
        let mut store = setup_test_store();
        store.insert(Commit::new("side", ["c"])).unwrap();

        let heads: Vec<&str> = store.heads().into_iter().map(|h| store.node(h).id()).collect();
        assert_eq!(heads, vec!["a", "side"]);
    }
}
