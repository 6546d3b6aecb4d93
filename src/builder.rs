//! Builder pattern API for assembling commit graphs in code.

use crate::store::CommitStore;
use crate::types::Commit;
use chrono::{DateTime, Utc};
use eyre::{Context, Result};

/// Builder for a [`CommitStore`] with a fluent API.
///
/// Message, author and date setters apply to the most recently added commit.
///
/// # Example
///
/// ```
/// use braid::GraphBuilder;
///
/// let store = GraphBuilder::new()
///     .commit("c3", ["c2"])
///     .message("Add parser")
///     .commit("c2", ["c1"])
///     .root("c1")
///     .build()
///     .unwrap();
/// assert_eq!(store.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    commits: Vec<Commit>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit with the given parents.
    pub fn commit(mut self, id: impl Into<String>, parents: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.commits.push(Commit::new(id, parents));
        self
    }

    /// Add a commit without parents.
    pub fn root(self, id: impl Into<String>) -> Self {
        self.commit(id, Vec::<String>::new())
    }

    /// Set the message of the last commit.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(commit) = self.commits.last_mut() {
            commit.message = message.into();
        }
        self
    }

    /// Set the author of the last commit.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        if let Some(commit) = self.commits.last_mut() {
            commit.author = Some(author.into());
        }
        self
    }

    /// Set the date of the last commit.
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        if let Some(commit) = self.commits.last_mut() {
            commit.date = Some(date);
        }
        self
    }

    /// Commits added so far.
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Create the store.
    pub fn build(self) -> Result<CommitStore> {
        CommitStore::from_commits(self.commits).context("Failed to build commit graph")
    }
}
