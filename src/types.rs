//! Core data types for braid commit graphs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single commit as supplied by a version-control backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    /// Opaque unique identifier (usually a hash)
    pub id: String,

    /// Parent ids in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,

    /// Display message; may span multiple lines
    #[serde(default)]
    pub message: String,

    /// Author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Author date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl Commit {
    /// Create a commit with the given id and parents and an empty message.
    pub fn new(id: impl Into<String>, parents: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            message: String::new(),
            author: None,
            date: None,
        }
    }

    /// Abbreviated id used in rendered output.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Validate the commit's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidCharacters(self.id.clone()));
        }

        let mut seen = HashSet::new();
        for parent in &self.parents {
            if parent == &self.id {
                return Err(ValidationError::SelfParent(self.id.clone()));
            }
            if !seen.insert(parent.as_str()) {
                return Err(ValidationError::DuplicateParent(parent.clone()));
            }
        }

        Ok(())
    }
}

/// Validation errors for commits.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyId,
    InvalidCharacters(String),
    SelfParent(String),
    DuplicateParent(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyId => write!(f, "commit id cannot be empty"),
            ValidationError::InvalidCharacters(id) => {
                write!(f, "commit id contains whitespace or control characters: {:?}", id)
            }
            ValidationError::SelfParent(id) => write!(f, "commit {} lists itself as a parent", id),
            ValidationError::DuplicateParent(id) => write!(f, "parent {} listed more than once", id),
        }
    }
}

impl std::error::Error for ValidationError {}
