//! Repository domain types and full-name validation
//!
//! This module holds the repository record produced by both API surfaces together with
//! the `owner/name` parsing used to flag problem repositories during traversal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::github::graphql::graphql_types::RepositoryNode;
use crate::github::rest::RestRepositoryNode;

static NAME_WITH_OWNER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^/]+)/([^/]+)$").expect("Failed to compile name-with-owner regex")
});

/// Owner name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Owner(pub String);

impl Owner {
    pub fn new(owner: String) -> Self {
        Self(owner)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Owner {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Owner {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Repository name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryName(pub String);

impl RepositoryName {
    pub fn new(repo_name: String) -> Self {
        Self(repo_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a `nameWithOwner` value could not be split into owner and name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameWithOwnerError {
    /// The server returned no full name at all
    Empty,
    /// There is no `/` between owner and name
    MissingSeparator,
    /// A `/` is present but the parts around it do not form `owner/name`
    Inconsistent,
}

impl std::fmt::Display for NameWithOwnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty full name"),
            Self::MissingSeparator => write!(f, "no owner separator in full name"),
            Self::Inconsistent => write!(f, "full name is not of the form owner/name"),
        }
    }
}

impl std::error::Error for NameWithOwnerError {}

/// A strongly-typed `owner/name` repository identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryId {
    pub owner: Owner,
    pub repository_name: RepositoryName,
}

impl RepositoryId {
    pub fn new<T1: Into<String>, T2: Into<String>>(owner: T1, name: T2) -> Self {
        Self {
            owner: Owner::new(owner.into()),
            repository_name: RepositoryName::new(name.into()),
        }
    }

    /// Split a `nameWithOwner` value into its owner and repository name.
    ///
    /// Exactly one `/` with a non-empty part on each side is accepted.
    pub fn parse_name_with_owner(name_with_owner: &str) -> Result<Self, NameWithOwnerError> {
        if name_with_owner.is_empty() {
            return Err(NameWithOwnerError::Empty);
        }
        if !name_with_owner.contains('/') {
            return Err(NameWithOwnerError::MissingSeparator);
        }

        let captures = NAME_WITH_OWNER_REGEX
            .captures(name_with_owner)
            .ok_or(NameWithOwnerError::Inconsistent)?;

        match (captures.get(1), captures.get(2)) {
            (Some(owner), Some(name)) => Ok(Self::new(owner.as_str(), name.as_str())),
            _ => Err(NameWithOwnerError::Inconsistent),
        }
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn repo_name(&self) -> &RepositoryName {
        &self.repository_name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository_name)
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// A repository as listed by either API surface.
///
/// Records are built once per page and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Opaque node identifier
    pub id: String,
    pub database_id: u64,
    /// Full name in `owner/name` form, possibly empty or malformed
    pub name_with_owner: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub is_private: bool,
    pub is_fork: bool,
    pub is_archived: bool,
    pub is_locked: bool,
    pub is_disabled: bool,
    pub fork_count: u64,
}

impl From<RepositoryNode> for Repository {
    fn from(node: RepositoryNode) -> Self {
        Self {
            id: node.id,
            database_id: node.database_id.unwrap_or_default(),
            name_with_owner: node.name_with_owner,
            description: node.description,
            url: node.url,
            is_private: node.is_private,
            is_fork: node.is_fork,
            is_archived: node.is_archived,
            is_locked: node.is_locked,
            is_disabled: node.is_disabled,
            fork_count: node.fork_count,
        }
    }
}

impl From<RestRepositoryNode> for Repository {
    fn from(node: RestRepositoryNode) -> Self {
        Self {
            id: node.node_id.unwrap_or_default(),
            database_id: node.id,
            name_with_owner: node.full_name.unwrap_or_default(),
            description: node.description,
            url: node.html_url,
            is_private: node.private.unwrap_or_default(),
            is_fork: node.fork.unwrap_or_default(),
            is_archived: node.archived.unwrap_or_default(),
            // The REST listing has no lock flag
            is_locked: false,
            is_disabled: node.disabled.unwrap_or_default(),
            fork_count: node.forks_count.unwrap_or_default(),
        }
    }
}

/// A repository whose full name could not be validated.
///
/// Carries enough identity to look the repository up by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryProblem {
    pub database_id: u64,
    pub name_with_owner: String,
    pub html_url: Option<String>,
    pub clone_url: Option<String>,
    pub reason: NameWithOwnerError,
}

impl std::fmt::Display for RepositoryProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let html_url = self.html_url.as_deref().unwrap_or("-");
        let clone_url = self.clone_url.as_deref().unwrap_or("-");
        match self.reason {
            // Nothing identifies the record except its URLs
            NameWithOwnerError::Empty => write!(f, "Problem repo: {} {}", html_url, clone_url),
            _ => write!(
                f,
                "Problem repo: {} {} {} {} ({})",
                self.database_id, self.name_with_owner, html_url, clone_url, self.reason
            ),
        }
    }
}
