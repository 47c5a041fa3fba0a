use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Owner, Repository, RepositoryProblem, StopReason};

/// Which repositories a REST traversal listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestScope {
    /// Everything visible to the token
    AllVisible,
    Organization(Owner),
}

impl RestScope {
    pub fn from_filter(organization: Option<&Owner>) -> Self {
        match organization {
            Some(org) => Self::Organization(org.clone()),
            None => Self::AllVisible,
        }
    }

    /// Source tag used in progress lines
    pub fn source_tag(&self) -> String {
        match self {
            Self::AllVisible => "v3:all:repos".to_string(),
            Self::Organization(org) => format!("v3:{}:repos", org),
        }
    }
}

/// Outcome of one REST pagination run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestListing {
    pub scope: RestScope,
    /// Records in server order, problem records included
    pub repositories: Vec<Repository>,
    pub problems: Vec<RepositoryProblem>,
    /// Number of requests issued, failed ones included
    pub requests: usize,
    pub stop: StopReason,
}

impl RestListing {
    pub fn total(&self) -> usize {
        self.repositories.len()
    }
}

/// Repositories accumulated per organization by the GraphQL fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInventory {
    /// Organization login to its repositories, newest-created first
    pub repositories: BTreeMap<String, Vec<Repository>>,
    /// Organizations whose enumeration failed, with the reason
    pub failed: BTreeMap<String, String>,
}

impl RepositoryInventory {
    pub fn insert_repositories(&mut self, organization: &str, repositories: Vec<Repository>) {
        self.repositories
            .insert(organization.to_string(), repositories);
    }

    pub fn insert_failure(&mut self, organization: &str, reason: String) {
        self.failed.insert(organization.to_string(), reason);
    }

    pub fn total_repositories(&self) -> usize {
        self.repositories.values().map(Vec::len).sum()
    }
}

/// Result of a complete run on either API surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "api", rename_all = "lowercase")]
pub enum InventoryReport {
    V3(RestListing),
    V4(RepositoryInventory),
}
