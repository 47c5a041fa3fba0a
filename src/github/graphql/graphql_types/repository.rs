use serde::{Deserialize, Serialize};

use super::Connection;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub id: String,
    pub database_id: Option<u64>,
    #[serde(default)]
    pub name_with_owner: String,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_fork: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub fork_count: u64,
}

/// Response of the organization repositories query.
///
/// `organization` is null when the login does not resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationRepositoriesResponse {
    pub organization: Option<OwnerRepositories>,
}

/// Response of the viewer repositories query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerRepositoriesResponse {
    pub viewer: OwnerRepositories,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRepositories {
    pub login: String,
    pub repositories: Connection<RepositoryNode>,
}
