use serde::{Deserialize, Serialize};

use super::Owner;
use crate::github::graphql::graphql_types::OrganizationNode;

/// An organization the authenticated viewer belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub database_id: u64,
    /// Login used to address the organization in queries
    pub login: Owner,
    /// Display name, which may differ from the login or be unset
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Organization {
    /// Key under which this organization's repositories are accumulated
    pub fn key(&self) -> &str {
        self.login.as_str()
    }
}

impl From<OrganizationNode> for Organization {
    fn from(node: OrganizationNode) -> Self {
        Self {
            id: node.id,
            database_id: node.database_id.unwrap_or_default(),
            login: Owner::new(node.login),
            name: node.name,
            description: node.description,
        }
    }
}
