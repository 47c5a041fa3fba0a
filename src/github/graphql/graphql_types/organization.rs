use serde::{Deserialize, Serialize};

use super::Connection;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationNode {
    pub id: String,
    pub database_id: Option<u64>,
    pub login: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Response of the viewer organizations query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerOrganizationsResponse {
    pub viewer: ViewerOrganizations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerOrganizations {
    pub login: String,
    pub organizations: Connection<OrganizationNode>,
}
