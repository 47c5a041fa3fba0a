//! REST (v3) repository listing payloads

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{Owner, PAGE_SIZE, RepositoryId, RepositoryProblem};

/// Repository as returned by `/user/repos` and `/orgs/{org}/repos`.
///
/// Only the fields the inventory reads are declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestRepositoryNode {
    pub id: u64,
    pub node_id: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub clone_url: Option<String>,
    pub private: Option<bool>,
    pub fork: Option<bool>,
    pub archived: Option<bool>,
    pub disabled: Option<bool>,
    pub forks_count: Option<u64>,
}

impl RestRepositoryNode {
    /// Problem entry when the full name cannot be split into owner and name
    pub fn problem(&self) -> Option<RepositoryProblem> {
        let name_with_owner = self.full_name.clone().unwrap_or_default();
        let reason = RepositoryId::parse_name_with_owner(&name_with_owner).err()?;
        Some(RepositoryProblem {
            database_id: self.id,
            name_with_owner,
            html_url: self.html_url.clone(),
            clone_url: self.clone_url.clone(),
            reason,
        })
    }
}

/// Route of one page of the repository listing
pub fn repositories_route(organization: Option<&Owner>, page: u32) -> String {
    match organization {
        Some(org) => format!(
            "/orgs/{}/repos?per_page={}&page={}",
            urlencoding::encode(org.as_str()),
            PAGE_SIZE,
            page
        ),
        None => format!("/user/repos?per_page={}&page={}", PAGE_SIZE, page),
    }
}

/// Page number carried by a `rel="next"` link target.
///
/// Returns `0`, the end sentinel, when there is no link or it carries no page.
pub fn next_page_from_link(next: Option<&str>) -> u32 {
    next.and_then(|link| Url::parse(link).ok())
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse::<u32>().ok())
        })
        .unwrap_or(0)
}
