use serde::{Deserialize, Serialize};

use crate::types::{Owner, PAGE_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationRepositoriesVariable {
    pub login: Owner,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerRepositoriesVariable {
    pub after: Option<String>,
}

/// Forks excluded, owned repositories only, newest first
fn repositories_connection() -> String {
    format!(
        r#"repositories(
                    first: {page_size},
                    after: $after,
                    isFork: false,
                    ownerAffiliations: [OWNER],
                    orderBy: {{field: CREATED_AT, direction: DESC}}
                ) {{
                    totalCount
                    edges {{
                        cursor
                        node {{
                            id
                            databaseId
                            nameWithOwner
                            description
                            url
                            isPrivate
                            isFork
                            isArchived
                            isLocked
                            isDisabled
                            forkCount
                        }}
                    }}
                }}"#,
        page_size = PAGE_SIZE
    )
}

pub fn organization_repositories_query() -> String {
    format!(
        r#"
        query($login: String!, $after: String) {{
            organization(login: $login) {{
                login
                {repositories}
            }}
        }}
    "#,
        repositories = repositories_connection()
    )
}

pub fn viewer_repositories_query() -> String {
    format!(
        r#"
        query($after: String) {{
            viewer {{
                login
                {repositories}
            }}
        }}
    "#,
        repositories = repositories_connection()
    )
}
