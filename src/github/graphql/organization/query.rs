use serde::{Deserialize, Serialize};

use crate::types::PAGE_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerOrganizationsVariable {
    pub after: Option<String>,
}

/// Organizations of the authenticated viewer, one page after `$after`
pub fn viewer_organizations_query() -> String {
    format!(
        r#"
        query($after: String) {{
            viewer {{
                login
                organizations(first: {page_size}, after: $after) {{
                    totalCount
                    edges {{
                        cursor
                        node {{
                            id
                            databaseId
                            login
                            name
                            description
                        }}
                    }}
                }}
            }}
        }}
    "#,
        page_size = PAGE_SIZE
    )
}
