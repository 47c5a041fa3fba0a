use serde::{Deserialize, Serialize};

use crate::types::{Cursor, NextPage};

/// A cursor-paginated GraphQL connection with its reported total
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub total_count: usize,
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

impl<T> Connection<T> {
    /// Pagination indicator for the page this connection holds
    pub fn next_page(&self) -> NextPage {
        NextPage::Cursor {
            total_count: self.total_count,
            last_cursor: self.edges.last().map(|edge| Cursor::new(edge.cursor.clone())),
        }
    }

    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}
