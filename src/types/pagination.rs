//! Pagination state shared by the REST and GraphQL traversals
//!
//! REST listings are addressed by page number and GraphQL connections by an opaque
//! cursor. Both are expressed as a [`PagePosition`] so one traversal loop can drive
//! either surface.

use serde::{Deserialize, Serialize};

/// First page number of a REST listing
pub const FIRST_REST_PAGE: u32 = 1;

/// Maximum number of records the server returns per page on either surface
pub const PAGE_SIZE: u8 = 100;

/// Opaque server-issued position in a GraphQL connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(pub String);

impl Cursor {
    pub fn new<T: Into<String>>(cursor: T) -> Self {
        Self(cursor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the next request of a traversal starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagePosition {
    /// REST page number, starting at [`FIRST_REST_PAGE`]
    PageIndexed(u32),
    /// GraphQL `after` cursor, `None` on the first request
    CursorIndexed(Option<Cursor>),
}

impl PagePosition {
    pub fn first_page() -> Self {
        Self::PageIndexed(FIRST_REST_PAGE)
    }

    pub fn first_cursor() -> Self {
        Self::CursorIndexed(None)
    }
}

impl std::fmt::Display for PagePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageIndexed(page) => write!(f, "page {}", page),
            Self::CursorIndexed(Some(cursor)) => write!(f, "cursor {}", cursor),
            Self::CursorIndexed(None) => write!(f, "first cursor"),
        }
    }
}

/// What the server reported about the page following the one just received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// REST: the next page number. `0` is the end sentinel.
    Page(u32),
    /// GraphQL: the connection's total and the cursor of the last edge, if any
    Cursor {
        total_count: usize,
        last_cursor: Option<Cursor>,
    },
}

/// One page of records together with the server's pagination indicator
#[derive(Debug, Clone)]
pub struct FetchedPage<T> {
    pub items: Vec<T>,
    pub next: NextPage,
}

/// Why a traversal stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The server reported no further data
    Exhausted,
    /// A request failed and the traversal's policy is to stop on failure
    QueryFailed(String),
    /// Consecutive failed requests reached the retry limit
    FailureLimitReached { attempts: u32, last_error: String },
    /// The server's pagination data cannot be followed
    ProtocolViolation(String),
}

impl StopReason {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "no more pages"),
            Self::QueryFailed(error) => write!(f, "query failed: {}", error),
            Self::FailureLimitReached {
                attempts,
                last_error,
            } => write!(
                f,
                "gave up after {} consecutive failures: {}",
                attempts, last_error
            ),
            Self::ProtocolViolation(details) => write!(f, "protocol violation: {}", details),
        }
    }
}
