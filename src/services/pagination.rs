//! Shared traversal loop for page-indexed and cursor-indexed listings
//!
//! A [`PageSource`] fetches one page for a [`PagePosition`]; [`walk`] drives it from the
//! first position until the server reports the end, a failure stops it under the
//! chosen [`FailurePolicy`], or the pagination data cannot be followed.
//!
//! Termination rules:
//! - page indexed: the reported next page is `0`. A next page that does not move
//!   forward is a protocol violation.
//! - cursor indexed: the number of consumed edges reaches the reported `totalCount`.
//!   Records still outstanding with no edge to take a cursor from, or a cursor that
//!   does not change, is a protocol violation.

use anyhow::Result;

use super::progress::{ProgressEvent, ProgressSink};
use crate::github::error::ApiRetryableError;
use crate::types::{FetchedPage, NextPage, PagePosition, StopReason};

/// Fetches one page of a paginated listing
pub trait PageSource {
    type Item;

    #[allow(async_fn_in_trait)]
    async fn fetch_page(&self, position: &PagePosition) -> Result<FetchedPage<Self::Item>>;
}

/// What a traversal does when a request fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure, keeping what was collected so far
    Stop,
    /// Request the same position again. Stops on a non-retryable error or after
    /// `max_consecutive` failures in a row.
    RetrySamePosition { max_consecutive: u32 },
}

/// Records collected by one traversal and why it ended
#[derive(Debug, Clone)]
pub struct Traversal<T> {
    pub items: Vec<T>,
    /// Requests issued, failed ones included
    pub requests: usize,
    pub stop: StopReason,
}

/// Per-traversal progress. Never shared between traversals.
#[derive(Debug, Clone)]
struct TraversalState {
    position: PagePosition,
    total: usize,
    requests: usize,
    consecutive_failures: u32,
}

impl TraversalState {
    fn new(start: PagePosition) -> Self {
        Self {
            position: start,
            total: 0,
            requests: 0,
            consecutive_failures: 0,
        }
    }
}

enum Advance {
    Continue(PagePosition),
    Done,
    Violation(String),
}

/// Walks `source` from `start` to the end of the listing.
///
/// `inspect` sees every record in server order as its page arrives.
pub async fn walk<S, F>(
    source: &S,
    source_tag: &str,
    start: PagePosition,
    policy: FailurePolicy,
    progress: &dyn ProgressSink,
    mut inspect: F,
) -> Traversal<S::Item>
where
    S: PageSource,
    F: FnMut(&S::Item),
{
    let mut state = TraversalState::new(start);
    let mut items = Vec::new();

    let stop = loop {
        state.requests += 1;

        let page = match source.fetch_page(&state.position).await {
            Ok(page) => {
                state.consecutive_failures = 0;
                page
            }
            Err(e) => {
                state.consecutive_failures += 1;
                let error = format!("{:#}", e);
                progress.record(
                    source_tag,
                    &ProgressEvent::QueryFailed {
                        position: state.position.clone(),
                        attempt: state.consecutive_failures,
                        error: error.clone(),
                    },
                );

                match policy {
                    FailurePolicy::Stop => break StopReason::QueryFailed(error),
                    FailurePolicy::RetrySamePosition { max_consecutive } => {
                        // Unclassified errors are treated as transient
                        let retryable = ApiRetryableError::classify(&e)
                            .map(ApiRetryableError::is_retryable)
                            .unwrap_or(true);
                        if !retryable {
                            break StopReason::QueryFailed(error);
                        }
                        if state.consecutive_failures >= max_consecutive {
                            break StopReason::FailureLimitReached {
                                attempts: state.consecutive_failures,
                                last_error: error,
                            };
                        }
                        continue;
                    }
                }
            }
        };

        let fetched = page.items.len();
        state.total += fetched;
        for item in &page.items {
            inspect(item);
        }
        items.extend(page.items);

        let advance = advance(&state.position, &page.next, fetched, state.total);
        report_page(progress, source_tag, &state, &page.next, fetched);

        match advance {
            Advance::Continue(next) => state.position = next,
            Advance::Done => break StopReason::Exhausted,
            Advance::Violation(details) => {
                progress.record(
                    source_tag,
                    &ProgressEvent::ProtocolViolation {
                        details: details.clone(),
                    },
                );
                break StopReason::ProtocolViolation(details);
            }
        }
    };

    progress.record(
        source_tag,
        &ProgressEvent::Finished {
            total: state.total,
            stop: stop.clone(),
        },
    );

    Traversal {
        items,
        requests: state.requests,
        stop,
    }
}

fn advance(current: &PagePosition, next: &NextPage, fetched: usize, total: usize) -> Advance {
    match (current, next) {
        (PagePosition::PageIndexed(_), NextPage::Page(0)) => Advance::Done,
        (PagePosition::PageIndexed(page), NextPage::Page(next_page)) => {
            if next_page <= page {
                Advance::Violation(format!(
                    "next page {} does not follow page {}",
                    next_page, page
                ))
            } else {
                Advance::Continue(PagePosition::PageIndexed(*next_page))
            }
        }
        (
            PagePosition::CursorIndexed(after),
            NextPage::Cursor {
                total_count,
                last_cursor,
            },
        ) => {
            if total >= *total_count {
                return Advance::Done;
            }
            let remaining = total_count - total;
            match last_cursor {
                None => Advance::Violation(format!(
                    "{} records remaining but the page had no edges",
                    remaining
                )),
                Some(_) if fetched == 0 => Advance::Violation(format!(
                    "{} records remaining but the page had no edges",
                    remaining
                )),
                Some(cursor) if after.as_ref() == Some(cursor) => Advance::Violation(format!(
                    "cursor {} did not advance with {} records remaining",
                    cursor, remaining
                )),
                Some(cursor) => {
                    Advance::Continue(PagePosition::CursorIndexed(Some(cursor.clone())))
                }
            }
        }
        (position, next) => {
            Advance::Violation(format!("{:?} cannot be followed from {}", next, position))
        }
    }
}

fn report_page(
    progress: &dyn ProgressSink,
    source_tag: &str,
    state: &TraversalState,
    next: &NextPage,
    fetched: usize,
) {
    let event = match (&state.position, next) {
        (
            _,
            NextPage::Cursor {
                total_count,
                last_cursor,
            },
        ) => ProgressEvent::CursorAdvanced {
            fetched,
            next_cursor: last_cursor.clone(),
            total: state.total,
            remaining: total_count.saturating_sub(state.total),
        },
        (PagePosition::PageIndexed(page), NextPage::Page(_)) => ProgressEvent::PageFetched {
            page: *page,
            fetched,
            total: state.total,
        },
        (PagePosition::CursorIndexed(_), NextPage::Page(_)) => ProgressEvent::PageFetched {
            page: 0,
            fetched,
            total: state.total,
        },
    };
    progress.record(source_tag, &event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cursor;

    #[test]
    fn test_advance_page_indexed() {
        assert!(matches!(
            advance(&PagePosition::PageIndexed(1), &NextPage::Page(2), 100, 100),
            Advance::Continue(PagePosition::PageIndexed(2))
        ));
        assert!(matches!(
            advance(&PagePosition::PageIndexed(3), &NextPage::Page(0), 50, 250),
            Advance::Done
        ));
        assert!(matches!(
            advance(&PagePosition::PageIndexed(2), &NextPage::Page(2), 100, 200),
            Advance::Violation(_)
        ));
    }

    #[test]
    fn test_advance_cursor_indexed() {
        let next = NextPage::Cursor {
            total_count: 150,
            last_cursor: Some(Cursor::new("c100")),
        };
        match advance(&PagePosition::CursorIndexed(None), &next, 100, 100) {
            Advance::Continue(PagePosition::CursorIndexed(Some(cursor))) => {
                assert_eq!(cursor.as_str(), "c100")
            }
            _ => panic!("expected the cursor to advance"),
        }

        let last = NextPage::Cursor {
            total_count: 150,
            last_cursor: Some(Cursor::new("c150")),
        };
        assert!(matches!(
            advance(
                &PagePosition::CursorIndexed(Some(Cursor::new("c100"))),
                &last,
                50,
                150
            ),
            Advance::Done
        ));
    }

    #[test]
    fn test_advance_cursor_indexed_violations() {
        let empty = NextPage::Cursor {
            total_count: 10,
            last_cursor: None,
        };
        assert!(matches!(
            advance(&PagePosition::CursorIndexed(None), &empty, 0, 0),
            Advance::Violation(_)
        ));

        let stuck = NextPage::Cursor {
            total_count: 300,
            last_cursor: Some(Cursor::new("c100")),
        };
        assert!(matches!(
            advance(
                &PagePosition::CursorIndexed(Some(Cursor::new("c100"))),
                &stuck,
                100,
                200
            ),
            Advance::Violation(_)
        ));
    }

    #[test]
    fn test_empty_connection_is_done() {
        let empty = NextPage::Cursor {
            total_count: 0,
            last_cursor: None,
        };
        assert!(matches!(
            advance(&PagePosition::CursorIndexed(None), &empty, 0, 0),
            Advance::Done
        ));
    }
}
