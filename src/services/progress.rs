//! Progress reporting for traversals
//!
//! Every traversal reports what it does through a [`ProgressSink`], tagged with a source
//! string such as `v3:all:repos`, `v4:orgs` or `v4:org:acme:repos`. The CLI uses
//! [`TracingProgress`], which renders each event as a `[source] message` log line.

use crate::types::{Cursor, PagePosition, RepositoryProblem, StopReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A page-indexed request returned
    PageFetched {
        page: u32,
        fetched: usize,
        total: usize,
    },
    /// A cursor-indexed request returned
    CursorAdvanced {
        fetched: usize,
        next_cursor: Option<Cursor>,
        total: usize,
        remaining: usize,
    },
    QueryFailed {
        position: PagePosition,
        attempt: u32,
        error: String,
    },
    ProtocolViolation {
        details: String,
    },
    ProblemRepository(RepositoryProblem),
    /// Enumeration of one organization's repositories begins
    OrganizationStarted {
        organization: String,
    },
    Finished {
        total: usize,
        stop: StopReason,
    },
}

impl ProgressEvent {
    /// Whether the event describes something that went wrong
    pub fn is_problem(&self) -> bool {
        match self {
            Self::QueryFailed { .. } | Self::ProtocolViolation { .. } => true,
            Self::ProblemRepository(_) => true,
            Self::Finished { stop, .. } => !stop.is_exhausted(),
            _ => false,
        }
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageFetched {
                page,
                fetched,
                total,
            } => write!(f, "Fetched {} | Page {} | Total {}", fetched, page, total),
            Self::CursorAdvanced {
                fetched,
                next_cursor,
                total,
                remaining,
            } => {
                let cursor = next_cursor.as_ref().map(Cursor::as_str).unwrap_or("-");
                write!(
                    f,
                    "Fetched {} | Next Cursor: {} | Total: {} | Left: {}",
                    fetched, cursor, total, remaining
                )
            }
            Self::QueryFailed {
                position,
                attempt,
                error,
            } => write!(
                f,
                "List failure at {} (attempt {}): {}",
                position, attempt, error
            ),
            Self::ProtocolViolation { details } => write!(f, "Protocol violation: {}", details),
            Self::ProblemRepository(problem) => write!(f, "{}", problem),
            Self::OrganizationStarted { organization } => {
                write!(f, "----------- {} -----------", organization)
            }
            Self::Finished { total, stop } => {
                if stop.is_exhausted() {
                    write!(f, "Finished with {} records", total)
                } else {
                    write!(f, "Stopped with {} records: {}", total, stop)
                }
            }
        }
    }
}

/// Receiver of traversal progress
pub trait ProgressSink {
    fn record(&self, source: &str, event: &ProgressEvent);
}

/// Writes progress events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn record(&self, source: &str, event: &ProgressEvent) {
        if event.is_problem() {
            tracing::warn!("[{}] {}", source, event);
        } else {
            tracing::info!("[{}] {}", source, event);
        }
    }
}
