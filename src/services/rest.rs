use anyhow::Result;

use super::pagination::{FailurePolicy, PageSource, walk};
use super::progress::{ProgressEvent, ProgressSink};
use crate::github::RestExecutor;
use crate::github::rest::RestRepositoryNode;
use crate::types::{FetchedPage, Owner, PagePosition, Repository, RestListing, RestScope};

/// Consecutive failed requests for one page before the REST listing gives up
pub const MAX_CONSECUTIVE_PAGE_FAILURES: u32 = 3;

struct RestPageSource<'a, E> {
    executor: &'a E,
    organization: Option<&'a Owner>,
}

impl<E: RestExecutor> PageSource for RestPageSource<'_, E> {
    type Item = RestRepositoryNode;

    async fn fetch_page(&self, position: &PagePosition) -> Result<FetchedPage<Self::Item>> {
        match position {
            PagePosition::PageIndexed(page) => {
                self.executor
                    .list_repositories_page(self.organization, *page)
                    .await
            }
            PagePosition::CursorIndexed(_) => {
                Err(anyhow::anyhow!("REST repository listing is page indexed"))
            }
        }
    }
}

/// Walks the REST repository listing page by page, validating each record
pub struct RestRepositoryPaginator<'a, E> {
    executor: &'a E,
    progress: &'a dyn ProgressSink,
}

impl<'a, E: RestExecutor> RestRepositoryPaginator<'a, E> {
    pub fn new(executor: &'a E, progress: &'a dyn ProgressSink) -> Self {
        Self { executor, progress }
    }

    /// Lists every repository of `organization`, or every repository visible to the
    /// token when `None`.
    ///
    /// A failed page is requested again; records whose full name cannot be split are
    /// reported as problems and kept in the listing.
    pub async fn paginate(&self, organization: Option<&Owner>) -> RestListing {
        let scope = RestScope::from_filter(organization);
        let source_tag = scope.source_tag();
        let source = RestPageSource {
            executor: self.executor,
            organization,
        };

        let mut problems = Vec::new();
        let traversal = walk(
            &source,
            &source_tag,
            PagePosition::first_page(),
            FailurePolicy::RetrySamePosition {
                max_consecutive: MAX_CONSECUTIVE_PAGE_FAILURES,
            },
            self.progress,
            |node: &RestRepositoryNode| {
                if let Some(problem) = node.problem() {
                    let event = ProgressEvent::ProblemRepository(problem.clone());
                    self.progress.record(&source_tag, &event);
                    problems.push(problem);
                }
            },
        )
        .await;

        RestListing {
            scope,
            repositories: traversal.items.into_iter().map(Repository::from).collect(),
            problems,
            requests: traversal.requests,
            stop: traversal.stop,
        }
    }
}
