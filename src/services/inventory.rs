//! Orchestrates a complete run on the configured API surface
//!
//! On REST a single listing covers everything. On GraphQL the viewer's organizations
//! are listed first (unless one organization was requested) and each one's
//! repositories are then enumerated in turn, one request at a time.

use super::organizations::OrganizationEnumerator;
use super::progress::{ProgressEvent, ProgressSink};
use super::repositories::RepositoryEnumerator;
use super::rest::RestRepositoryPaginator;
use crate::github::{GraphQLExecutor, RestExecutor};
use crate::types::{
    ApiVersion, InventoryConfig, InventoryReport, Owner, RepositoryInventory, RestListing,
};

const SOURCE_TAG: &str = "v4:inventory";

pub struct InventoryService<'a, E> {
    executor: &'a E,
    progress: &'a dyn ProgressSink,
}

impl<'a, E> InventoryService<'a, E> {
    pub fn new(executor: &'a E, progress: &'a dyn ProgressSink) -> Self {
        Self { executor, progress }
    }
}

impl<E: RestExecutor> InventoryService<'_, E> {
    /// Lists repositories through the REST API
    pub async fn list_rest(&self, organization: Option<&Owner>) -> RestListing {
        RestRepositoryPaginator::new(self.executor, self.progress)
            .paginate(organization)
            .await
    }
}

impl<E: GraphQLExecutor> InventoryService<'_, E> {
    /// Collects repositories per organization through the GraphQL API.
    ///
    /// A failure on one organization is recorded under that organization and the
    /// remaining organizations are still enumerated.
    pub async fn collect_graphql(
        &self,
        organization: Option<&Owner>,
        include_viewer: bool,
    ) -> RepositoryInventory {
        let organizations: Vec<Owner> = match organization {
            Some(org) => vec![org.clone()],
            None => OrganizationEnumerator::new(self.executor, self.progress)
                .list_viewer_orgs()
                .await
                .into_iter()
                .map(|org| org.login)
                .collect(),
        };

        let enumerator = RepositoryEnumerator::new(self.executor, self.progress);
        let mut inventory = RepositoryInventory::default();

        for login in &organizations {
            self.progress.record(
                SOURCE_TAG,
                &ProgressEvent::OrganizationStarted {
                    organization: login.to_string(),
                },
            );

            match enumerator.list_org_repos(login).await {
                Ok(repositories) => inventory.insert_repositories(login.as_str(), repositories),
                Err(stop) => inventory.insert_failure(login.as_str(), stop.to_string()),
            }
        }

        if include_viewer {
            match enumerator.list_viewer_repos().await {
                Ok((login, repositories)) => {
                    inventory.insert_repositories(login.as_str(), repositories)
                }
                Err(stop) => {
                    tracing::warn!("[{}] Viewer repositories unavailable: {}", SOURCE_TAG, stop)
                }
            }
        }

        tracing::info!(
            "[{}] {} organizations, {} repositories, {} failed",
            SOURCE_TAG,
            inventory.repositories.len(),
            inventory.total_repositories(),
            inventory.failed.len()
        );

        inventory
    }
}

impl<E: RestExecutor + GraphQLExecutor> InventoryService<'_, E> {
    /// Runs the listing selected by `config.api_version`
    pub async fn run(&self, config: &InventoryConfig) -> InventoryReport {
        match config.api_version {
            ApiVersion::V3 => {
                InventoryReport::V3(self.list_rest(config.organization.as_ref()).await)
            }
            ApiVersion::V4 => InventoryReport::V4(
                self.collect_graphql(config.organization.as_ref(), config.include_viewer)
                    .await,
            ),
        }
    }
}
