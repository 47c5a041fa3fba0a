use std::sync::OnceLock;

use anyhow::Result;

use super::pagination::{FailurePolicy, PageSource, Traversal, walk};
use super::progress::ProgressSink;
use crate::github::GraphQLExecutor;
use crate::github::error::ApiRetryableError;
use crate::github::graphql::graphql_types::{
    GraphQLPayload, GraphQLQuery, GraphQLResponse, OrganizationRepositoriesResponse,
    OwnerRepositories, ViewerRepositoriesResponse,
};
use crate::github::graphql::repository::{
    OrganizationRepositoriesVariable, ViewerRepositoriesVariable,
    organization_repositories_query, viewer_repositories_query,
};
use crate::types::{Cursor, FetchedPage, Owner, PagePosition, Repository, StopReason};

fn after_cursor(position: &PagePosition) -> Result<Option<String>> {
    match position {
        PagePosition::CursorIndexed(after) => Ok(after.as_ref().map(|c: &Cursor| c.0.clone())),
        PagePosition::PageIndexed(_) => {
            Err(anyhow::anyhow!("Repository connection is cursor indexed"))
        }
    }
}

fn into_page(owner: OwnerRepositories) -> FetchedPage<Repository> {
    let connection = owner.repositories;
    let next = connection.next_page();
    FetchedPage {
        items: connection
            .into_nodes()
            .into_iter()
            .map(Repository::from)
            .collect(),
        next,
    }
}

struct OrganizationRepositoriesSource<'a, E> {
    executor: &'a E,
    login: &'a Owner,
}

impl<E: GraphQLExecutor> PageSource for OrganizationRepositoriesSource<'_, E> {
    type Item = Repository;

    async fn fetch_page(&self, position: &PagePosition) -> Result<FetchedPage<Self::Item>> {
        let payload = GraphQLPayload {
            query: GraphQLQuery(organization_repositories_query()),
            variables: Some(OrganizationRepositoriesVariable {
                login: self.login.clone(),
                after: after_cursor(position)?,
            }),
        };

        let response: GraphQLResponse<OrganizationRepositoriesResponse> = self
            .executor
            .execute_graphql("organization_repositories", payload)
            .await?;

        let data = response.data.ok_or_else(|| {
            anyhow::anyhow!("No data in GraphQL organization repositories response")
        })?;

        let organization = data.organization.ok_or_else(|| {
            ApiRetryableError::NonRetryable(format!("Organization not found: {}", self.login))
        })?;

        Ok(into_page(organization))
    }
}

struct ViewerRepositoriesSource<'a, E> {
    executor: &'a E,
    login: OnceLock<String>,
}

impl<E: GraphQLExecutor> PageSource for ViewerRepositoriesSource<'_, E> {
    type Item = Repository;

    async fn fetch_page(&self, position: &PagePosition) -> Result<FetchedPage<Self::Item>> {
        let payload = GraphQLPayload {
            query: GraphQLQuery(viewer_repositories_query()),
            variables: Some(ViewerRepositoriesVariable {
                after: after_cursor(position)?,
            }),
        };

        let response: GraphQLResponse<ViewerRepositoriesResponse> = self
            .executor
            .execute_graphql("viewer_repositories", payload)
            .await?;

        let data = response
            .data
            .ok_or_else(|| anyhow::anyhow!("No data in GraphQL viewer repositories response"))?;

        let _ = self.login.set(data.viewer.login.clone());
        Ok(into_page(data.viewer))
    }
}

/// Lists repositories owned by an organization or by the viewer.
///
/// Forks are excluded, only directly owned repositories are listed and the newest
/// repository comes first.
pub struct RepositoryEnumerator<'a, E> {
    executor: &'a E,
    progress: &'a dyn ProgressSink,
}

impl<'a, E: GraphQLExecutor> RepositoryEnumerator<'a, E> {
    pub fn new(executor: &'a E, progress: &'a dyn ProgressSink) -> Self {
        Self { executor, progress }
    }

    /// Every repository owned by the organization `login`.
    ///
    /// A failed request abandons the organization: the result is `Err` with the stop
    /// reason, never a partial list, so an empty `Ok` always means the organization
    /// has no repositories.
    pub async fn list_org_repos(&self, login: &Owner) -> Result<Vec<Repository>, StopReason> {
        let source = OrganizationRepositoriesSource {
            executor: self.executor,
            login,
        };
        let source_tag = format!("v4:org:{}:repos", login);

        complete_or_stop(
            walk(
                &source,
                &source_tag,
                PagePosition::first_cursor(),
                FailurePolicy::Stop,
                self.progress,
                |_| {},
            )
            .await,
        )
    }

    /// Every repository owned by the viewer, with the viewer's login
    pub async fn list_viewer_repos(&self) -> Result<(Owner, Vec<Repository>), StopReason> {
        let source = ViewerRepositoriesSource {
            executor: self.executor,
            login: OnceLock::new(),
        };

        let repositories = complete_or_stop(
            walk(
                &source,
                "v4:viewer:repos",
                PagePosition::first_cursor(),
                FailurePolicy::Stop,
                self.progress,
                |_| {},
            )
            .await,
        )?;

        let login = source.login.into_inner().unwrap_or_default();
        Ok((Owner::new(login), repositories))
    }
}

fn complete_or_stop(traversal: Traversal<Repository>) -> Result<Vec<Repository>, StopReason> {
    if traversal.stop.is_exhausted() {
        Ok(traversal.items)
    } else {
        Err(traversal.stop)
    }
}
