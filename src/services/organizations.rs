use anyhow::Result;

use super::pagination::{FailurePolicy, PageSource, walk};
use super::progress::ProgressSink;
use crate::github::GraphQLExecutor;
use crate::github::graphql::graphql_types::{
    GraphQLPayload, GraphQLQuery, GraphQLResponse, ViewerOrganizationsResponse,
};
use crate::github::graphql::organization::{
    ViewerOrganizationsVariable, viewer_organizations_query,
};
use crate::types::{FetchedPage, Organization, PagePosition};

const SOURCE_TAG: &str = "v4:orgs";

struct ViewerOrganizationsSource<'a, E> {
    executor: &'a E,
}

impl<E: GraphQLExecutor> PageSource for ViewerOrganizationsSource<'_, E> {
    type Item = Organization;

    async fn fetch_page(&self, position: &PagePosition) -> Result<FetchedPage<Self::Item>> {
        let PagePosition::CursorIndexed(after) = position else {
            return Err(anyhow::anyhow!("Organization listing is cursor indexed"));
        };

        let payload = GraphQLPayload {
            query: GraphQLQuery(viewer_organizations_query()),
            variables: Some(ViewerOrganizationsVariable {
                after: after.as_ref().map(|cursor| cursor.0.clone()),
            }),
        };

        let response: GraphQLResponse<ViewerOrganizationsResponse> = self
            .executor
            .execute_graphql("viewer_organizations", payload)
            .await?;

        let data = response
            .data
            .ok_or_else(|| anyhow::anyhow!("No data in GraphQL viewer organizations response"))?;

        let connection = data.viewer.organizations;
        let next = connection.next_page();
        Ok(FetchedPage {
            items: connection
                .into_nodes()
                .into_iter()
                .map(Organization::from)
                .collect(),
            next,
        })
    }
}

/// Lists the organizations of the authenticated viewer
pub struct OrganizationEnumerator<'a, E> {
    executor: &'a E,
    progress: &'a dyn ProgressSink,
}

impl<'a, E: GraphQLExecutor> OrganizationEnumerator<'a, E> {
    pub fn new(executor: &'a E, progress: &'a dyn ProgressSink) -> Self {
        Self { executor, progress }
    }

    /// Every organization of the viewer, in server order.
    ///
    /// Each call starts from the first cursor. A failed request or a page that cannot
    /// be followed ends the listing early; the organizations gathered until then are
    /// returned and the stop is reported to the progress sink.
    pub async fn list_viewer_orgs(&self) -> Vec<Organization> {
        let source = ViewerOrganizationsSource {
            executor: self.executor,
        };

        let traversal = walk(
            &source,
            SOURCE_TAG,
            PagePosition::first_cursor(),
            FailurePolicy::Stop,
            self.progress,
            |_| {},
        )
        .await;

        traversal.items
    }
}
