use crate::github::error::ApiRetryableError;
use crate::github::rest::{RestRepositoryNode, next_page_from_link, repositories_route};
use crate::types::{DEFAULT_REQUEST_TIMEOUT, FetchedPage, InventoryConfig, NextPage, Owner};

use super::graphql::error::classify_graphql_error;
use super::graphql::graphql_types::{GraphQLPayload, GraphQLResponse};

use anyhow::{Context, Result};
use octocrab::{Octocrab, Page};
use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Executes one GraphQL request against the enterprise GraphQL endpoint
pub trait GraphQLExecutor {
    #[allow(async_fn_in_trait)]
    async fn execute_graphql<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        query_name: &str,
        payload: GraphQLPayload<T>,
    ) -> Result<GraphQLResponse<R>>;
}

/// Fetches one page of the REST repository listing
pub trait RestExecutor {
    /// Lists the repositories of `organization`, or all repositories visible to the
    /// token when `None`. The returned page's `next` is `NextPage::Page(0)` on the last page.
    #[allow(async_fn_in_trait)]
    async fn list_repositories_page(
        &self,
        organization: Option<&Owner>,
        page: u32,
    ) -> Result<FetchedPage<RestRepositoryNode>>;
}

#[derive(Clone)]
pub struct GitHubClient {
    /// Rooted at `<base>/api/v3`
    pub(crate) client: Octocrab,
    /// Rooted at `<base>/api`, where enterprise serves `/graphql`
    graphql_client: Octocrab,
    rest_url: Url,
    request_timeout: Duration,
}

impl GitHubClient {
    /// Builds a client bound to a GitHub Enterprise instance.
    ///
    /// REST pages are requested under `rest_url`. GraphQL requests go to
    /// `<api_url>/graphql`, outside the REST root, so they use their own octocrab
    /// instance.
    pub fn new(
        token: String,
        rest_url: &Url,
        api_url: &Url,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let timeout_duration = timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let connection_timeout = if timeout_duration < Duration::from_secs(10) {
            std::cmp::max(timeout_duration, Duration::from_secs(1))
        } else {
            Duration::from_secs(30)
        };

        let read_write_timeout = std::cmp::max(timeout_duration, Duration::from_secs(1));

        let build = |base_uri: &Url| -> Result<Octocrab> {
            Octocrab::builder()
                .personal_token(token.clone())
                .base_uri(base_uri.as_str())
                .with_context(|| format!("Invalid GitHub url: {}", base_uri))?
                .set_connect_timeout(Some(connection_timeout))
                .set_read_timeout(Some(read_write_timeout))
                .set_write_timeout(Some(read_write_timeout))
                .build()
                .context("Failed to build GitHub client")
        };

        Ok(Self {
            client: build(rest_url)?,
            graphql_client: build(api_url)?,
            rest_url: rest_url.clone(),
            request_timeout: read_write_timeout,
        })
    }

    pub fn from_config(config: &InventoryConfig) -> Result<Self> {
        Self::new(
            config.token.clone(),
            &config.rest_url(),
            &config.api_url(),
            Some(config.request_timeout),
        )
    }

    fn rest_endpoint(&self, route: &str) -> String {
        format!("{}{}", self.rest_url.as_str().trim_end_matches('/'), route)
    }
}

impl GraphQLExecutor for GitHubClient {
    async fn execute_graphql<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        query_name: &str,
        payload: GraphQLPayload<T>,
    ) -> Result<GraphQLResponse<R>> {
        debug!(
            "Starting GraphQL request {} with payload: {}",
            query_name,
            serde_json::to_string(&payload).unwrap_or_else(|_| "Invalid JSON".to_string())
        );

        let start_time = std::time::Instant::now();

        let response: GraphQLResponse<R> = tokio::time::timeout(
            self.request_timeout,
            self.graphql_client.graphql(&payload),
        )
        .await
        .map_err(|_| {
            let duration = start_time.elapsed();
            error!("GraphQL request {} timed out after {:?}", query_name, duration);
            ApiRetryableError::Retryable(format!("GraphQL request timed out after {:?}", duration))
        })?
        .map_err(ApiRetryableError::from_octocrab_error)?;

        debug!(
            "GraphQL request {} completed in {:?}",
            query_name,
            start_time.elapsed()
        );

        if let Some(errors) = &response.errors {
            if !errors.is_empty() {
                let error_msg = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");

                return Err(classify_graphql_error(&error_msg).into());
            }
        }

        Ok(response)
    }
}

impl RestExecutor for GitHubClient {
    async fn list_repositories_page(
        &self,
        organization: Option<&Owner>,
        page: u32,
    ) -> Result<FetchedPage<RestRepositoryNode>> {
        let route = repositories_route(organization, page);
        debug!("Starting REST request {}", route);

        let start_time = std::time::Instant::now();

        let result: Page<RestRepositoryNode> = tokio::time::timeout(
            self.request_timeout,
            self.client.get(self.rest_endpoint(&route), None::<&()>),
        )
        .await
        .map_err(|_| {
            let duration = start_time.elapsed();
            error!("REST request {} timed out after {:?}", route, duration);
            ApiRetryableError::Retryable(format!("REST request timed out after {:?}", duration))
        })?
        .map_err(ApiRetryableError::from_octocrab_error)?;

        let next_link = result.next.as_ref().map(|uri| uri.to_string());
        let next_page = next_page_from_link(next_link.as_deref());

        debug!(
            "REST request {} completed in {:?}, next page {}",
            route,
            start_time.elapsed(),
            next_page
        );

        Ok(FetchedPage {
            items: result.items,
            next: NextPage::Page(next_page),
        })
    }
}
