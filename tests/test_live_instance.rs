//! Smoke tests against a live GitHub Enterprise instance
//!
//! The instance and token are taken from GITHUB_URL and GITHUB_TOKEN, the same way the
//! CLI resolves them. Only the first REST page and the viewer's organizations are
//! requested, so the tests stay cheap on large instances.
//!
//! Run with: cargo test --features integration-tests

#![cfg(feature = "integration-tests")]

use serial_test::serial;

use ghe_inventory::github::{GitHubClient, RestExecutor};
use ghe_inventory::services::{ConfigOverrides, OrganizationEnumerator, ProgressEvent, resolve_config};
use ghe_inventory::types::{NextPage, StopReason};
use test_util::RecordingProgress;

fn live_client() -> GitHubClient {
    let _ = rustls::crypto::ring::default_provider().install_default();
    let config = resolve_config(ConfigOverrides::default())
        .expect("GITHUB_TOKEN and GITHUB_URL must point at a GitHub Enterprise instance");
    GitHubClient::from_config(&config).expect("client should build")
}

#[tokio::test]
#[serial]
async fn test_first_rest_page() {
    let client = live_client();

    let page = client
        .list_repositories_page(None, 1)
        .await
        .expect("first page of /user/repos should load");

    assert!(page.items.len() <= 100);
    match page.next {
        NextPage::Page(0) => {}
        NextPage::Page(next) => assert_eq!(next, 2),
        other => panic!("REST listing returned {:?}", other),
    }
}

/// The GraphQL endpoint is reachable and the organization cursor runs to the end
#[tokio::test]
#[serial]
async fn test_viewer_organizations() {
    let client = live_client();
    let progress = RecordingProgress::default();

    let organizations = OrganizationEnumerator::new(&client, &progress)
        .list_viewer_orgs()
        .await;

    let finished = progress.events_for("v4:orgs").pop();
    assert!(
        matches!(
            finished,
            Some(ProgressEvent::Finished {
                stop: StopReason::Exhausted,
                ..
            })
        ),
        "organization listing ended with {:?}",
        finished
    );
    for organization in &organizations {
        assert!(!organization.key().is_empty());
    }
}
