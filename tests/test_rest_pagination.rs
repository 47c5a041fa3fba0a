//! Integration tests for the REST (v3) repository listing
//!
//! These tests drive `RestRepositoryPaginator` against the in-memory GitHub double and
//! check page counts, record validation and the failure handling of the listing.


use ghe_inventory::github::error::ApiRetryableError;
use ghe_inventory::services::{
    MAX_CONSECUTIVE_PAGE_FAILURES, ProgressEvent, RestRepositoryPaginator,
};
use ghe_inventory::types::{NameWithOwnerError, Owner, RestScope, StopReason};
use test_util::{MockGitHub, RecordingProgress, Request};

/// 250 visible repositories come back as pages of 100, 100 and 50
#[tokio::test]
async fn test_lists_all_visible_repositories_in_three_pages() {
    let github = MockGitHub::new().with_rest_count(250);
    let progress = RecordingProgress::default();

    let listing = RestRepositoryPaginator::new(&github, &progress)
        .paginate(None)
        .await;

    assert_eq!(listing.stop, StopReason::Exhausted);
    assert_eq!(listing.scope, RestScope::AllVisible);
    assert_eq!(listing.total(), 250);
    assert_eq!(listing.requests, 3);
    assert!(listing.problems.is_empty());

    let pages: Vec<u32> = github
        .requests()
        .into_iter()
        .map(|r| match r {
            Request::RestPage { organization, page } => {
                assert_eq!(organization, None);
                page
            }
            other => panic!("unexpected request {:?}", other),
        })
        .collect();
    assert_eq!(pages, vec![1, 2, 3]);

    // Every record exactly once, in server order
    let names: Vec<String> = listing
        .repositories
        .iter()
        .map(|r| r.name_with_owner.clone())
        .collect();
    let expected: Vec<String> = (0..250).map(|i| format!("owner/repo-{:04}", i)).collect();
    assert_eq!(names, expected);

    let events = progress.events_for("v3:all:repos");
    assert_eq!(
        events.first(),
        Some(&ProgressEvent::PageFetched {
            page: 1,
            fetched: 100,
            total: 100,
        })
    );
    assert_eq!(
        events.last(),
        Some(&ProgressEvent::Finished {
            total: 250,
            stop: StopReason::Exhausted,
        })
    );
    assert_eq!(events[0].to_string(), "Fetched 100 | Page 1 | Total 100");
}

#[tokio::test]
async fn test_request_count_matches_page_count() {
    for count in [0usize, 1, 99, 100, 101, 1000] {
        let github = MockGitHub::new().with_rest_count(count);
        let progress = RecordingProgress::default();

        let listing = RestRepositoryPaginator::new(&github, &progress)
            .paginate(None)
            .await;

        let expected_requests = count.div_ceil(100).max(1);
        assert_eq!(listing.stop, StopReason::Exhausted, "count {}", count);
        assert_eq!(listing.total(), count, "count {}", count);
        assert_eq!(listing.requests, expected_requests, "count {}", count);
    }
}

#[tokio::test]
async fn test_organization_scope_uses_org_route() {
    let github = MockGitHub::new().with_rest_count(120);
    let progress = RecordingProgress::default();
    let acme = Owner::from("acme");

    let listing = RestRepositoryPaginator::new(&github, &progress)
        .paginate(Some(&acme))
        .await;

    assert_eq!(listing.scope, RestScope::Organization(acme));
    assert_eq!(listing.total(), 120);
    assert!(github.requests().iter().all(|r| matches!(
        r,
        Request::RestPage { organization: Some(org), .. } if org == "acme"
    )));
    assert!(!progress.events_for("v3:acme:repos").is_empty());
}

/// Records without a usable full name are reported and still counted
#[tokio::test]
async fn test_reports_problem_repositories() {
    let names = vec![
        "acme/widgets".to_string(),
        String::new(),
        "ownername".to_string(),
        "acme/tools".to_string(),
    ];
    let github = MockGitHub::new().with_rest_repositories(names);
    let progress = RecordingProgress::default();

    let listing = RestRepositoryPaginator::new(&github, &progress)
        .paginate(None)
        .await;

    assert_eq!(listing.total(), 4);
    assert_eq!(listing.problems.len(), 2);

    let empty = &listing.problems[0];
    assert_eq!(empty.reason, NameWithOwnerError::Empty);
    assert_eq!(empty.database_id, 1);
    assert!(empty.to_string().starts_with("Problem repo: https://"));

    let unsplit = &listing.problems[1];
    assert_eq!(unsplit.reason, NameWithOwnerError::MissingSeparator);
    assert_eq!(unsplit.name_with_owner, "ownername");

    let reported: Vec<ProgressEvent> = progress
        .events_for("v3:all:repos")
        .into_iter()
        .filter(|e| matches!(e, ProgressEvent::ProblemRepository(_)))
        .collect();
    assert_eq!(reported.len(), 2);
    assert!(reported.iter().all(ProgressEvent::is_problem));
}

/// A transient failure is retried on the same page and the listing completes
#[tokio::test]
async fn test_retries_failed_page() {
    let github = MockGitHub::new()
        .with_rest_count(250)
        .failing_rest_page(2, 1);
    let progress = RecordingProgress::default();

    let listing = RestRepositoryPaginator::new(&github, &progress)
        .paginate(None)
        .await;

    assert_eq!(listing.stop, StopReason::Exhausted);
    assert_eq!(listing.total(), 250);
    assert_eq!(listing.requests, 4);

    let pages: Vec<u32> = github
        .requests()
        .into_iter()
        .filter_map(|r| match r {
            Request::RestPage { page, .. } => Some(page),
            _ => None,
        })
        .collect();
    assert_eq!(pages, vec![1, 2, 2, 3]);

    let failures = progress
        .events_for("v3:all:repos")
        .into_iter()
        .filter(|e| matches!(e, ProgressEvent::QueryFailed { .. }))
        .count();
    assert_eq!(failures, 1);
}

/// A page that keeps failing ends the listing with what was collected
#[tokio::test]
async fn test_gives_up_after_consecutive_failures() {
    let github = MockGitHub::new()
        .with_rest_count(250)
        .failing_rest_page(2, 100);
    let progress = RecordingProgress::default();

    let listing = RestRepositoryPaginator::new(&github, &progress)
        .paginate(None)
        .await;

    assert!(matches!(
        listing.stop,
        StopReason::FailureLimitReached { attempts: MAX_CONSECUTIVE_PAGE_FAILURES, .. }
    ));
    assert_eq!(listing.total(), 100);
    assert_eq!(listing.requests, 1 + MAX_CONSECUTIVE_PAGE_FAILURES as usize);
}

#[tokio::test]
async fn test_non_retryable_failure_stops_immediately() {
    let mut github = MockGitHub::new()
        .with_rest_count(250)
        .failing_rest_page(1, 1);
    github.rest_failure = Some(ApiRetryableError::NonRetryable(
        "401 Bad credentials".to_string(),
    ));
    let progress = RecordingProgress::default();

    let listing = RestRepositoryPaginator::new(&github, &progress)
        .paginate(None)
        .await;

    assert!(matches!(
        listing.stop,
        StopReason::QueryFailed(ref e) if e.contains("Bad credentials")
    ));
    assert_eq!(listing.total(), 0);
    assert_eq!(listing.requests, 1);
}

/// A next page that does not move forward would loop forever
#[tokio::test]
async fn test_next_page_must_advance() {
    let mut github = MockGitHub::new().with_rest_count(250);
    github.rest_stuck_next_page = Some(1);
    let progress = RecordingProgress::default();

    let listing = RestRepositoryPaginator::new(&github, &progress)
        .paginate(None)
        .await;

    assert!(matches!(listing.stop, StopReason::ProtocolViolation(_)));
    assert_eq!(listing.requests, 1);
    assert_eq!(listing.total(), 100);
}

/// Uneven page sizes change the request count, never the records
#[tokio::test]
async fn test_uneven_pages_visit_every_record_once() {
    let progress = RecordingProgress::default();

    let even = MockGitHub::new().with_rest_count(101);
    let expected = RestRepositoryPaginator::new(&even, &progress)
        .paginate(None)
        .await;
    assert_eq!(expected.requests, 2);

    for sizes in [vec![30, 70, 1], vec![1, 1, 1], vec![101]] {
        let github = MockGitHub::new()
            .with_rest_count(101)
            .with_page_sizes(&sizes);

        let listing = RestRepositoryPaginator::new(&github, &progress)
            .paginate(None)
            .await;

        let expected_requests = match sizes.as_slice() {
            [30, 70, 1] => 3,
            // 1 + 1 + 1 then 98 in a page of 100
            [1, 1, 1] => 4,
            _ => 1,
        };
        assert_eq!(listing.stop, StopReason::Exhausted, "pages {:?}", sizes);
        assert_eq!(listing.requests, expected_requests, "pages {:?}", sizes);
        assert_eq!(listing.repositories, expected.repositories, "pages {:?}", sizes);
    }
}
