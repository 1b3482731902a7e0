// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the scrape pipeline over a real SQLite store.
//!
//! Each test builds an isolated TestHarness with mock sources. Tests are
//! independent and order-insensitive.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use jobdeck_core::{
    JobdeckError, ListQuery, PostingStatus, PostingStore, PostingUpdate, SortOrder, Source,
};
use jobdeck_pipeline::{ExcludeKeywords, ScrapeRequest};
use jobdeck_test_utils::{MockSource, TestHarness, candidate};
use tokio_util::sync::CancellationToken;

fn request() -> ScrapeRequest {
    ScrapeRequest {
        search_terms: Some("engineer".to_string()),
        exclude_keywords: Some(ExcludeKeywords::List(Vec::new())),
        ..Default::default()
    }
}

// ---- Reconciliation ----

#[tokio::test]
async fn test_repeated_scrape_is_idempotent() {
    let source = MockSource::new(Source::Remotive).with_candidates(vec![
        candidate(Source::Remotive, "1", "Backend Engineer", 1),
        candidate(Source::Remotive, "2", "Frontend Engineer", 2),
    ]);
    let harness = TestHarness::builder()
        .with_source(Arc::new(source))
        .build()
        .await
        .unwrap();
    let cancel = CancellationToken::new();

    harness.service.run_scrape(&request(), &cancel).await.unwrap();
    let first = harness.all_postings().await.unwrap();
    let summary = harness.service.run_scrape(&request(), &cancel).await.unwrap();
    let second = harness.all_postings().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.deleted, 2);
    assert_eq!(summary.preserved, 0);
}

#[tokio::test]
async fn test_touched_posting_survives_rescrape() {
    let source = Arc::new(
        MockSource::new(Source::Remotive)
            .with_candidates(vec![candidate(Source::Remotive, "a", "Platform Engineer", 3)]),
    );
    let harness = TestHarness::builder()
        .with_source(source.clone())
        .build()
        .await
        .unwrap();
    let cancel = CancellationToken::new();

    harness.service.run_scrape(&request(), &cancel).await.unwrap();
    harness
        .service
        .update_posting(
            "remotive:a",
            &PostingUpdate {
                status: Some(PostingStatus::Interested),
                notes: Some("call back monday".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut revised = candidate(Source::Remotive, "a", "Platform Engineer II", 1);
    revised.company = "Acme Corp".to_string();
    source
        .push_candidates(vec![revised, candidate(Source::Remotive, "b", "Data Engineer", 1)])
        .await;
    let summary = harness.service.run_scrape(&request(), &cancel).await.unwrap();

    assert_eq!(summary.preserved, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.inserted, 1);

    let a = harness.service.get_posting("remotive:a").await.unwrap();
    assert_eq!(a.title, "Platform Engineer");
    assert_eq!(a.status, PostingStatus::Interested);
    assert_eq!(a.notes.as_deref(), Some("call back monday"));
    assert!(harness.service.get_posting("remotive:b").await.is_ok());
}

#[tokio::test]
async fn test_untouched_postings_missing_from_scrape_are_swept() {
    let source = Arc::new(MockSource::new(Source::Arbeitnow).with_candidates(vec![
        candidate(Source::Arbeitnow, "keep", "QA Engineer", 1),
        candidate(Source::Arbeitnow, "gone", "Support Engineer", 1),
    ]));
    let harness = TestHarness::builder()
        .with_source(source.clone())
        .build()
        .await
        .unwrap();
    let cancel = CancellationToken::new();

    harness.service.run_scrape(&request(), &cancel).await.unwrap();
    source
        .push_candidates(vec![candidate(Source::Arbeitnow, "keep", "QA Engineer", 1)])
        .await;
    harness.service.run_scrape(&request(), &cancel).await.unwrap();

    let ids: Vec<String> = harness
        .all_postings()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec!["arbeitnow:keep".to_string()]);
}

#[tokio::test]
async fn test_cross_board_duplicates_collapse_to_freshest() {
    let mut older = candidate(Source::Remotive, "r1", "Site Reliability Engineer", 20);
    older.company = "Globex".to_string();
    let mut newer = candidate(Source::TheMuse, "m1", "site reliability engineer", 2);
    newer.company = "GLOBEX".to_string();

    let harness = TestHarness::builder()
        .with_source(Arc::new(MockSource::new(Source::Remotive).with_candidates(vec![older])))
        .with_source(Arc::new(MockSource::new(Source::TheMuse).with_candidates(vec![newer])))
        .build()
        .await
        .unwrap();

    let summary = harness
        .service
        .run_scrape(&request(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.inserted, 1);
    let postings = harness.all_postings().await.unwrap();
    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].source, Source::TheMuse);
}

// ---- Filtering and ranking ----

#[tokio::test]
async fn test_senior_and_lead_titles_are_excluded() {
    let source = MockSource::new(Source::RemoteOk).with_candidates(vec![
        candidate(Source::RemoteOk, "1", "Senior Engineer", 1),
        candidate(Source::RemoteOk, "2", "Software Engineer", 1),
        candidate(Source::RemoteOk, "3", "Team Lead", 1),
    ]);
    let harness = TestHarness::builder()
        .with_source(Arc::new(source))
        .build()
        .await
        .unwrap();

    let req = ScrapeRequest {
        exclude_keywords: Some(ExcludeKeywords::from("Senior, lead")),
        ..request()
    };
    harness
        .service
        .run_scrape(&req, &CancellationToken::new())
        .await
        .unwrap();

    let titles: Vec<String> = harness
        .all_postings()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Software Engineer".to_string()]);
}

#[tokio::test]
async fn test_ranking_keeps_freshest_up_to_limit() {
    let harness = TestHarness::builder()
        .with_source(Arc::new(MockSource::new(Source::Remotive).with_candidates(vec![
            candidate(Source::Remotive, "old", "Old Engineer", 48),
            candidate(Source::Remotive, "mid", "Mid Engineer", 10),
        ])))
        .with_source(Arc::new(MockSource::new(Source::Arbeitnow).with_candidates(vec![
            candidate(Source::Arbeitnow, "new", "New Engineer", 1),
            candidate(Source::Arbeitnow, "older", "Older Engineer", 60),
        ])))
        .build()
        .await
        .unwrap();

    let req = ScrapeRequest {
        max_results: Some(2),
        ..request()
    };
    let summary = harness
        .service
        .run_scrape(&req, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.candidates, 2);

    let listed = harness
        .service
        .list_postings(&ListQuery {
            sort: SortOrder::Freshness,
            ..Default::default()
        })
        .await
        .unwrap();
    let titles: Vec<&str> = listed.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["New Engineer", "Mid Engineer"]);
}

// ---- Failure paths leave the store untouched ----

#[tokio::test]
async fn test_all_sources_failing_leaves_store_unchanged() {
    let harness = TestHarness::builder()
        .with_source(Arc::new(MockSource::new(Source::Remotive).failing("503")))
        .with_source(Arc::new(MockSource::new(Source::TheMuse).failing("dns")))
        .build()
        .await
        .unwrap();
    for native in ["1", "2"] {
        let posting = candidate(Source::Remotive, native, "Cloud Engineer", 1).into_posting();
        harness.store.insert(&posting).await.unwrap();
    }
    let before = harness.all_postings().await.unwrap();

    let err = harness
        .service
        .run_scrape(&request(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        JobdeckError::AllSourcesFailed { failures } => assert_eq!(failures.len(), 2),
        other => panic!("expected AllSourcesFailed, got {other:?}"),
    }
    assert_eq!(harness.all_postings().await.unwrap(), before);
}

#[tokio::test]
async fn test_partial_failure_still_reconciles() {
    let harness = TestHarness::builder()
        .with_source(Arc::new(
            MockSource::new(Source::Remotive)
                .with_candidates(vec![candidate(Source::Remotive, "1", "ML Engineer", 1)]),
        ))
        .with_source(Arc::new(MockSource::new(Source::Arbeitnow).failing("timeout")))
        .build()
        .await
        .unwrap();

    let summary = harness
        .service
        .run_scrape(&request(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.inserted, 1);
    let failed: Vec<Source> = summary.failed_sources().map(|r| r.source).collect();
    assert_eq!(failed, vec![Source::Arbeitnow]);
}

#[tokio::test]
async fn test_cancelled_scrape_leaves_store_unchanged() {
    let harness = TestHarness::builder()
        .with_source(Arc::new(
            MockSource::new(Source::Remotive)
                .with_candidates(vec![candidate(Source::Remotive, "1", "Game Engineer", 1)])
                .with_delay(Duration::from_secs(30)),
        ))
        .build()
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = harness.service.run_scrape(&request(), &cancel).await.unwrap_err();
    assert!(matches!(err, JobdeckError::Cancelled), "got {err:?}");
    assert!(harness.all_postings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_request_contacts_no_source() {
    let source = MockSource::new(Source::Remotive);
    let calls = source.call_counter();
    let harness = TestHarness::builder()
        .with_source(Arc::new(source))
        .build()
        .await
        .unwrap();

    let req = ScrapeRequest {
        max_results: Some(0),
        ..request()
    };
    let err = harness
        .service
        .run_scrape(&req, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JobdeckError::Validation(_)), "got {err:?}");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ---- Editing ----

#[tokio::test]
async fn test_applied_timestamp_follows_status() {
    let harness = TestHarness::builder()
        .with_source(Arc::new(
            MockSource::new(Source::TheMuse)
                .with_candidates(vec![candidate(Source::TheMuse, "x", "Web Engineer", 1)]),
        ))
        .build()
        .await
        .unwrap();
    harness
        .service
        .run_scrape(&request(), &CancellationToken::new())
        .await
        .unwrap();

    let apply = PostingUpdate {
        status: Some(PostingStatus::Applied),
        ..Default::default()
    };
    let applied = harness.service.update_posting("the_muse:x", &apply).await.unwrap();
    let stamp = applied.applied_at.expect("applied_at set on transition");

    let again = harness.service.update_posting("the_muse:x", &apply).await.unwrap();
    assert_eq!(again.applied_at, Some(stamp));

    let reverted = harness
        .service
        .update_posting(
            "the_muse:x",
            &PostingUpdate {
                status: Some(PostingStatus::Interview),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reverted.applied_at, None);
}

#[tokio::test]
async fn test_delete_and_stats_through_service() {
    let harness = TestHarness::builder()
        .with_source(Arc::new(MockSource::new(Source::Remotive).with_candidates(vec![
            candidate(Source::Remotive, "1", "Rust Engineer", 1),
            candidate(Source::Remotive, "2", "Go Engineer", 1),
        ])))
        .build()
        .await
        .unwrap();
    harness
        .service
        .run_scrape(&request(), &CancellationToken::new())
        .await
        .unwrap();

    harness.service.delete_posting("remotive:2").await.unwrap();
    assert!(matches!(
        harness.service.delete_posting("remotive:2").await,
        Err(JobdeckError::NotFound(_))
    ));

    let stats = harness.service.get_stats().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.by_status[&PostingStatus::New], 1);
    assert_eq!(stats.by_status[&PostingStatus::Applied], 0);
    assert_eq!(stats.by_source[&Source::Remotive], 1);
    assert_eq!(stats.unchecked, 1);
}

#[tokio::test]
async fn test_health_reports_each_source() {
    let harness = TestHarness::builder()
        .with_source(Arc::new(MockSource::new(Source::Remotive)))
        .with_source(Arc::new(MockSource::new(Source::RemoteOk).failing("blocked")))
        .build()
        .await
        .unwrap();

    let health = harness.service.health().await;
    assert_eq!(health.store, jobdeck_core::HealthStatus::Healthy);
    assert_eq!(health.sources.len(), 2);
    assert_eq!(health.sources[0].status, jobdeck_core::HealthStatus::Healthy);
    assert!(matches!(
        health.sources[1].status,
        jobdeck_core::HealthStatus::Unhealthy(_)
    ));
}
