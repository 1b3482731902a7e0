// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock job board adapter for deterministic testing.
//!
//! `MockSource` implements `SourceAdapter` with scripted candidates,
//! failures, and delays, so pipeline tests never touch the network.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use jobdeck_core::{
    AdapterType, Candidate, CandidateStream, HealthStatus, JobdeckError, PluginAdapter,
    ScrapeQuery, Source, SourceAdapter,
};

#[derive(Debug, Clone)]
enum Failure {
    /// Fail before yielding anything.
    Immediate(String),
    /// Yield the scripted candidates, then fail.
    AfterCandidates(String),
}

/// A mock source that yields pre-configured candidates.
///
/// Queued candidate sets are served one per `fetch`, FIFO. When the queue
/// is empty, the default set from [`MockSource::with_candidates`] is used.
pub struct MockSource {
    source: Source,
    candidates: Vec<Candidate>,
    queued: Arc<Mutex<VecDeque<Vec<Candidate>>>>,
    failure: Option<Failure>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockSource {
    /// A healthy source that yields nothing.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            candidates: Vec::new(),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            failure: None,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the default candidate set.
    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Fail every fetch with `SourceUnavailable`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(Failure::Immediate(reason.into()));
        self
    }

    /// Yield the candidates, then fail the stream.
    pub fn failing_after_candidates(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(Failure::AfterCandidates(reason.into()));
        self
    }

    /// Sleep this long before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a candidate set for the next fetch.
    pub async fn push_candidates(&self, candidates: Vec<Candidate>) {
        self.queued.lock().await.push_back(candidates);
    }

    /// Handle counting how many times `fetch` was called.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    async fn next_candidates(&self) -> Vec<Candidate> {
        self.queued
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.candidates.clone())
    }
}

#[async_trait]
impl PluginAdapter for MockSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, JobdeckError> {
        Ok(match &self.failure {
            Some(Failure::Immediate(reason)) => HealthStatus::Unhealthy(reason.clone()),
            _ => HealthStatus::Healthy,
        })
    }
}

#[async_trait]
impl SourceAdapter for MockSource {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(&self, query: &ScrapeQuery) -> Result<CandidateStream, JobdeckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let source = self.source;
        let candidates = self.next_candidates().await;
        let items = candidates
            .into_iter()
            .take(query.max_results)
            .map(Ok::<Candidate, JobdeckError>);

        match self.failure.clone() {
            Some(Failure::Immediate(reason)) => Err(JobdeckError::source_unavailable(source, reason)),
            Some(Failure::AfterCandidates(reason)) => {
                let tail = stream::once(async move {
                    Err(JobdeckError::source_unavailable(source, reason))
                });
                Ok(Box::pin(stream::iter(items).chain(tail)))
            }
            None => Ok(Box::pin(stream::iter(items))),
        }
    }
}

/// A dated, remote candidate from `source` posted `hours_ago` hours ago.
pub fn candidate(source: Source, native_id: &str, title: &str, hours_ago: i64) -> Candidate {
    let now = Utc::now();
    Candidate {
        source,
        native_id: Some(native_id.to_string()),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        salary_min: None,
        salary_max: None,
        salary_source: None,
        job_type: Some("full_time".to_string()),
        is_remote: true,
        url: format!("https://jobs.example.com/{source}/{native_id}"),
        posted_at: Some(now - chrono::Duration::hours(hours_ago)),
        fetched_at: now,
    }
}
