// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The service contract exposed to outer surfaces (CLI, HTTP layers).
//!
//! `run_scrape` is the only write path that touches more than one posting.
//! It resolves the request, aggregates, filters, ranks, and only then hands
//! the full candidate set to the store's atomic reconcile. Cancelling the
//! token before that hand-off leaves the store untouched.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jobdeck_config::model::ScrapeConfig;
use jobdeck_core::{
    HealthStatus, JobdeckError, ListQuery, Posting, PostingStats, PostingStore, PostingUpdate,
    ScrapeSummary, Source, SourceAdapter,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregator::Aggregator;
use crate::filter::apply_exclusions;
use crate::ranker::rank;
use crate::request::ScrapeRequest;

/// Health of the store and of every configured source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    pub store: HealthStatus,
    pub sources: Vec<SourceHealth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceHealth {
    pub source: Source,
    pub status: HealthStatus,
}

/// Owns the store and the adapter set for the lifetime of the process.
pub struct JobService {
    store: Arc<dyn PostingStore>,
    aggregator: Aggregator,
    defaults: ScrapeConfig,
}

impl JobService {
    pub fn new(
        store: Arc<dyn PostingStore>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
        defaults: ScrapeConfig,
    ) -> Self {
        let timeout = Duration::from_secs(defaults.source_timeout_secs);
        Self {
            store,
            aggregator: Aggregator::new(adapters, timeout),
            defaults,
        }
    }

    pub fn store(&self) -> &Arc<dyn PostingStore> {
        &self.store
    }

    /// Scrape every source and merge the result into the store.
    ///
    /// Fails with `Validation` before any adapter runs, `AllSourcesFailed`
    /// when nothing could be fetched, and `Cancelled` when `cancel` fires
    /// before the reconcile starts. In all three cases the store is unchanged.
    pub async fn run_scrape(
        &self,
        request: &ScrapeRequest,
        cancel: &CancellationToken,
    ) -> Result<ScrapeSummary, JobdeckError> {
        let query = request.resolve(&self.defaults)?;
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        info!(
            run_id = %run_id,
            query = %query.search_terms,
            location = %query.location,
            max_results = query.max_results,
            "scrape started"
        );

        let aggregation = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(run_id = %run_id, "scrape cancelled before reconcile");
                return Err(JobdeckError::Cancelled);
            }
            result = self.aggregator.collect(&query) => result?,
        };

        let fetched = aggregation.candidates.len();
        let filtered = apply_exclusions(aggregation.candidates, &query.exclude_keywords);
        let excluded = fetched - filtered.len();
        let ranked = rank(filtered, query.max_results);
        let candidates = ranked.len();

        if cancel.is_cancelled() {
            warn!(run_id = %run_id, "scrape cancelled before reconcile");
            return Err(JobdeckError::Cancelled);
        }

        let reconciled = self.store.reconcile(ranked).await?;
        let summary = ScrapeSummary {
            run_id,
            inserted: reconciled.inserted,
            preserved: reconciled.preserved,
            deleted: reconciled.deleted,
            skipped: reconciled.skipped,
            candidates,
            per_source: aggregation.reports,
            started_at,
            finished_at: Utc::now(),
        };

        let failed: Vec<String> = summary
            .failed_sources()
            .map(|r| r.source.to_string())
            .collect();
        info!(
            run_id = %summary.run_id,
            fetched,
            excluded,
            candidates,
            inserted = summary.inserted,
            preserved = summary.preserved,
            deleted = summary.deleted,
            skipped = summary.skipped,
            failed_sources = %failed.join(","),
            "scrape completed"
        );
        Ok(summary)
    }

    pub async fn list_postings(&self, query: &ListQuery) -> Result<Vec<Posting>, JobdeckError> {
        self.store.list(query).await
    }

    /// Fetch one posting; `NotFound` if absent.
    pub async fn get_posting(&self, id: &str) -> Result<Posting, JobdeckError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| JobdeckError::NotFound(id.to_string()))
    }

    pub async fn update_posting(
        &self,
        id: &str,
        update: &PostingUpdate,
    ) -> Result<Posting, JobdeckError> {
        let posting = self.store.update(id, update).await?;
        info!(id, status = %posting.status, checked = posting.checked, "posting updated");
        Ok(posting)
    }

    pub async fn delete_posting(&self, id: &str) -> Result<(), JobdeckError> {
        self.store.delete(id).await?;
        info!(id, "posting deleted");
        Ok(())
    }

    pub async fn get_stats(&self) -> Result<PostingStats, JobdeckError> {
        self.store.stats().await
    }

    /// Check the store and every source; probe errors become `Unhealthy`.
    pub async fn health(&self) -> ServiceHealth {
        let store = self
            .store
            .health_check()
            .await
            .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));

        let probes = self.aggregator.adapters().iter().map(|adapter| async move {
            let status = adapter
                .health_check()
                .await
                .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
            SourceHealth {
                source: adapter.source(),
                status,
            }
        });
        let sources = futures::future::join_all(probes).await;

        ServiceHealth { store, sources }
    }
}
