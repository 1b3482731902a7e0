// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles a `JobService` over a temp SQLite store and a
//! caller-supplied set of (usually mock) sources.

use std::sync::Arc;

use jobdeck_config::model::{ScrapeConfig, StorageConfig};
use jobdeck_core::{JobdeckError, ListQuery, Posting, PostingStore, SourceAdapter};
use jobdeck_pipeline::JobService;
use jobdeck_storage::SqliteStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    sources: Vec<Arc<dyn SourceAdapter>>,
    scrape: ScrapeConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            sources: Vec::new(),
            scrape: ScrapeConfig::default(),
        }
    }

    /// Add a source adapter. Keep your own `Arc` to inspect it later.
    pub fn with_source(mut self, source: Arc<dyn SourceAdapter>) -> Self {
        self.sources.push(source);
        self
    }

    /// Replace the scrape defaults.
    pub fn with_scrape_config(mut self, scrape: ScrapeConfig) -> Self {
        self.scrape = scrape;
        self
    }

    /// Replace the default exclusion list.
    pub fn with_exclude_keywords(mut self, keywords: &[&str]) -> Self {
        self.scrape.exclude_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Build the test harness, creating the store in a fresh temp directory.
    pub async fn build(self) -> Result<TestHarness, JobdeckError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| JobdeckError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let store = SqliteStore::open(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        })
        .await?;
        let store = Arc::new(store);
        let service = JobService::new(
            Arc::clone(&store) as Arc<dyn PostingStore>,
            self.sources,
            self.scrape,
        );

        Ok(TestHarness {
            service,
            store,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete service stack for integration testing.
///
/// The temp directory lives as long as the harness.
pub struct TestHarness {
    pub service: JobService,
    pub store: Arc<SqliteStore>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Every posting in insertion order.
    pub async fn all_postings(&self) -> Result<Vec<Posting>, JobdeckError> {
        self.store.list(&ListQuery::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_source::{MockSource, candidate};
    use jobdeck_core::Source;
    use jobdeck_pipeline::ScrapeRequest;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn harness_runs_a_scrape() {
        let source = MockSource::new(Source::Remotive)
            .with_candidates(vec![candidate(Source::Remotive, "1", "Rust Engineer", 1)]);
        let harness = TestHarness::builder()
            .with_source(Arc::new(source))
            .build()
            .await
            .unwrap();

        let summary = harness
            .service
            .run_scrape(&ScrapeRequest::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(harness.all_postings().await.unwrap().len(), 1);
    }
}
