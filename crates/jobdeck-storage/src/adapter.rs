// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the PostingStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use jobdeck_config::model::StorageConfig;
use jobdeck_core::{
    AdapterType, Candidate, HealthStatus, JobdeckError, ListQuery, PluginAdapter, Posting,
    PostingStats, PostingStore, PostingUpdate, ReconcileSummary,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed posting store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened by [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a store for the configured path without opening it.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize a store in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, JobdeckError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), JobdeckError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| JobdeckError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Checkpoint the WAL. Connections close when the store is dropped.
    pub async fn close(&self) -> Result<(), JobdeckError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    fn db(&self) -> Result<&Database, JobdeckError> {
        self.db.get().ok_or_else(|| JobdeckError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, JobdeckError> {
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        db.reader()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl PostingStore for SqliteStore {
    async fn insert(&self, posting: &Posting) -> Result<(), JobdeckError> {
        queries::postings::insert_posting(self.db()?, posting).await
    }

    async fn get(&self, id: &str) -> Result<Option<Posting>, JobdeckError> {
        queries::postings::get_posting(self.db()?, id).await
    }

    async fn update(&self, id: &str, update: &PostingUpdate) -> Result<Posting, JobdeckError> {
        queries::postings::update_posting(self.db()?, id, update).await
    }

    async fn delete(&self, id: &str) -> Result<(), JobdeckError> {
        queries::postings::delete_posting(self.db()?, id).await
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Posting>, JobdeckError> {
        queries::postings::list_postings(self.db()?, query).await
    }

    async fn stats(&self) -> Result<PostingStats, JobdeckError> {
        queries::postings::posting_stats(self.db()?).await
    }

    async fn reconcile(&self, fresh: Vec<Candidate>) -> Result<ReconcileSummary, JobdeckError> {
        queries::reconcile::reconcile(self.db()?, fresh).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            database_path: dir.path().join("store.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn uninitialized_store_reports_unhealthy() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(config(&dir));
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        assert!(store.get("x").await.is_err());
    }

    #[tokio::test]
    async fn initialized_store_is_healthy() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(config(&dir)).await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
        assert_eq!(store.adapter_type(), AdapterType::Storage);
        assert!(store.initialize().await.is_err());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn store_reads_see_committed_writes() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(config(&dir)).await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 0);
        assert!(store.list(&ListQuery::default()).await.unwrap().is_empty());
    }
}
