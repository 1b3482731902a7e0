// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait for posting persistence backends.

use async_trait::async_trait;

use crate::error::JobdeckError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Candidate, ListQuery, Posting, PostingStats, PostingUpdate, ReconcileSummary};

/// Durable keyed storage for postings.
///
/// Writes are serialized. [`PostingStore::reconcile`] reads the touched
/// partition and applies its deletes and inserts as one atomic unit, so a
/// concurrent [`PostingStore::update`] lands either before or after it.
#[async_trait]
pub trait PostingStore: PluginAdapter {
    /// Insert a posting. Fails with `DuplicateId` if the id exists.
    async fn insert(&self, posting: &Posting) -> Result<(), JobdeckError>;

    /// Fetch one posting by id.
    async fn get(&self, id: &str) -> Result<Option<Posting>, JobdeckError>;

    /// Apply a partial update and return the resulting posting.
    ///
    /// Fails with `NotFound` if absent. A status transition into `Applied`
    /// stamps `applied_at`; a transition out of it clears `applied_at`.
    async fn update(&self, id: &str, update: &PostingUpdate) -> Result<Posting, JobdeckError>;

    /// Delete a posting. Fails with `NotFound` if absent.
    async fn delete(&self, id: &str) -> Result<(), JobdeckError>;

    /// List postings matching the query.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Posting>, JobdeckError>;

    /// Counts per status, per source, and by checked flag.
    async fn stats(&self) -> Result<PostingStats, JobdeckError>;

    /// Merge a fresh candidate set, sweeping untouched postings.
    async fn reconcile(&self, fresh: Vec<Candidate>) -> Result<ReconcileSummary, JobdeckError>;
}
