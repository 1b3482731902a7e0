// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the jobdeck pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::identity::{DedupKey, IdentityKey};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Source,
    Storage,
}

/// The job board a posting originated from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Remotive,
    Arbeitnow,
    RemoteOk,
    TheMuse,
}

impl Source {
    /// Every board jobdeck knows how to fetch.
    pub const ALL: [Source; 4] = [
        Source::Remotive,
        Source::Arbeitnow,
        Source::RemoteOk,
        Source::TheMuse,
    ];
}

/// Application-status workflow of a posting.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum PostingStatus {
    #[default]
    New,
    Interested,
    Applied,
    Interview,
    Rejected,
}

impl PostingStatus {
    /// All statuses in workflow order.
    pub const ALL: [PostingStatus; 5] = [
        PostingStatus::New,
        PostingStatus::Interested,
        PostingStatus::Applied,
        PostingStatus::Interview,
        PostingStatus::Rejected,
    ];
}

/// Returns true if the user has interacted with a posting in any way.
///
/// Touched postings survive every scrape untouched.
pub fn is_touched(status: PostingStatus, checked: bool, notes: Option<&str>) -> bool {
    status != PostingStatus::New || checked || notes.is_some_and(|n| !n.trim().is_empty())
}

/// A normalized posting produced by a source adapter, before it is stored.
///
/// Carries no tracking state; `id`, `status`, `checked`, and `applied_at`
/// are assigned when it becomes a [`Posting`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub source: Source,
    /// The board's own identifier, when it exposes one.
    pub native_id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    /// Where the salary figure came from (e.g. "direct_data", "description").
    pub salary_source: Option<String>,
    pub job_type: Option<String>,
    pub is_remote: bool,
    pub url: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

impl Candidate {
    /// Stable identity of this candidate across scrapes.
    pub fn identity_key(&self) -> IdentityKey {
        match self.native_id.as_deref() {
            Some(native) if !native.trim().is_empty() => IdentityKey::native(self.source, native),
            _ => IdentityKey::synthetic(self.source, &self.title, &self.company, &self.location),
        }
    }

    /// Normalized (title, company, location) triple used for cross-board dedup.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.title, &self.company, &self.location)
    }

    /// Convert into a fresh, untouched posting.
    pub fn into_posting(self) -> Posting {
        Posting {
            id: self.identity_key().into_string(),
            source: self.source,
            title: self.title,
            company: self.company,
            location: self.location,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            salary_source: self.salary_source,
            job_type: self.job_type,
            is_remote: self.is_remote,
            url: self.url,
            posted_at: self.posted_at,
            fetched_at: self.fetched_at,
            status: PostingStatus::New,
            checked: false,
            applied_at: None,
            notes: None,
        }
    }
}

/// One job listing as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    pub source: Source,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_source: Option<String>,
    pub job_type: Option<String>,
    pub is_remote: bool,
    pub url: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
    pub status: PostingStatus,
    pub checked: bool,
    pub applied_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Posting {
    /// See [`is_touched`].
    pub fn is_touched(&self) -> bool {
        is_touched(self.status, self.checked, self.notes.as_deref())
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.title, &self.company, &self.location)
    }
}

/// Partial update of a posting's tracking fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingUpdate {
    pub status: Option<PostingStatus>,
    pub checked: Option<bool>,
    pub notes: Option<String>,
}

impl PostingUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.checked.is_none() && self.notes.is_none()
    }
}

/// Ordering of [`ListQuery`] results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Order in which postings entered the store.
    #[default]
    Inserted,
    /// `posted_at` descending (missing dates last), ties by `fetched_at` descending.
    Freshness,
}

/// Read-path filter over the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    pub status: Option<PostingStatus>,
    /// Case-insensitive substring over title, company, and location.
    pub search: Option<String>,
    pub checked: Option<bool>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Aggregate counts over the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingStats {
    pub total: u64,
    /// Every status is present, including those with a zero count.
    pub by_status: BTreeMap<PostingStatus, u64>,
    pub checked: u64,
    pub unchecked: u64,
    pub by_source: BTreeMap<Source, u64>,
}

/// A validated scrape request, ready to hand to the source adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeQuery {
    pub search_terms: String,
    pub location: String,
    pub max_results: usize,
    pub max_age_hours: u32,
    /// Lower-cased, trimmed, non-empty.
    pub exclude_keywords: Vec<String>,
}

/// How one adapter fared during a scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceOutcome {
    Succeeded { fetched: usize, elapsed_ms: u64 },
    Failed { reason: String },
}

/// Per-source status line in a scrape summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: Source,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Succeeded { .. })
    }
}

/// Result of merging a fresh candidate set into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// Untouched postings removed by the stale sweep.
    pub deleted: usize,
    /// Touched postings left as they were.
    pub preserved: usize,
    /// Candidates inserted as new postings.
    pub inserted: usize,
    /// Candidates dropped because a touched posting already covers them.
    pub skipped: usize,
}

/// Outcome of a complete scrape run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeSummary {
    pub run_id: String,
    pub inserted: usize,
    pub preserved: usize,
    pub deleted: usize,
    pub skipped: usize,
    /// Candidates that survived filtering and ranking.
    pub candidates: usize,
    pub per_source: Vec<SourceReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeSummary {
    /// Sources that failed during this run.
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.per_source.iter().filter(|r| !r.succeeded())
    }
}
