// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for jobdeck.
//!
//! Provides the posting data model, the error taxonomy, deterministic
//! identity keys, reconciliation planning, and the adapter traits that
//! source boards and storage backends implement.

pub mod error;
pub mod identity;
pub mod reconcile;
pub mod traits;
pub mod types;

pub use error::JobdeckError;
pub use identity::{DedupKey, IdentityKey};
pub use types::{
    AdapterType, Candidate, HealthStatus, ListQuery, Posting, PostingStats, PostingStatus,
    PostingUpdate, ReconcileSummary, ScrapeQuery, ScrapeSummary, SortOrder, Source,
    SourceOutcome, SourceReport,
};

pub use traits::{CandidateStream, PluginAdapter, PostingStore, SourceAdapter};
