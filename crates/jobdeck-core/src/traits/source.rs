// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source adapter trait for job boards.

use std::pin::Pin;

use async_trait::async_trait;

use crate::error::JobdeckError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Candidate, ScrapeQuery, Source};

/// A lazily produced sequence of normalized candidates.
///
/// An `Err` item means the fetch could not complete; the whole adapter is
/// then treated as unavailable for this scrape.
pub type CandidateStream =
    Pin<Box<dyn futures_core::Stream<Item = Result<Candidate, JobdeckError>> + Send>>;

/// Adapter for a single job board.
///
/// Implementations fetch postings matching the query, normalize them into
/// [`Candidate`]s, and honor `max_results` and `max_age_hours`. Failures
/// surface as [`JobdeckError::SourceUnavailable`].
#[async_trait]
pub trait SourceAdapter: PluginAdapter {
    /// The board this adapter fetches from.
    fn source(&self) -> Source;

    /// Start fetching candidates for `query`.
    async fn fetch(&self, query: &ScrapeQuery) -> Result<CandidateStream, JobdeckError>;
}
