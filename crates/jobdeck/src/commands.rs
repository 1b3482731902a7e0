// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Posting subcommands: scrape, list, show, update, delete, stats.
//!
//! Each command maps its clap arguments onto a `JobService` call and hands
//! back a serializable value; `main` prints it as JSON.

use clap::Args;
use jobdeck_core::{
    JobdeckError, ListQuery, Posting, PostingStats, PostingStatus, PostingUpdate, ScrapeSummary,
    SortOrder,
};
use jobdeck_pipeline::{ExcludeKeywords, JobService, ScrapeRequest};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// Search terms (defaults to `scrape.search_query`).
    #[arg(long)]
    pub query: Option<String>,
    /// Location filter (defaults to `scrape.location`).
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub max_results: Option<usize>,
    #[arg(long)]
    pub max_age_hours: Option<u32>,
    /// Comma-separated title exclusions, e.g. `senior,lead`. Pass "" for none.
    #[arg(long)]
    pub exclude: Option<String>,
}

impl From<ScrapeArgs> for ScrapeRequest {
    fn from(args: ScrapeArgs) -> Self {
        ScrapeRequest {
            search_terms: args.query,
            location: args.location,
            max_results: args.max_results,
            max_age_hours: args.max_age_hours,
            exclude_keywords: args.exclude.as_deref().map(ExcludeKeywords::from),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub status: Option<PostingStatus>,
    /// Substring match over title, company, and location.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, action = clap::ArgAction::Set)]
    pub checked: Option<bool>,
    /// `inserted` or `freshness`.
    #[arg(long, default_value_t = SortOrder::Inserted)]
    pub sort: SortOrder,
}

impl From<ListArgs> for ListQuery {
    fn from(args: ListArgs) -> Self {
        ListQuery {
            status: args.status,
            search: args.search,
            checked: args.checked,
            sort: args.sort,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub status: Option<PostingStatus>,
    #[arg(long, action = clap::ArgAction::Set)]
    pub checked: Option<bool>,
    /// Free-form notes; an empty string clears them.
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
}

pub async fn scrape(
    service: &JobService,
    args: ScrapeArgs,
    cancel: &CancellationToken,
) -> Result<ScrapeSummary, JobdeckError> {
    service.run_scrape(&args.into(), cancel).await
}

pub async fn list(service: &JobService, args: ListArgs) -> Result<Vec<Posting>, JobdeckError> {
    service.list_postings(&args.into()).await
}

pub async fn show(service: &JobService, id: &str) -> Result<Posting, JobdeckError> {
    service.get_posting(id).await
}

pub async fn update(service: &JobService, args: UpdateArgs) -> Result<Posting, JobdeckError> {
    let update = PostingUpdate {
        status: args.status,
        checked: args.checked,
        notes: args.notes,
    };
    service.update_posting(&args.id, &update).await
}

pub async fn delete(service: &JobService, id: &str) -> Result<Deleted, JobdeckError> {
    service.delete_posting(id).await?;
    Ok(Deleted {
        id: id.to_string(),
        deleted: true,
    })
}

pub async fn stats(service: &JobService) -> Result<PostingStats, JobdeckError> {
    service.get_stats().await
}
