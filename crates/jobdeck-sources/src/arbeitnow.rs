// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arbeitnow adapter (`GET /api/job-board-api?page=N`).
//!
//! The feed has no search parameter; pages are pulled lazily and matched
//! client-side until the query is satisfied or `links.next` runs out.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream;
use jobdeck_core::{
    AdapterType, Candidate, CandidateStream, HealthStatus, JobdeckError, PluginAdapter,
    ScrapeQuery, Source, SourceAdapter,
};
use serde::Deserialize;
use tracing::debug;

use crate::client::HttpClient;
use crate::normalize::{Listing, ListingFilter, MAX_PAGES, candidate_stream, from_unix};

const SOURCE: Source = Source::Arbeitnow;
const FEED_PATH: &str = "/api/job-board-api";

#[derive(Debug, Deserialize)]
struct ArbeitnowPage {
    data: Vec<ArbeitnowJob>,
    #[serde(default)]
    links: ArbeitnowLinks,
}

#[derive(Debug, Default, Deserialize)]
struct ArbeitnowLinks {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArbeitnowJob {
    slug: String,
    title: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    remote: bool,
    url: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    job_types: Vec<String>,
    #[serde(default)]
    created_at: i64,
}

impl ArbeitnowJob {
    fn into_listing(self, fetched_at: DateTime<Utc>) -> Listing {
        let job_type = (!self.job_types.is_empty()).then(|| self.job_types.join(", "));
        let mut keywords = self.tags;
        keywords.extend(self.job_types);
        Listing {
            candidate: Candidate {
                source: SOURCE,
                native_id: Some(self.slug),
                title: self.title.trim().to_string(),
                company: self.company_name.trim().to_string(),
                location: self.location.trim().to_string(),
                salary_min: None,
                salary_max: None,
                salary_source: None,
                job_type,
                is_remote: self.remote,
                url: self.url,
                posted_at: from_unix(self.created_at),
                fetched_at,
            },
            keywords,
        }
    }
}

/// Source adapter for arbeitnow.com.
pub struct ArbeitnowSource {
    client: HttpClient,
    base_url: String,
}

impl ArbeitnowSource {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for ArbeitnowSource {
    fn name(&self) -> &str {
        "arbeitnow"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, JobdeckError> {
        let url = HttpClient::endpoint(SOURCE, &self.base_url, FEED_PATH, &[(
            "page",
            "1".to_string(),
        )])?;
        Ok(self.client.probe(url).await)
    }
}

#[async_trait]
impl SourceAdapter for ArbeitnowSource {
    fn source(&self) -> Source {
        SOURCE
    }

    async fn fetch(&self, query: &ScrapeQuery) -> Result<CandidateStream, JobdeckError> {
        let now = Utc::now();
        let filter = ListingFilter::new(query, now);
        let client = self.client.clone();
        let base_url = self.base_url.clone();

        let pages = stream::try_unfold(Some(1u32), move |page| {
            let client = client.clone();
            let base_url = base_url.clone();
            async move {
                let Some(page) = page else {
                    return Ok(None);
                };
                let url = HttpClient::endpoint(SOURCE, &base_url, FEED_PATH, &[(
                    "page",
                    page.to_string(),
                )])?;
                let body: ArbeitnowPage = client.get_json(SOURCE, url).await?;
                debug!(source = %SOURCE, page, jobs = body.data.len(), "page fetched");

                let next = (body.links.next.is_some() && !body.data.is_empty() && page < MAX_PAGES)
                    .then_some(page + 1);
                let listings: Vec<Listing> =
                    body.data.into_iter().map(|job| job.into_listing(now)).collect();
                Ok::<_, JobdeckError>(Some((listings, next)))
            }
        });
        Ok(candidate_stream(pages, filter))
    }
}
