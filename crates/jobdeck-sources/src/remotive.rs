// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remotive adapter (`GET /api/remote-jobs`).
//!
//! Remotive searches server-side and honors `limit`, so one request covers
//! the whole query.

use async_trait::async_trait;
use chrono::Utc;
use futures::stream;
use jobdeck_core::{
    AdapterType, Candidate, CandidateStream, HealthStatus, JobdeckError, PluginAdapter,
    ScrapeQuery, Source, SourceAdapter,
};
use serde::Deserialize;

use crate::client::HttpClient;
use crate::normalize::{
    Listing, ListingFilter, candidate_stream, non_empty, parse_salary_range, parse_timestamp,
};

const SOURCE: Source = Source::Remotive;

#[derive(Debug, Deserialize)]
struct RemotiveResponse {
    jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
struct RemotiveJob {
    id: u64,
    url: String,
    title: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    job_type: Option<String>,
    #[serde(default)]
    publication_date: Option<String>,
    #[serde(default)]
    candidate_required_location: Option<String>,
    #[serde(default)]
    salary: Option<String>,
}

impl RemotiveJob {
    fn into_listing(self, fetched_at: chrono::DateTime<Utc>) -> Listing {
        let salary = non_empty(self.salary);
        let (salary_min, salary_max) = salary.as_deref().map_or((None, None), parse_salary_range);
        let mut keywords = self.tags;
        keywords.extend(self.category);
        Listing {
            candidate: Candidate {
                source: SOURCE,
                native_id: Some(self.id.to_string()),
                title: self.title.trim().to_string(),
                company: self.company_name.trim().to_string(),
                location: self
                    .candidate_required_location
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                salary_source: salary_min.map(|_| "direct_data".to_string()),
                salary_min,
                salary_max,
                job_type: non_empty(self.job_type),
                // Remotive only lists remote roles.
                is_remote: true,
                url: self.url,
                posted_at: self.publication_date.as_deref().and_then(parse_timestamp),
                fetched_at,
            },
            keywords,
        }
    }
}

/// Source adapter for remotive.com.
pub struct RemotiveSource {
    client: HttpClient,
    base_url: String,
}

impl RemotiveSource {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for RemotiveSource {
    fn name(&self) -> &str {
        "remotive"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, JobdeckError> {
        let url = HttpClient::endpoint(SOURCE, &self.base_url, "/api/remote-jobs", &[(
            "limit",
            "1".to_string(),
        )])?;
        Ok(self.client.probe(url).await)
    }
}

#[async_trait]
impl SourceAdapter for RemotiveSource {
    fn source(&self) -> Source {
        SOURCE
    }

    async fn fetch(&self, query: &ScrapeQuery) -> Result<CandidateStream, JobdeckError> {
        let url = HttpClient::endpoint(SOURCE, &self.base_url, "/api/remote-jobs", &[
            ("search", query.search_terms.clone()),
            ("limit", query.max_results.to_string()),
        ])?;
        let now = Utc::now();
        let filter = ListingFilter::new(query, now).searched_upstream();
        let client = self.client.clone();

        let page = stream::once(async move {
            let response: RemotiveResponse = client.get_json(SOURCE, url).await?;
            Ok::<Vec<Listing>, JobdeckError>(
                response
                    .jobs
                    .into_iter()
                    .map(|job| job.into_listing(now))
                    .collect(),
            )
        });
        Ok(candidate_stream(page, filter))
    }
}
