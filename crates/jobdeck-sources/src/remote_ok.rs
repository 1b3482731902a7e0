// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote OK adapter (`GET /api`).
//!
//! The whole feed arrives in one array whose first element is a legal
//! notice rather than a job.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream;
use jobdeck_core::{
    AdapterType, Candidate, CandidateStream, HealthStatus, JobdeckError, PluginAdapter,
    ScrapeQuery, Source, SourceAdapter,
};
use serde::Deserialize;

use crate::client::HttpClient;
use crate::normalize::{Listing, ListingFilter, candidate_stream, from_unix, parse_timestamp};

const SOURCE: Source = Source::RemoteOk;

/// Remote OK has served ids both as strings and as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JobId {
    Text(String),
    Number(u64),
}

impl JobId {
    fn into_string(self) -> String {
        match self {
            JobId::Text(s) => s,
            JobId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteOkJob {
    id: JobId,
    #[serde(default)]
    epoch: i64,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    company: String,
    position: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    location: String,
    #[serde(default)]
    salary_min: f64,
    #[serde(default)]
    salary_max: f64,
    url: String,
}

impl RemoteOkJob {
    fn into_listing(self, fetched_at: DateTime<Utc>) -> Listing {
        let positive = |v: f64| (v > 0.0).then_some(v);
        let salary_min = positive(self.salary_min);
        let salary_max = positive(self.salary_max);
        let posted_at = from_unix(self.epoch).or_else(|| self.date.as_deref().and_then(parse_timestamp));
        Listing {
            candidate: Candidate {
                source: SOURCE,
                native_id: Some(self.id.into_string()),
                title: self.position.trim().to_string(),
                company: self.company.trim().to_string(),
                location: self.location.trim().to_string(),
                salary_source: salary_min.or(salary_max).map(|_| "direct_data".to_string()),
                salary_min,
                salary_max,
                job_type: None,
                is_remote: true,
                url: self.url,
                posted_at,
                fetched_at,
            },
            keywords: self.tags,
        }
    }
}

/// Decode the feed, skipping the leading legal notice.
fn decode_feed(entries: Vec<serde_json::Value>) -> Result<Vec<RemoteOkJob>, JobdeckError> {
    entries
        .into_iter()
        .filter(|entry| entry.get("legal").is_none())
        .map(|entry| {
            serde_json::from_value(entry).map_err(|e| {
                JobdeckError::source_unavailable(SOURCE, format!("malformed job entry: {e}"))
            })
        })
        .collect()
}

/// Source adapter for remoteok.com.
pub struct RemoteOkSource {
    client: HttpClient,
    base_url: String,
}

impl RemoteOkSource {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for RemoteOkSource {
    fn name(&self) -> &str {
        "remote_ok"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, JobdeckError> {
        let url = HttpClient::endpoint(SOURCE, &self.base_url, "/api", &[])?;
        Ok(self.client.probe(url).await)
    }
}

#[async_trait]
impl SourceAdapter for RemoteOkSource {
    fn source(&self) -> Source {
        SOURCE
    }

    async fn fetch(&self, query: &ScrapeQuery) -> Result<CandidateStream, JobdeckError> {
        let url = HttpClient::endpoint(SOURCE, &self.base_url, "/api", &[])?;
        let now = Utc::now();
        let filter = ListingFilter::new(query, now);
        let client = self.client.clone();

        let page = stream::once(async move {
            let entries: Vec<serde_json::Value> = client.get_json(SOURCE, url).await?;
            let jobs = decode_feed(entries)?;
            Ok::<Vec<Listing>, JobdeckError>(
                jobs.into_iter().map(|job| job.into_listing(now)).collect(),
            )
        });
        Ok(candidate_stream(page, filter))
    }
}
