// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Muse adapter (`GET /api/public/jobs?page=N`).

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
use crate::normalize::{Listing, ListingFilter, MAX_PAGES, candidate_stream, parse_timestamp};

const SOURCE: Source = Source::TheMuse;
const FEED_PATH: &str = "/api/public/jobs";

#[derive(Debug, Deserialize)]
struct MusePage {
    #[serde(default)]
    page_count: u32,
    results: Vec<MuseJob>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MuseRefs {
    landing_page: String,
}

#[derive(Debug, Deserialize)]
struct MuseJob {
    id: u64,
    name: String,
    company: Named,
    #[serde(default)]
    locations: Vec<Named>,
    #[serde(default)]
    levels: Vec<Named>,
    #[serde(default)]
    categories: Vec<Named>,
    #[serde(default)]
    publication_date: Option<String>,
    refs: MuseRefs,
}

impl MuseJob {
    fn into_listing(self, fetched_at: DateTime<Utc>) -> Listing {
        let locations: Vec<String> = self.locations.into_iter().map(|l| l.name).collect();
        let is_remote = locations
            .iter()
            .any(|l| l.to_lowercase().contains("remote"));
        let keywords = self
            .levels
            .into_iter()
            .chain(self.categories)
            .map(|n| n.name)
            .collect();
        Listing {
            candidate: Candidate {
                source: SOURCE,
                native_id: Some(self.id.to_string()),
                title: self.name.trim().to_string(),
                company: self.company.name.trim().to_string(),
                location: locations.join("; "),
                salary_min: None,
                salary_max: None,
                salary_source: None,
                job_type: None,
                is_remote,
                url: self.refs.landing_page,
                posted_at: self.publication_date.as_deref().and_then(parse_timestamp),
                fetched_at,
            },
            keywords,
        }
    }
}

/// Source adapter for themuse.com.
pub struct TheMuseSource {
    client: HttpClient,
    base_url: String,
}

impl TheMuseSource {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for TheMuseSource {
    fn name(&self) -> &str {
        "the_muse"
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
            "0".to_string(),
        )])?;
        Ok(self.client.probe(url).await)
    }
}

#[async_trait]
impl SourceAdapter for TheMuseSource {
    fn source(&self) -> Source {
        SOURCE
    }

    async fn fetch(&self, query: &ScrapeQuery) -> Result<CandidateStream, JobdeckError> {
        let now = Utc::now();
        let filter = ListingFilter::new(query, now);
        let client = self.client.clone();
        let base_url = self.base_url.clone();

        let pages = stream::try_unfold(Some(0u32), move |page| {
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
                let body: MusePage = client.get_json(SOURCE, url).await?;
                debug!(source = %SOURCE, page, page_count = body.page_count, "page fetched");

                let next = page + 1;
                let more = next < body.page_count && next < MAX_PAGES && !body.results.is_empty();
                let listings: Vec<Listing> =
                    body.results.into_iter().map(|job| job.into_listing(now)).collect();
                Ok::<_, JobdeckError>(Some((listings, more.then_some(next))))
            }
        });
        Ok(candidate_stream(pages, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use jobdeck_config::model::HttpConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn job(id: u64, name: &str, location: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "type": "external",
            "publication_date": (Utc::now() - chrono::Duration::hours(6)).to_rfc3339(),
            "company": {"id": 11, "name": "Muse Co"},
            "locations": [{"name": location}],
            "levels": [{"name": "Mid Level", "short_name": "mid"}],
            "categories": [{"name": "Software Engineering"}],
            "refs": {"landing_page": format!("https://www.themuse.com/jobs/museco/{id}")}
        })
    }

    #[tokio::test]
    async fn walks_pages_and_applies_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FEED_PATH))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 0,
                "page_count": 2,
                "results": [
                    job(1, "Software Engineer", "New York, NY"),
                    job(2, "Software Engineer II", "London, United Kingdom")
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FEED_PATH))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 1,
                "page_count": 2,
                "results": [job(3, "Staff Software Engineer", "Flexible / Remote")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = ScrapeQuery {
            search_terms: "software engineer".to_string(),
            location: "NY".to_string(),
            max_results: 50,
            max_age_hours: 72,
            exclude_keywords: Vec::new(),
        };
        let adapter =
            TheMuseSource::new(HttpClient::new(&HttpConfig::default()).unwrap(), server.uri());
        let candidates: Vec<Candidate> = adapter
            .fetch(&query)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        let ids: Vec<String> = candidates
            .iter()
            .map(|c| c.identity_key().into_string())
            .collect();
        assert_eq!(ids, vec!["the_muse:1", "the_muse:3"]);
        assert!(!candidates[0].is_remote);
        assert!(candidates[1].is_remote);
        assert_eq!(candidates[0].company, "Muse Co");
    }
}
