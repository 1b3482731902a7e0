// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared HTTP client for the job board adapters.
//!
//! Every failure mode (transport, non-2xx status, undecodable body) maps to
//! [`JobdeckError::SourceUnavailable`] for the board being fetched.

use std::time::Duration;

use jobdeck_config::model::HttpConfig;
use jobdeck_core::{HealthStatus, JobdeckError, Source};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Longest response body excerpt kept in an error message.
const BODY_EXCERPT_LEN: usize = 200;

/// Pooled HTTP client carrying the configured user agent and timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, JobdeckError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JobdeckError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Build `{base_url}{path}` with the given query pairs.
    pub fn endpoint(
        board: Source,
        base_url: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Url, JobdeckError> {
        let raw = format!("{}{path}", base_url.trim_end_matches('/'));
        let mut url = Url::parse(&raw)
            .map_err(|e| JobdeckError::source_unavailable(board, format!("bad url {raw}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        board: Source,
        url: Url,
    ) -> Result<T, JobdeckError> {
        debug!(source = %board, %url, "fetching");
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| JobdeckError::source_unavailable(board, format!("request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            JobdeckError::source_unavailable(board, format!("failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(JobdeckError::source_unavailable(
                board,
                format!("board returned {status}: {}", excerpt(&body)),
            ));
        }
        if body.trim().is_empty() {
            return Err(JobdeckError::source_unavailable(board, "empty response body"));
        }

        serde_json::from_str(&body).map_err(|e| {
            JobdeckError::source_unavailable(board, format!("failed to parse response: {e}"))
        })
    }

    /// Probe `url` and classify the board's reachability.
    pub async fn probe(&self, url: Url) -> HealthStatus {
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => HealthStatus::Healthy,
            Ok(response) => HealthStatus::Degraded(format!("returned {}", response.status())),
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(&HttpConfig {
            user_agent: "jobdeck-test".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoint_encodes_query_and_trims_slash() {
        let url = HttpClient::endpoint(
            Source::Remotive,
            "https://remotive.com/",
            "/api/remote-jobs",
            &[("search", "rust & go".to_string())],
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://remotive.com/api/remote-jobs?search=rust+%26+go");
    }

    #[tokio::test]
    async fn sends_user_agent_and_decodes_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .and(query_param("page", "1"))
            .and(header("user-agent", "jobdeck-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let url = HttpClient::endpoint(Source::Arbeitnow, &server.uri(), "/feed", &[(
            "page",
            "1".to_string(),
        )])
        .unwrap();
        let value: serde_json::Value = client().get_json(Source::Arbeitnow, url).await.unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn non_success_status_is_source_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .mount(&server)
            .await;

        let url = HttpClient::endpoint(Source::RemoteOk, &server.uri(), "/api", &[]).unwrap();
        let err = client()
            .get_json::<serde_json::Value>(Source::RemoteOk, url)
            .await
            .unwrap_err();
        match err {
            JobdeckError::SourceUnavailable { board, message } => {
                assert_eq!(board, Source::RemoteOk);
                assert!(message.contains("503"), "got: {message}");
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbled_and_empty_bodies_are_source_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        for p in ["/garbled", "/empty"] {
            let url = HttpClient::endpoint(Source::TheMuse, &server.uri(), p, &[]).unwrap();
            let err = client()
                .get_json::<serde_json::Value>(Source::TheMuse, url)
                .await
                .unwrap_err();
            assert!(matches!(err, JobdeckError::SourceUnavailable { .. }), "{p}: {err:?}");
        }
    }
}
