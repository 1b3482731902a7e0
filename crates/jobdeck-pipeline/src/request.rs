// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scrape requests and their resolution against configured defaults.

use jobdeck_config::model::ScrapeConfig;
use jobdeck_core::{JobdeckError, ScrapeQuery};
use serde::{Deserialize, Serialize};

/// Exclusion keywords as a caller supplies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExcludeKeywords {
    List(Vec<String>),
    /// Comma-separated, e.g. `"senior, lead"`.
    Csv(String),
}

impl ExcludeKeywords {
    /// Trimmed, lower-cased, de-duplicated, empties dropped.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            ExcludeKeywords::List(items) => normalize_keywords(items.iter().map(String::as_str)),
            ExcludeKeywords::Csv(raw) => normalize_keywords(raw.split(',')),
        }
    }
}

impl From<Vec<String>> for ExcludeKeywords {
    fn from(items: Vec<String>) -> Self {
        ExcludeKeywords::List(items)
    }
}

impl From<&str> for ExcludeKeywords {
    fn from(raw: &str) -> Self {
        ExcludeKeywords::Csv(raw.to_string())
    }
}

fn normalize_keywords<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let keyword = item.trim().to_lowercase();
        if !keyword.is_empty() && !out.contains(&keyword) {
            out.push(keyword);
        }
    }
    out
}

/// Parameters of one `RunScrape` call. Unset fields fall back to `[scrape]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub search_terms: Option<String>,
    pub location: Option<String>,
    pub max_results: Option<usize>,
    pub max_age_hours: Option<u32>,
    pub exclude_keywords: Option<ExcludeKeywords>,
}

impl ScrapeRequest {
    /// Merge with `defaults` and validate.
    ///
    /// Rejects a zero result count, a zero age window, and blank search
    /// terms before any adapter is contacted.
    pub fn resolve(&self, defaults: &ScrapeConfig) -> Result<ScrapeQuery, JobdeckError> {
        let search_terms = self
            .search_terms
            .as_deref()
            .unwrap_or(&defaults.search_query)
            .trim()
            .to_string();
        if search_terms.is_empty() {
            return Err(JobdeckError::Validation(
                "search terms must not be empty".to_string(),
            ));
        }

        let max_results = self.max_results.unwrap_or(defaults.max_results);
        if max_results == 0 {
            return Err(JobdeckError::Validation(
                "max_results must be greater than 0".to_string(),
            ));
        }

        let max_age_hours = self.max_age_hours.unwrap_or(defaults.max_age_hours);
        if max_age_hours == 0 {
            return Err(JobdeckError::Validation(
                "max_age_hours must be greater than 0".to_string(),
            ));
        }

        let exclude_keywords = match &self.exclude_keywords {
            Some(keywords) => keywords.normalize(),
            None => normalize_keywords(defaults.exclude_keywords.iter().map(String::as_str)),
        };

        Ok(ScrapeQuery {
            search_terms,
            location: self
                .location
                .as_deref()
                .unwrap_or(&defaults.location)
                .trim()
                .to_string(),
            max_results,
            max_age_hours,
            exclude_keywords,
        })
    }
}
