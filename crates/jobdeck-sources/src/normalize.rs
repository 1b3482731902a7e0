// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board-independent normalization: query matching, age cutoff, result cap,
//! and the parsing helpers the adapters share.

use std::future;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use jobdeck_core::{Candidate, CandidateStream, JobdeckError, ScrapeQuery};
use regex::Regex;

/// Upper bound on pages requested from a paged board in one scrape.
pub const MAX_PAGES: u32 = 10;

/// A decoded board entry, before the query is applied.
#[derive(Debug, Clone)]
pub struct Listing {
    pub candidate: Candidate,
    /// Extra searchable text the board exposes (tags, categories, levels).
    pub keywords: Vec<String>,
}

/// Decides which listings a query lets through.
#[derive(Debug, Clone)]
pub struct ListingFilter {
    terms: Vec<String>,
    location: String,
    cutoff: DateTime<Utc>,
    max_results: usize,
}

impl ListingFilter {
    pub fn new(query: &ScrapeQuery, now: DateTime<Utc>) -> Self {
        Self {
            terms: query
                .search_terms
                .split_whitespace()
                .map(str::to_lowercase)
                .collect(),
            location: query.location.trim().to_lowercase(),
            cutoff: now
                .checked_sub_signed(Duration::hours(i64::from(query.max_age_hours)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            max_results: query.max_results,
        }
    }

    /// Skip term matching for boards that already searched server-side.
    pub fn searched_upstream(mut self) -> Self {
        self.terms.clear();
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Every search term must appear in the title, company, or keywords.
    pub fn matches_terms(&self, listing: &Listing) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let mut haystack = format!(
            "{} {}",
            listing.candidate.title.to_lowercase(),
            listing.candidate.company.to_lowercase()
        );
        for keyword in &listing.keywords {
            haystack.push(' ');
            haystack.push_str(&keyword.to_lowercase());
        }
        self.terms.iter().all(|term| haystack.contains(term.as_str()))
    }

    /// Soft location match: unknown and remote locations always pass.
    pub fn matches_location(&self, candidate: &Candidate) -> bool {
        if self.location.is_empty() || candidate.is_remote {
            return true;
        }
        let location = candidate.location.trim().to_lowercase();
        location.is_empty() || location.contains(&self.location)
    }

    /// Postings without a timestamp are kept.
    pub fn is_fresh(&self, candidate: &Candidate) -> bool {
        candidate.posted_at.is_none_or(|posted| posted >= self.cutoff)
    }

    /// Apply the whole query to one listing.
    pub fn accept(&self, listing: Listing) -> Option<Candidate> {
        let keep = self.is_fresh(&listing.candidate)
            && self.matches_location(&listing.candidate)
            && self.matches_terms(&listing);
        keep.then_some(listing.candidate)
    }
}

/// Turn a lazy sequence of listing pages into a capped candidate stream.
///
/// Pages are pulled only while fewer than `max_results` candidates have
/// been accepted, so a satisfied query never requests the next page.
pub fn candidate_stream<S>(pages: S, filter: ListingFilter) -> CandidateStream
where
    S: Stream<Item = Result<Vec<Listing>, JobdeckError>> + Send + 'static,
{
    let max = filter.max_results();
    Box::pin(
        pages
            .map_ok(|page| stream::iter(page.into_iter().map(Ok::<_, JobdeckError>)))
            .try_flatten()
            .try_filter_map(move |listing| future::ready(Ok(filter.accept(listing))))
            .take(max),
    )
}

/// Parse an RFC 3339 timestamp, or a naive ISO 8601 one taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Unix seconds to UTC; zero and out-of-range values are treated as unknown.
pub fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    Utc.timestamp_opt(secs, 0).single()
}

/// A figure with an optional `k`, optionally followed by a second one.
static SALARY_FIGURES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(k\b)?(?:\s*(?:-|–|to)\s*\$?\s*(\d[\d,]*(?:\.\d+)?)\s*(k\b)?)?",
    )
    .unwrap()
});

fn figure(digits: &str, thousands: bool) -> Option<f64> {
    let value: f64 = digits.replace(',', "").parse().ok()?;
    Some(if thousands { value * 1_000.0 } else { value })
}

/// Extract a salary range from free text such as `"$90k - $120k"`.
///
/// Returns `(min, max)`; a single figure fills both. A `k` on the upper
/// bound of a range also scales a bare lower bound (`"$90-120k"`).
pub fn parse_salary_range(text: &str) -> (Option<f64>, Option<f64>) {
    for caps in SALARY_FIGURES.captures_iter(text) {
        let low_k = caps.get(2).is_some();
        let high_k = caps.get(4).is_some();
        let high = caps.get(3).and_then(|m| figure(m.as_str(), high_k));
        let mut low = caps.get(1).and_then(|m| figure(m.as_str(), low_k));
        if high_k && !low_k {
            low = low.map(|v| if v < 1_000.0 { v * 1_000.0 } else { v });
        }

        // Stray small numbers ("2 days", "4 rounds") are not salaries.
        let figures: Vec<f64> = [low, high]
            .into_iter()
            .flatten()
            .filter(|v| *v >= 1_000.0)
            .collect();
        match figures.as_slice() {
            [] => continue,
            [single] => return (Some(*single), Some(*single)),
            [a, b, ..] => return (Some(a.min(*b)), Some(a.max(*b))),
        }
    }
    (None, None)
}

/// Empty-string and whitespace-only text become `None`.
pub fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobdeck_core::Source;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).unwrap()
    }

    fn query(terms: &str, location: &str, max: usize) -> ScrapeQuery {
        ScrapeQuery {
            search_terms: terms.to_string(),
            location: location.to_string(),
            max_results: max,
            max_age_hours: 24,
            exclude_keywords: Vec::new(),
        }
    }

    fn listing(title: &str, hours_ago: Option<i64>, location: &str, remote: bool) -> Listing {
        Listing {
            candidate: Candidate {
                source: Source::Arbeitnow,
                native_id: Some(title.to_lowercase().replace(' ', "-")),
                title: title.to_string(),
                company: "Acme".to_string(),
                location: location.to_string(),
                salary_min: None,
                salary_max: None,
                salary_source: None,
                job_type: None,
                is_remote: remote,
                url: "https://example.com".to_string(),
                posted_at: hours_ago.map(|h| now() - Duration::hours(h)),
                fetched_at: now(),
            },
            keywords: vec!["Backend".to_string()],
        }
    }

    #[test]
    fn terms_match_title_company_or_keywords() {
        let filter = ListingFilter::new(&query("rust backend", "", 10), now());
        assert!(filter.matches_terms(&listing("Rust Developer", None, "", true)));
        assert!(!filter.matches_terms(&listing("Go Developer", None, "", true)));
    }

    #[test]
    fn old_postings_are_dropped_undated_kept() {
        let filter = ListingFilter::new(&query("", "", 10), now());
        assert!(filter.accept(listing("A", Some(23), "", true)).is_some());
        assert!(filter.accept(listing("B", Some(25), "", true)).is_none());
        assert!(filter.accept(listing("C", None, "", true)).is_some());
    }

    #[test]
    fn widest_age_window_does_not_overflow() {
        let mut wide = query("", "", 10);
        wide.max_age_hours = u32::MAX;
        let filter = ListingFilter::new(&wide, now());
        assert!(filter.accept(listing("Ancient", Some(24 * 365 * 30), "", true)).is_some());

        let filter = ListingFilter::new(&wide, DateTime::<Utc>::MIN_UTC + Duration::hours(1));
        let mut earliest = listing("Earliest", None, "", true).candidate;
        earliest.posted_at = Some(DateTime::<Utc>::MIN_UTC);
        assert!(filter.is_fresh(&earliest));
    }

    #[test]
    fn location_is_a_soft_filter() {
        let filter = ListingFilter::new(&query("", "USA", 10), now());
        assert!(filter.matches_location(&listing("A", None, "Austin, USA", false).candidate));
        assert!(filter.matches_location(&listing("B", None, "Berlin", true).candidate));
        assert!(filter.matches_location(&listing("C", None, "", false).candidate));
        assert!(!filter.matches_location(&listing("D", None, "Berlin", false).candidate));
    }

    #[tokio::test]
    async fn stream_stops_pulling_pages_at_max_results() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let pages = stream::iter(0..5).then(move |page| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, JobdeckError>(vec![
                    listing(&format!("Job {page}a"), None, "", true),
                    listing(&format!("Job {page}b"), None, "", true),
                ])
            }
        });

        let filter = ListingFilter::new(&query("", "", 3), now());
        let got: Vec<Candidate> = candidate_stream(pages, filter).try_collect().await.unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn page_error_surfaces_in_stream() {
        let pages = stream::iter(vec![
            Ok(vec![listing("Job", None, "", true)]),
            Err(JobdeckError::source_unavailable(Source::Arbeitnow, "boom")),
        ]);
        let filter = ListingFilter::new(&query("", "", 10), now());
        let result: Result<Vec<Candidate>, _> = candidate_stream(pages, filter).try_collect().await;
        assert!(matches!(result, Err(JobdeckError::SourceUnavailable { .. })));
    }

    #[test]
    fn timestamps_parse_with_and_without_offset() {
        let expected = Utc.with_ymd_and_hms(2026, 6, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-06-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-06-01T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-06-01T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(from_unix(0), None);
        assert_eq!(from_unix(expected.timestamp()), Some(expected));
    }

    #[test]
    fn salary_ranges_from_free_text() {
        assert_eq!(parse_salary_range("$90k - $120k"), (Some(90_000.0), Some(120_000.0)));
        assert_eq!(parse_salary_range("$90-120k"), (Some(90_000.0), Some(120_000.0)));
        assert_eq!(parse_salary_range("90 - 120K USD"), (Some(90_000.0), Some(120_000.0)));
        assert_eq!(parse_salary_range("$80,000 to $100,000"), (Some(80_000.0), Some(100_000.0)));
        assert_eq!(parse_salary_range("2-3 days onsite, $95k"), (Some(95_000.0), Some(95_000.0)));
        assert_eq!(parse_salary_range("USD 100,000"), (Some(100_000.0), Some(100_000.0)));
        assert_eq!(parse_salary_range("Competitive, 4 day week"), (None, None));
        assert_eq!(parse_salary_range(""), (None, None));
    }
}
