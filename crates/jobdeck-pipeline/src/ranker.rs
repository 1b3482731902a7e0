// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Freshness ranking.

use jobdeck_core::Candidate;

/// Sort by `posted_at` descending and keep the first `limit`.
///
/// The sort is stable, so equal timestamps keep their input order.
/// Undated candidates rank after every dated one.
pub fn rank(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    // `None < Some(_)`, so comparing b against a puts undated entries last.
    candidates.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use jobdeck_core::Source;

    fn candidate(name: &str, hours_ago: Option<i64>) -> Candidate {
        let base = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        Candidate {
            source: Source::TheMuse,
            native_id: Some(name.to_string()),
            title: name.to_string(),
            company: String::new(),
            location: String::new(),
            salary_min: None,
            salary_max: None,
            salary_source: None,
            job_type: None,
            is_remote: false,
            url: String::new(),
            posted_at: hours_ago.map(|h| base - Duration::hours(h)),
            fetched_at: base,
        }
    }

    fn titles(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn newest_first_with_undated_last() {
        let ranked = rank(
            vec![
                candidate("undated", None),
                candidate("old", Some(30)),
                candidate("new", Some(1)),
            ],
            10,
        );
        assert_eq!(titles(&ranked), vec!["new", "old", "undated"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank(
            vec![
                candidate("first", Some(5)),
                candidate("second", Some(5)),
                candidate("third", Some(5)),
            ],
            10,
        );
        assert_eq!(titles(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn truncates_after_sorting() {
        let ranked = rank(
            vec![
                candidate("c", Some(3)),
                candidate("a", Some(1)),
                candidate("b", Some(2)),
            ],
            2,
        );
        assert_eq!(titles(&ranked), vec!["a", "b"]);
    }
}
