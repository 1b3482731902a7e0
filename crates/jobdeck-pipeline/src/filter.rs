// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Title exclusion filter.

use jobdeck_core::Candidate;

/// True if `title` contains any of `keywords` (case-insensitive substring).
pub fn is_excluded(title: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let title = title.to_lowercase();
    keywords
        .iter()
        .any(|keyword| title.contains(keyword.to_lowercase().as_str()))
}

/// Keep the candidates whose title matches none of `keywords`, in order.
pub fn apply_exclusions(candidates: Vec<Candidate>, keywords: &[String]) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| !is_excluded(&c.title, keywords))
        .collect()
}
