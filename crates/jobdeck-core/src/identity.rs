// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic identity and dedup keys for postings.
//!
//! A posting's identity is `{source}:{native_id}` when the board exposes an
//! id, otherwise `{source}:sha256:{digest}` over its normalized title,
//! company, and location. Both forms are reproducible across runs.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::Source;

/// Field separator for hashed and joined keys (ASCII unit separator).
const FIELD_SEP: char = '\u{1f}';

/// Hex characters of the digest kept in a synthetic key.
const SYNTHETIC_HEX_LEN: usize = 16;

/// Trim, lower-case, and collapse internal whitespace.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Stable identity of a posting; also its store id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Key built from the board's native identifier.
    pub fn native(source: Source, native_id: &str) -> Self {
        Self(format!("{source}:{}", native_id.trim()))
    }

    /// Key built from a hash of the normalized text fields.
    pub fn synthetic(source: Source, title: &str, company: &str, location: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DedupKey::new(title, company, location).as_str().as_bytes());
        let digest = hex::encode(hasher.finalize());
        Self(format!("{source}:sha256:{}", &digest[..SYNTHETIC_HEX_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized (title, company, location) triple.
///
/// Two candidates with the same dedup key describe the same job, whichever
/// board they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(title: &str, company: &str, location: &str) -> Self {
        Self(format!(
            "{}{FIELD_SEP}{}{FIELD_SEP}{}",
            normalize_text(title),
            normalize_text(company),
            normalize_text(location)
        ))
    }

    /// Wrap a key previously produced by [`DedupKey::as_str`].
    pub fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_text("  Senior   Rust\tEngineer "), "senior rust engineer");
    }

    #[test]
    fn native_key_includes_source() {
        let key = IdentityKey::native(Source::Remotive, " 12345 ");
        assert_eq!(key.as_str(), "remotive:12345");
    }

    #[test]
    fn synthetic_key_is_stable_under_formatting_noise() {
        let a = IdentityKey::synthetic(Source::RemoteOk, "Rust Engineer", "Acme", "Berlin");
        let b = IdentityKey::synthetic(Source::RemoteOk, " rust  ENGINEER", "ACME ", "berlin");
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("remote_ok:sha256:"));
        assert_eq!(a.as_str().len(), "remote_ok:sha256:".len() + SYNTHETIC_HEX_LEN);
    }

    #[test]
    fn synthetic_key_differs_by_field() {
        let a = IdentityKey::synthetic(Source::TheMuse, "Engineer", "Acme", "Berlin");
        let b = IdentityKey::synthetic(Source::TheMuse, "Engineer", "Acme", "Paris");
        assert_ne!(a, b);
    }

    proptest::proptest! {
        #[test]
        fn synthetic_key_ignores_case_and_spacing(title in "[a-zA-Z]{1,8}( [a-zA-Z]{1,8}){0,3}") {
            let noisy = format!("  {}  ", title.to_uppercase().replace(' ', "   "));
            proptest::prop_assert_eq!(
                IdentityKey::synthetic(Source::Arbeitnow, &title, "Acme", "Remote"),
                IdentityKey::synthetic(Source::Arbeitnow, &noisy, "acme", " remote")
            );
        }
    }

    #[test]
    fn field_boundaries_are_not_ambiguous() {
        let a = DedupKey::new("ab", "c", "d");
        let b = DedupKey::new("a", "bc", "d");
        assert_ne!(a, b);
    }
}
