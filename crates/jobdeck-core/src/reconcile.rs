// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation of a fresh candidate set against stored postings.
//!
//! Planning is pure: it partitions the existing records into touched and
//! untouched, marks every untouched record for deletion, and lets through
//! only those candidates no touched record already covers. Store backends
//! apply the resulting [`ReconcilePlan`] inside a single write transaction,
//! computing the partition inside that same transaction.

use std::collections::HashSet;

use crate::identity::DedupKey;
use crate::types::{Candidate, Posting, ReconcileSummary};

/// The slice of a stored posting the planner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingRecord {
    pub id: String,
    pub dedup_key: DedupKey,
    pub touched: bool,
}

impl From<&Posting> for ExistingRecord {
    fn from(posting: &Posting) -> Self {
        Self {
            id: posting.id.clone(),
            dedup_key: posting.dedup_key(),
            touched: posting.is_touched(),
        }
    }
}

/// Mutations a store must apply, in order: deletes first, then inserts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    pub delete_ids: Vec<String>,
    pub inserts: Vec<Posting>,
    pub preserved: usize,
    pub skipped: usize,
}

impl ReconcilePlan {
    pub fn summary(&self) -> ReconcileSummary {
        ReconcileSummary {
            deleted: self.delete_ids.len(),
            preserved: self.preserved,
            inserted: self.inserts.len(),
            skipped: self.skipped,
        }
    }
}

/// Build the plan for merging `fresh` into a store holding `existing`.
///
/// A candidate is skipped when a touched record shares its identity key or
/// its dedup key, or when an earlier candidate in `fresh` already claimed
/// the same identity key.
pub fn plan(existing: &[ExistingRecord], fresh: Vec<Candidate>) -> ReconcilePlan {
    let mut touched_ids = HashSet::new();
    let mut touched_dedup = HashSet::new();
    let mut delete_ids = Vec::new();

    for record in existing {
        if record.touched {
            touched_ids.insert(record.id.as_str());
            touched_dedup.insert(&record.dedup_key);
        } else {
            delete_ids.push(record.id.clone());
        }
    }

    let preserved = touched_ids.len();
    let mut claimed = HashSet::new();
    let mut inserts = Vec::with_capacity(fresh.len());
    let mut skipped = 0;

    for candidate in fresh {
        let key = candidate.identity_key();
        if touched_ids.contains(key.as_str()) || touched_dedup.contains(&candidate.dedup_key()) {
            skipped += 1;
            continue;
        }
        if !claimed.insert(key) {
            skipped += 1;
            continue;
        }
        inserts.push(candidate.into_posting());
    }

    ReconcilePlan {
        delete_ids,
        inserts,
        preserved,
        skipped,
    }
}
