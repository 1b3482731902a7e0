// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atomic merge of a fresh candidate set into the postings table.

use std::str::FromStr;

use jobdeck_core::reconcile::{ExistingRecord, plan};
use jobdeck_core::types::is_touched;
use jobdeck_core::{Candidate, DedupKey, JobdeckError, PostingStatus, ReconcileSummary};
use rusqlite::params;
use rusqlite::types::Type;
use tracing::debug;

use crate::database::{Database, map_tr_err};
use crate::models::insert_posting;

fn load_existing(tx: &rusqlite::Transaction<'_>) -> rusqlite::Result<Vec<ExistingRecord>> {
    let mut stmt = tx.prepare("SELECT id, dedup_key, status, checked, notes FROM postings")?;
    let rows = stmt.query_map([], |row| {
        let status: String = row.get(2)?;
        let status = PostingStatus::from_str(&status).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
        })?;
        let checked: bool = row.get(3)?;
        let notes: Option<String> = row.get(4)?;
        Ok(ExistingRecord {
            id: row.get(0)?,
            dedup_key: DedupKey::from_stored(row.get(1)?),
            touched: is_touched(status, checked, notes.as_deref()),
        })
    })?;
    rows.collect()
}

/// Replace every untouched posting with `fresh`, preserving touched ones.
///
/// The touched/untouched partition is read inside the same write
/// transaction that applies the deletes and inserts, so a user update
/// either lands before the partition is taken or after the commit. On any
/// error the transaction rolls back and the table is unchanged.
pub async fn reconcile(db: &Database, fresh: Vec<Candidate>) -> Result<ReconcileSummary, JobdeckError> {
    let summary = db
        .writer()
        .call(move |conn| -> Result<ReconcileSummary, rusqlite::Error> {
            let tx = conn.transaction()?;
            let existing = load_existing(&tx)?;
            let plan = plan(&existing, fresh);

            {
                let mut delete = tx.prepare("DELETE FROM postings WHERE id = ?1")?;
                for id in &plan.delete_ids {
                    delete.execute(params![id])?;
                }
            }
            for posting in &plan.inserts {
                insert_posting(&tx, posting)?;
            }

            tx.commit()?;
            Ok(plan.summary())
        })
        .await
        .map_err(map_tr_err)?;

    debug!(
        deleted = summary.deleted,
        preserved = summary.preserved,
        inserted = summary.inserted,
        skipped = summary.skipped,
        "reconcile committed"
    );
    Ok(summary)
}
