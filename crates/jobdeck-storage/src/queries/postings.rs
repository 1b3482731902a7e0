// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Posting CRUD, list, and stats queries.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::Utc;
use jobdeck_core::types::{ListQuery, PostingStats, PostingUpdate, SortOrder};
use jobdeck_core::{JobdeckError, Posting, PostingStatus, Source};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::{POSTING_COLUMNS, format_ts, insert_posting as insert_row, row_to_posting};

/// Insert a new posting. Fails with `DuplicateId` if the id is taken.
pub async fn insert_posting(db: &Database, posting: &Posting) -> Result<(), JobdeckError> {
    let posting = posting.clone();
    let id = posting.id.clone();
    let written = db
        .writer()
        .call(move |conn| insert_row(conn, &posting))
        .await
        .map_err(map_tr_err)?;
    if written == 0 {
        return Err(JobdeckError::DuplicateId(id));
    }
    Ok(())
}

/// Get a posting by id.
pub async fn get_posting(db: &Database, id: &str) -> Result<Option<Posting>, JobdeckError> {
    let id = id.to_string();
    db.reader()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {POSTING_COLUMNS} FROM postings WHERE id = ?1"),
                params![id],
                row_to_posting,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update to a posting's tracking fields.
///
/// The status write and the `applied_at` stamp happen in the same
/// transaction. Entering `Applied` stamps the current time, staying in
/// `Applied` keeps the existing stamp, and any other status clears it.
pub async fn update_posting(
    db: &Database,
    id: &str,
    update: &PostingUpdate,
) -> Result<Posting, JobdeckError> {
    if update.is_empty() {
        return Err(JobdeckError::Validation("no updates provided".to_string()));
    }

    let owned_id = id.to_string();
    let update = update.clone();
    let updated = db
        .writer()
        .call(move |conn| -> Result<Option<Posting>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let current = tx
                .query_row(
                    &format!("SELECT {POSTING_COLUMNS} FROM postings WHERE id = ?1"),
                    params![owned_id],
                    row_to_posting,
                )
                .optional()?;
            let Some(mut posting) = current else {
                return Ok(None);
            };

            if let Some(status) = update.status {
                posting.applied_at = match status {
                    PostingStatus::Applied if posting.status == PostingStatus::Applied => {
                        posting.applied_at.or_else(|| Some(Utc::now()))
                    }
                    PostingStatus::Applied => Some(Utc::now()),
                    _ => None,
                };
                posting.status = status;
            }
            if let Some(checked) = update.checked {
                posting.checked = checked;
            }
            if let Some(notes) = update.notes {
                let trimmed = notes.trim();
                posting.notes = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }

            tx.execute(
                "UPDATE postings SET status = ?1, checked = ?2, notes = ?3, applied_at = ?4
                 WHERE id = ?5",
                params![
                    posting.status.to_string(),
                    posting.checked,
                    posting.notes,
                    posting.applied_at.as_ref().map(format_ts),
                    posting.id,
                ],
            )?;
            tx.commit()?;
            Ok(Some(posting))
        })
        .await
        .map_err(map_tr_err)?;

    updated.ok_or_else(|| JobdeckError::NotFound(id.to_string()))
}

/// Delete a posting. Fails with `NotFound` if absent.
pub async fn delete_posting(db: &Database, id: &str) -> Result<(), JobdeckError> {
    let owned_id = id.to_string();
    let deleted = db
        .writer()
        .call(move |conn| conn.execute("DELETE FROM postings WHERE id = ?1", params![owned_id]))
        .await
        .map_err(map_tr_err)?;
    if deleted == 0 {
        return Err(JobdeckError::NotFound(id.to_string()));
    }
    Ok(())
}

fn order_clause(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Inserted => "seq ASC",
        SortOrder::Freshness => "posted_at IS NULL, posted_at DESC, fetched_at DESC, seq ASC",
    }
}

/// List postings matching the query.
///
/// Status and checked filters run in SQL. The search text is matched in
/// Rust with Unicode-aware lower-casing, which SQLite's `LIKE` lacks.
pub async fn list_postings(db: &Database, query: &ListQuery) -> Result<Vec<Posting>, JobdeckError> {
    let status = query.status.map(|s| s.to_string());
    let checked = query.checked;
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let sql = format!(
        "SELECT {POSTING_COLUMNS} FROM postings
         WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR checked = ?2)
         ORDER BY {}",
        order_clause(query.sort)
    );

    let postings = db
        .reader()
        .call(move |conn| -> Result<Vec<Posting>, rusqlite::Error> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![status, checked], row_to_posting)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)?;

    Ok(match needle {
        Some(needle) => postings
            .into_iter()
            .filter(|p| matches_search(p, &needle))
            .collect(),
        None => postings,
    })
}

fn matches_search(posting: &Posting, needle: &str) -> bool {
    [&posting.title, &posting.company, &posting.location]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Counts per status (zero-filled), per source, and by checked flag.
///
/// Every count comes from one grouped statement, so all of them describe
/// the same snapshot.
pub async fn posting_stats(db: &Database) -> Result<PostingStats, JobdeckError> {
    let groups = db
        .reader()
        .call(|conn| -> Result<Vec<(String, String, u64, u64)>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT status, source, COUNT(*), COALESCE(SUM(checked), 0)
                 FROM postings GROUP BY status, source",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;

    let mut by_status: BTreeMap<PostingStatus, u64> =
        PostingStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_source = BTreeMap::new();
    let mut total = 0;
    let mut checked = 0;
    for (raw_status, raw_source, count, checked_count) in groups {
        let status = PostingStatus::from_str(&raw_status)
            .map_err(|_| JobdeckError::Internal(format!("unknown status in store: {raw_status}")))?;
        let source = Source::from_str(&raw_source)
            .map_err(|_| JobdeckError::Internal(format!("unknown source in store: {raw_source}")))?;
        *by_status.entry(status).or_insert(0) += count;
        *by_source.entry(source).or_insert(0) += count;
        total += count;
        checked += checked_count;
    }

    Ok(PostingStats {
        total,
        by_status,
        checked,
        unchecked: total.saturating_sub(checked),
        by_source,
    })
}
