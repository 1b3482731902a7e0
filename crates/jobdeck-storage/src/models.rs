// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between the `postings` table and [`Posting`].
//!
//! Timestamps are stored as RFC 3339 text with millisecond precision and a
//! `Z` suffix so that lexical order matches chronological order.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

pub use jobdeck_core::types::{Posting, PostingStatus, Source};

/// Column list shared by every posting SELECT, in [`row_to_posting`] order.
pub const POSTING_COLUMNS: &str = "id, source, title, company, location, job_type, \
     salary_min, salary_max, salary_source, is_remote, url, posted_at, fetched_at, \
     status, checked, applied_at, notes";

pub fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn opt_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<String>>(idx)?
        .map(|raw| parse_ts(idx, &raw))
        .transpose()
}

/// Map a row selected with [`POSTING_COLUMNS`] into a [`Posting`].
pub fn row_to_posting(row: &Row<'_>) -> rusqlite::Result<Posting> {
    let source: String = row.get(1)?;
    let status: String = row.get(13)?;
    let fetched_at: String = row.get(12)?;

    Ok(Posting {
        id: row.get(0)?,
        source: Source::from_str(&source).map_err(|e| conversion_error(1, e))?,
        title: row.get(2)?,
        company: row.get(3)?,
        location: row.get(4)?,
        job_type: row.get(5)?,
        salary_min: row.get(6)?,
        salary_max: row.get(7)?,
        salary_source: row.get(8)?,
        is_remote: row.get(9)?,
        url: row.get(10)?,
        posted_at: opt_ts(row, 11)?,
        fetched_at: parse_ts(12, &fetched_at)?,
        status: PostingStatus::from_str(&status).map_err(|e| conversion_error(13, e))?,
        checked: row.get(14)?,
        applied_at: opt_ts(row, 15)?,
        notes: row.get(16)?,
    })
}

/// Insert one posting using an open connection or transaction.
///
/// Returns the number of rows written: 0 if the id already exists.
pub fn insert_posting(conn: &rusqlite::Connection, posting: &Posting) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO postings (id, source, title, company, location, job_type,
             salary_min, salary_max, salary_source, is_remote, url, posted_at, fetched_at,
             dedup_key, status, checked, applied_at, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
         ON CONFLICT(id) DO NOTHING",
        rusqlite::params![
            posting.id,
            posting.source.to_string(),
            posting.title,
            posting.company,
            posting.location,
            posting.job_type,
            posting.salary_min,
            posting.salary_max,
            posting.salary_source,
            posting.is_remote,
            posting.url,
            posting.posted_at.as_ref().map(format_ts),
            format_ts(&posting.fetched_at),
            posting.dedup_key().as_str(),
            posting.status.to_string(),
            posting.checked,
            posting.applied_at.as_ref().map(format_ts),
            posting.notes,
        ],
    )
}
