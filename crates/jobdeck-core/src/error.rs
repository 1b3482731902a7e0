// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for jobdeck.

use thiserror::Error;

use crate::types::{Source, SourceReport};

/// The primary error type used across all jobdeck crates.
#[derive(Debug, Error)]
pub enum JobdeckError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A single job board could not be fetched or parsed.
    ///
    /// Recoverable: the aggregator records it in the per-source report and
    /// carries on with the remaining boards.
    #[error("source {board} unavailable: {message}")]
    SourceUnavailable { board: Source, message: String },

    /// Every configured board failed during one scrape. No store mutation happened.
    #[error("all {} sources failed", .failures.len())]
    AllSourcesFailed { failures: Vec<SourceReport> },

    /// A posting with this id already exists.
    #[error("duplicate posting id: {0}")]
    DuplicateId(String),

    /// No posting with this id exists.
    #[error("posting not found: {0}")]
    NotFound(String),

    /// Malformed request parameters, rejected before any work is done.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The caller cancelled the operation before it committed.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl JobdeckError {
    /// Shorthand for a [`JobdeckError::SourceUnavailable`].
    pub fn source_unavailable(board: Source, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            board,
            message: message.into(),
        }
    }
}
