// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for jobdeck.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use jobdeck_core::Source;
use serde::{Deserialize, Serialize};

/// Top-level jobdeck configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JobdeckConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound HTTP settings shared by all source adapters.
    #[serde(default)]
    pub http: HttpConfig,

    /// Defaults applied to scrape requests that omit a field.
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Per-board source settings.
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("jobdeck").join("jobdeck.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("jobdeck.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Outbound HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// User-Agent header sent to every board.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "jobdeck/{} (+https://github.com/jobdeck/jobdeck)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// Scrape defaults.
///
/// These seed every scrape request; fields set on the request win.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Search terms used when a request does not specify any.
    #[serde(default = "default_search_query")]
    pub search_query: String,

    /// Location filter.
    #[serde(default = "default_location")]
    pub location: String,

    /// Maximum number of postings kept after ranking.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Postings older than this many hours are dropped.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u32,

    /// Titles containing any of these (case-insensitive) are excluded.
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,

    /// Time budget for a single source adapter, in seconds.
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            search_query: default_search_query(),
            location: default_location(),
            max_results: default_max_results(),
            max_age_hours: default_max_age_hours(),
            exclude_keywords: default_exclude_keywords(),
            source_timeout_secs: default_source_timeout_secs(),
        }
    }
}

fn default_search_query() -> String {
    "software engineer".to_string()
}

fn default_location() -> String {
    "USA".to_string()
}

fn default_max_results() -> usize {
    100
}

fn default_max_age_hours() -> u32 {
    72
}

fn default_exclude_keywords() -> Vec<String> {
    [
        "senior",
        "sr.",
        "sr",
        "lead",
        "principal",
        "staff",
        "manager",
        "architect",
        "head",
        "director",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_source_timeout_secs() -> u64 {
    30
}

/// Settings for every supported board.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    #[serde(default = "default_remotive")]
    pub remotive: SourceSettings,

    #[serde(default = "default_arbeitnow")]
    pub arbeitnow: SourceSettings,

    #[serde(default = "default_remote_ok")]
    pub remote_ok: SourceSettings,

    #[serde(default = "default_the_muse")]
    pub the_muse: SourceSettings,
}

impl SourcesConfig {
    /// Settings for one board.
    pub fn get(&self, source: Source) -> &SourceSettings {
        match source {
            Source::Remotive => &self.remotive,
            Source::Arbeitnow => &self.arbeitnow,
            Source::RemoteOk => &self.remote_ok,
            Source::TheMuse => &self.the_muse,
        }
    }

    /// Boards that are switched on, in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = (Source, &SourceSettings)> {
        Source::ALL
            .into_iter()
            .map(|s| (s, self.get(s)))
            .filter(|(_, settings)| settings.enabled)
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            remotive: default_remotive(),
            arbeitnow: default_arbeitnow(),
            remote_ok: default_remote_ok(),
            the_muse: default_the_muse(),
        }
    }
}

/// Settings for a single board.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSettings {
    /// Whether the board takes part in scrapes.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Scheme and host of the board's API, without a trailing slash.
    pub base_url: String,
}

fn default_enabled() -> bool {
    true
}

fn source_settings(base_url: &str) -> SourceSettings {
    SourceSettings {
        enabled: true,
        base_url: base_url.to_string(),
    }
}

fn default_remotive() -> SourceSettings {
    source_settings("https://remotive.com")
}

fn default_arbeitnow() -> SourceSettings {
    source_settings("https://www.arbeitnow.com")
}

fn default_remote_ok() -> SourceSettings {
    source_settings("https://remoteok.com")
}

fn default_the_muse() -> SourceSettings {
    source_settings("https://www.themuse.com")
}
