// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./jobdeck.toml` > `~/.config/jobdeck/jobdeck.toml` > `/etc/jobdeck/jobdeck.toml`
//! with environment variable overrides via `JOBDECK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::JobdeckConfig;

/// Top-level sections whose keys map with a single dot.
const SECTIONS: &[&str] = &["app", "storage", "http", "scrape"];

/// Board names under `[sources]`; some contain underscores themselves.
const SOURCE_BOARDS: &[&str] = &["remotive", "arbeitnow", "remote_ok", "the_muse"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/jobdeck/jobdeck.toml` (system-wide)
/// 3. `~/.config/jobdeck/jobdeck.toml` (user XDG config)
/// 4. `./jobdeck.toml` (local directory)
/// 5. `JOBDECK_*` environment variables
pub fn load_config() -> Result<JobdeckConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<JobdeckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JobdeckConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<JobdeckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JobdeckConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(JobdeckConfig::default()))
        .merge(Toml::file("/etc/jobdeck/jobdeck.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("jobdeck/jobdeck.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("jobdeck.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `JOBDECK_SCRAPE_MAX_RESULTS` must become `scrape.max_results`,
/// not `scrape.max.results`.
fn env_provider() -> Env {
    Env::prefixed("JOBDECK_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }

    if let Some(rest) = key.strip_prefix("sources_") {
        for board in SOURCE_BOARDS {
            if let Some(field) = rest.strip_prefix(board).and_then(|r| r.strip_prefix('_')) {
                return format!("sources.{board}.{field}");
            }
        }
    }

    key.to_string()
}
