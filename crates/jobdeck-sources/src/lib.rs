// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job board source adapters for jobdeck.
//!
//! Each adapter fetches one board's public JSON feed over a shared
//! [`HttpClient`], normalizes entries into candidates, and applies the
//! query's terms, location, age cutoff, and result cap.

pub mod arbeitnow;
pub mod client;
pub mod normalize;
pub mod remote_ok;
pub mod remotive;
pub mod the_muse;

use std::sync::Arc;

use jobdeck_config::model::JobdeckConfig;
use jobdeck_core::{JobdeckError, Source, SourceAdapter};
use tracing::debug;

pub use arbeitnow::ArbeitnowSource;
pub use client::HttpClient;
pub use remote_ok::RemoteOkSource;
pub use remotive::RemotiveSource;
pub use the_muse::TheMuseSource;

/// Build one adapter for `source` against `base_url`.
pub fn adapter_for(source: Source, client: HttpClient, base_url: &str) -> Arc<dyn SourceAdapter> {
    match source {
        Source::Remotive => Arc::new(RemotiveSource::new(client, base_url)),
        Source::Arbeitnow => Arc::new(ArbeitnowSource::new(client, base_url)),
        Source::RemoteOk => Arc::new(RemoteOkSource::new(client, base_url)),
        Source::TheMuse => Arc::new(TheMuseSource::new(client, base_url)),
    }
}

/// Build adapters for every enabled board, sharing one HTTP client.
pub fn build_adapters(config: &JobdeckConfig) -> Result<Vec<Arc<dyn SourceAdapter>>, JobdeckError> {
    let client = HttpClient::new(&config.http)?;
    let adapters: Vec<Arc<dyn SourceAdapter>> = config
        .sources
        .enabled()
        .map(|(source, settings)| adapter_for(source, client.clone(), &settings.base_url))
        .collect();
    debug!(count = adapters.len(), "source adapters built");
    Ok(adapters)
}
