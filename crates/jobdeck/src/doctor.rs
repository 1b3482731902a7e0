// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `jobdeck doctor` command implementation.
//!
//! Probes the store and every enabled source and reports one JSON document.

use jobdeck_config::JobdeckConfig;
use jobdeck_core::HealthStatus;
use jobdeck_pipeline::{JobService, ServiceHealth};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub database_path: String,
    /// True when the store and at least one source are usable.
    pub ok: bool,
    #[serde(flatten)]
    pub health: ServiceHealth,
}

fn usable(status: &HealthStatus) -> bool {
    !matches!(status, HealthStatus::Unhealthy(_))
}

pub async fn run_doctor(config: &JobdeckConfig, service: &JobService) -> DoctorReport {
    let health = service.health().await;
    let ok = usable(&health.store) && health.sources.iter().any(|s| usable(&s.status));
    DoctorReport {
        database_path: config.storage.database_path.clone(),
        ok,
        health,
    }
}
