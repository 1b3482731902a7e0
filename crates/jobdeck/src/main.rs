// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! jobdeck - Job posting ingestion and triage.
//!
//! This is the binary entry point. Every command prints JSON on stdout;
//! logs go to stderr.

mod commands;
mod doctor;
mod shutdown;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use jobdeck_config::JobdeckConfig;
use jobdeck_core::{JobdeckError, PostingStore};
use jobdeck_pipeline::JobService;
use jobdeck_storage::SqliteStore;
use serde::Serialize;
use tracing::error;

use crate::commands::{ListArgs, ScrapeArgs, UpdateArgs};

/// jobdeck - Job posting ingestion and triage.
#[derive(Parser, Debug)]
#[command(name = "jobdeck", version, about, long_about = None)]
struct Cli {
    /// Read this config file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape every enabled board and reconcile the store.
    Scrape(ScrapeArgs),
    /// List stored postings.
    List(ListArgs),
    /// Show one posting.
    Show { id: String },
    /// Change a posting's status, checked flag, or notes.
    Update(UpdateArgs),
    /// Delete one posting.
    Delete { id: String },
    /// Counts by status and source.
    Stats,
    /// Check the store and every enabled source.
    Doctor,
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => jobdeck_config::load_and_validate_path(path),
        None => jobdeck_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            jobdeck_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    match run(cli.command, config).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            if let JobdeckError::AllSourcesFailed { failures } = &e {
                for report in failures {
                    error!(source = %report.source, outcome = ?report.outcome, "source failed");
                }
            }
            eprintln!("jobdeck: {e}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Run one command. `Ok(false)` means it completed but reported a failure.
async fn run(command: Commands, config: JobdeckConfig) -> Result<bool, JobdeckError> {
    if let Commands::Config = command {
        let rendered = toml::to_string_pretty(&config)
            .map_err(|e| JobdeckError::Internal(format!("failed to render config: {e}")))?;
        print!("{rendered}");
        return Ok(true);
    }

    let (service, store) = open_service(&config).await?;
    let outcome = dispatch(command, &config, &service).await;
    store.close().await?;
    outcome
}

async fn dispatch(
    command: Commands,
    config: &JobdeckConfig,
    service: &JobService,
) -> Result<bool, JobdeckError> {
    match command {
        Commands::Scrape(args) => {
            let cancel = shutdown::install_signal_handler();
            let summary = commands::scrape(service, args, &cancel).await;
            cancel.cancel();
            print_json(&summary?)?;
        }
        Commands::List(args) => print_json(&commands::list(service, args).await?)?,
        Commands::Show { id } => print_json(&commands::show(service, &id).await?)?,
        Commands::Update(args) => print_json(&commands::update(service, args).await?)?,
        Commands::Delete { id } => print_json(&commands::delete(service, &id).await?)?,
        Commands::Stats => print_json(&commands::stats(service).await?)?,
        Commands::Doctor => {
            let report = doctor::run_doctor(config, service).await;
            print_json(&report)?;
            return Ok(report.ok);
        }
        Commands::Config => {}
    }
    Ok(true)
}

/// Open the store and build the service over every enabled board.
async fn open_service(
    config: &JobdeckConfig,
) -> Result<(JobService, Arc<SqliteStore>), JobdeckError> {
    let store = Arc::new(SqliteStore::open(config.storage.clone()).await?);
    let adapters = jobdeck_sources::build_adapters(config)?;
    let service = JobService::new(
        Arc::clone(&store) as Arc<dyn PostingStore>,
        adapters,
        config.scrape.clone(),
    );
    Ok((service, store))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), JobdeckError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| JobdeckError::Internal(format!("failed to render output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

fn exit_code(err: &JobdeckError) -> i32 {
    match err {
        JobdeckError::Validation(_) | JobdeckError::Config(_) => 2,
        JobdeckError::NotFound(_) => 3,
        JobdeckError::AllSourcesFailed { .. } => 4,
        JobdeckError::Cancelled => 130,
        _ => 1,
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jobdeck={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use jobdeck_core::{PostingStatus, SortOrder};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_scrape_overrides() {
        let cli = Cli::try_parse_from([
            "jobdeck",
            "scrape",
            "--query",
            "rust developer",
            "--max-results",
            "25",
            "--exclude",
            "senior,lead",
        ])
        .unwrap();
        match cli.command {
            Commands::Scrape(args) => {
                assert_eq!(args.query.as_deref(), Some("rust developer"));
                assert_eq!(args.max_results, Some(25));
                assert_eq!(args.exclude.as_deref(), Some("senior,lead"));
            }
            other => panic!("expected scrape, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_filters() {
        let cli = Cli::try_parse_from([
            "jobdeck", "list", "--status", "applied", "--checked", "false", "--sort", "freshness",
        ])
        .unwrap();
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.status, Some(PostingStatus::Applied));
                assert_eq!(args.checked, Some(false));
                assert_eq!(args.sort, SortOrder::Freshness);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Cli::try_parse_from(["jobdeck", "update", "x", "--status", "ghosted"]).is_err());
    }

    #[test]
    fn exit_codes_distinguish_failures() {
        assert_eq!(exit_code(&JobdeckError::Validation("x".into())), 2);
        assert_eq!(exit_code(&JobdeckError::NotFound("x".into())), 3);
        assert_eq!(exit_code(&JobdeckError::Cancelled), 130);
    }

    #[tokio::test]
    async fn opens_service_against_temp_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = JobdeckConfig::default();
        config.storage.database_path = dir.path().join("jobdeck.db").to_string_lossy().to_string();

        let (service, store) = open_service(&config).await.unwrap();
        assert_eq!(service.get_stats().await.unwrap().total, 0);
        store.close().await.unwrap();
    }
}
