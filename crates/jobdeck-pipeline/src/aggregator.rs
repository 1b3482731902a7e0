// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent fan-out over the source adapters.
//!
//! Every adapter runs as its own tokio task under its own timeout. A failed
//! or timed-out adapter contributes nothing (partial results are
//! discarded) and is recorded in the per-source report. Dropping the
//! aggregation future aborts all outstanding adapter tasks.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{FutureExt, TryStreamExt};
use jobdeck_core::{
    Candidate, DedupKey, JobdeckError, ScrapeQuery, Source, SourceAdapter, SourceOutcome,
    SourceReport,
};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Merged output of one aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Deduplicated candidates, in adapter order.
    pub candidates: Vec<Candidate>,
    /// One report per adapter, in adapter order.
    pub reports: Vec<SourceReport>,
}

/// Runs a query against every configured adapter.
#[derive(Clone)]
pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    source_timeout: Duration,
}

impl Aggregator {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, source_timeout: Duration) -> Self {
        Self {
            adapters,
            source_timeout,
        }
    }

    pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.adapters
    }

    /// Query every adapter concurrently and merge what succeeds.
    ///
    /// Fails with `AllSourcesFailed` only when no adapter succeeds.
    pub async fn collect(&self, query: &ScrapeQuery) -> Result<Aggregation, JobdeckError> {
        if self.adapters.is_empty() {
            return Err(JobdeckError::Config("no source adapters configured".to_string()));
        }

        let mut tasks = JoinSet::new();
        for (index, adapter) in self.adapters.iter().enumerate() {
            let adapter = Arc::clone(adapter);
            let query = query.clone();
            let limit = self.source_timeout;
            tasks.spawn(async move {
                let source = adapter.source();
                let started = Instant::now();
                let outcome = AssertUnwindSafe(run_adapter(adapter, query, limit))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Err(JobdeckError::source_unavailable(source, "adapter panicked"))
                    });
                (index, source, outcome, started.elapsed())
            });
        }

        let mut slots: Vec<Option<(Source, Result<Vec<Candidate>, JobdeckError>, Duration)>> =
            (0..self.adapters.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, source, outcome, elapsed)) => {
                    slots[index] = Some((source, outcome, elapsed));
                }
                Err(e) => warn!(error = %e, "source task did not complete"),
            }
        }

        let mut fetched = Vec::new();
        let mut reports = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            let (source, outcome, elapsed) = match slot {
                Some(slot) => slot,
                None => {
                    let source = self.adapters[index].source();
                    let err = JobdeckError::source_unavailable(source, "task aborted");
                    (source, Err(err), Duration::ZERO)
                }
            };
            let report = match outcome {
                Ok(candidates) => {
                    debug!(source = %source, fetched = candidates.len(), "source succeeded");
                    let report = SourceReport {
                        source,
                        outcome: SourceOutcome::Succeeded {
                            fetched: candidates.len(),
                            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        },
                    };
                    fetched.extend(candidates);
                    report
                }
                Err(e) => {
                    warn!(source = %source, error = %e, "source failed");
                    SourceReport {
                        source,
                        outcome: SourceOutcome::Failed {
                            reason: failure_reason(e),
                        },
                    }
                }
            };
            reports.push(report);
        }

        if !reports.iter().any(SourceReport::succeeded) {
            return Err(JobdeckError::AllSourcesFailed { failures: reports });
        }

        Ok(Aggregation {
            candidates: dedup_freshest(fetched),
            reports,
        })
    }
}

async fn run_adapter(
    adapter: Arc<dyn SourceAdapter>,
    query: ScrapeQuery,
    limit: Duration,
) -> Result<Vec<Candidate>, JobdeckError> {
    let source = adapter.source();
    let fetch = async {
        let stream = adapter.fetch(&query).await?;
        stream.try_collect::<Vec<_>>().await
    };
    match tokio::time::timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(JobdeckError::source_unavailable(
            source,
            format!("timed out after {}s", limit.as_secs_f64()),
        )),
    }
}

fn failure_reason(err: JobdeckError) -> String {
    match err {
        JobdeckError::SourceUnavailable { message, .. } => message,
        other => other.to_string(),
    }
}

/// Collapse candidates sharing a dedup key, keeping the most recently posted.
///
/// The survivor takes the position of the first occurrence. On equal
/// timestamps the earlier candidate wins.
pub fn dedup_freshest(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::with_capacity(candidates.len());
    let mut seen: HashMap<DedupKey, usize> = HashMap::new();
    for candidate in candidates {
        match seen.entry(candidate.dedup_key()) {
            Entry::Occupied(slot) => {
                let existing = &mut out[*slot.get()];
                if candidate.posted_at > existing.posted_at {
                    *existing = candidate;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(out.len());
                out.push(candidate);
            }
        }
    }
    out
}
