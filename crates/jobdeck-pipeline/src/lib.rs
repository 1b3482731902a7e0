// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scrape pipeline for jobdeck.
//!
//! A scrape flows request → [`Aggregator`] (concurrent adapters) →
//! [`filter`] (title exclusions) → [`ranker`] (freshness, cap) → the store's
//! atomic reconcile. [`JobService`] wraps that flow together with the read
//! and edit operations outer surfaces call.

pub mod aggregator;
pub mod filter;
pub mod ranker;
pub mod request;
pub mod service;

pub use aggregator::{Aggregation, Aggregator};
pub use request::{ExcludeKeywords, ScrapeRequest};
pub use service::{JobService, ServiceHealth, SourceHealth};
